//! Content module - documents, front matter, and Markdown processing

mod document;
mod frontmatter;
pub mod loader;
mod markdown;

pub use document::{sort_by_date, Document};
pub use frontmatter::{parse_date_string, FrontMatter};
pub use loader::{ContentLoader, Documents};
pub use markdown::{find_more_marker, MarkdownRenderer, MORE_MARKER};
