//! Helper functions for layouts and output paths
//!
//! These cover URL generation, permalink expansion and the small amount of
//! HTML the generator writes itself (tag links, post lists).

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
