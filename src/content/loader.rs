//! Content loader - enumerates documents in a source directory

use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, FilterEntry, WalkDir};

use super::document::{sort_by_date, Document};
use crate::error::{Error, Result};

/// Loads documents from a source directory
#[derive(Debug, Clone)]
pub struct ContentLoader {
    source_dir: PathBuf,
}

impl ContentLoader {
    /// Create a new content loader
    pub fn new<P: AsRef<Path>>(source_dir: P) -> Self {
        Self {
            source_dir: source_dir.as_ref().to_path_buf(),
        }
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Lazily enumerate every Markdown document under the source directory.
    ///
    /// Each call starts a fresh walk. Entries come out in file-name order
    /// and directories or files starting with `_` or `.` are skipped.
    pub fn documents(&self) -> Documents {
        let walker = WalkDir::new(&self.source_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(is_visible as fn(&DirEntry) -> bool);

        Documents {
            root: self.source_dir.clone(),
            walker,
        }
    }

    /// Load every document, newest first. Fails on the first bad document.
    pub fn load_sorted(&self) -> Result<Vec<Document>> {
        let mut documents = self.documents().collect::<Result<Vec<_>>>()?;
        sort_by_date(&mut documents);
        Ok(documents)
    }
}

impl<'a> IntoIterator for &'a ContentLoader {
    type Item = Result<Document>;
    type IntoIter = Documents;

    fn into_iter(self) -> Documents {
        self.documents()
    }
}

/// Iterator over the documents of a source directory
pub struct Documents {
    root: PathBuf,
    walker: FilterEntry<walkdir::IntoIter, fn(&DirEntry) -> bool>,
}

impl Iterator for Documents {
    type Item = Result<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(self.root.as_path()).to_path_buf();
                    let source = e
                        .into_io_error()
                        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "filesystem loop"));
                    return Some(Err(Error::io(&path, source)));
                }
            };

            if entry.file_type().is_file() && is_markdown_file(entry.path()) {
                tracing::debug!("Loading {:?}", entry.path());
                return Some(Document::load(entry.path()));
            }
        }
    }
}

/// Skip `_layouts`, `_drafts`, `.git` and friends. The root itself is
/// always walked.
fn is_visible(entry: &DirEntry) -> bool {
    entry.depth() == 0
        || !entry
            .file_name()
            .to_str()
            .map(|s| s.starts_with('_') || s.starts_with('.'))
            .unwrap_or(false)
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}
