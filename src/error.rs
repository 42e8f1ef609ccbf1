//! Error types for loading, rendering and writing documents

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors produced while building a site. Every variant carries the path of
/// the file it concerns so failures can be reported per document.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{}: malformed front matter: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("{}: layout not found: {layout}", path.display())]
    LayoutNotFound { path: PathBuf, layout: String },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: invalid configuration: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl Error {
    pub(crate) fn parse(path: &Path, message: impl Into<String>) -> Self {
        Error::Parse {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// The file this error concerns
    pub fn path(&self) -> &Path {
        match self {
            Error::Parse { path, .. }
            | Error::LayoutNotFound { path, .. }
            | Error::Io { path, .. }
            | Error::Config { path, .. } => path,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
