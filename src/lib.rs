//! quire: a small static site generator for Markdown blogs
//!
//! Source documents are Markdown files that start with a YAML front-matter
//! block. Each one is rendered through a layout into its own HTML page, and
//! date-ordered index pages (home and per tag) are written alongside.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod layout;

pub use content::{ContentLoader, Document, FrontMatter};
pub use error::{Error, Result};
pub use generator::{BuildOptions, BuildReport, Generator, Renderer};
pub use layout::{Layout, LayoutResolver, LayoutSet};

use std::path::{Path, PathBuf};

/// A site: configuration plus its source, output and layout directories
#[derive(Clone, Debug)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Source directory
    pub source_dir: PathBuf,
    /// Output directory
    pub output_dir: PathBuf,
    /// Layout directory
    pub layout_dir: PathBuf,
}

impl Site {
    /// Create a site for `source_dir`, reading `_config.yml` from it when
    /// present
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(source_dir: P, output_dir: Q) -> Result<Self> {
        let source_dir = source_dir.as_ref().to_path_buf();
        let config = config::SiteConfig::load_or_default(&source_dir)?;
        Ok(Self::with_config(config, source_dir, output_dir.as_ref()))
    }

    /// Create a site from an already loaded configuration
    pub fn with_config<P: AsRef<Path>, Q: AsRef<Path>>(
        config: config::SiteConfig,
        source_dir: P,
        output_dir: Q,
    ) -> Self {
        let source_dir = source_dir.as_ref().to_path_buf();
        let layout_dir = source_dir.join(&config.layout_dir);
        Self {
            config,
            source_dir,
            output_dir: output_dir.as_ref().to_path_buf(),
            layout_dir,
        }
    }

    /// Use layouts from `dir` instead of the configured layout directory
    pub fn with_layout_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.layout_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Loader over this site's documents
    pub fn loader(&self) -> ContentLoader {
        ContentLoader::new(&self.source_dir)
    }

    /// Built-in layouts plus the ones in the layout directory
    pub fn layouts(&self) -> Result<LayoutSet> {
        LayoutSet::load(&self.layout_dir)
    }

    /// Generate the static site
    pub fn build(&self, options: BuildOptions) -> anyhow::Result<BuildReport> {
        commands::build::run(self, options)
    }

    /// Clean the output directory. Refuses when the output directory is, or
    /// contains, the source directory.
    pub fn clean(&self) -> anyhow::Result<()> {
        commands::clean::check_output_dir(&self.source_dir, &self.output_dir)?;
        commands::clean::run(&self.output_dir)
    }
}
