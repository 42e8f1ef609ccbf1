//! Site configuration (_config.yml)

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::helpers::try_format_date;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,

    // URL
    pub url: String,
    pub root: String,
    pub permalink: String,

    // Directory
    pub layout_dir: String,
    pub tag_dir: String,
    pub pagination_dir: String,

    // Writing
    pub default_layout: String,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Index pages
    #[serde(default)]
    pub index_generator: IndexGeneratorConfig,

    // Date format (chrono strftime)
    pub date_format: String,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            description: String::new(),
            author: String::new(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),
            permalink: ":year/:month/:day/:title/".to_string(),

            layout_dir: "_layouts".to_string(),
            tag_dir: "tags".to_string(),
            pagination_dir: "page".to_string(),

            default_layout: "post".to_string(),
            highlight: HighlightConfig::default(),

            index_generator: IndexGeneratorConfig::default(),

            date_format: "%Y-%m-%d".to_string(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: SiteConfig = serde_yaml::from_str(&content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate(path)?;
        Ok(config)
    }

    /// Load `_config.yml` from `dir` if present, defaults otherwise
    pub fn load_or_default<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let path = dir.as_ref().join("_config.yml");
        if path.exists() {
            tracing::debug!("Loading configuration from {:?}", path);
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if self.index_generator.per_page == 0 {
            return Err(Error::Config {
                path: path.to_path_buf(),
                message: "index_generator.per_page must be at least 1".to_string(),
            });
        }
        if try_format_date(&NaiveDateTime::default(), &self.date_format).is_none() {
            return Err(Error::Config {
                path: path.to_path_buf(),
                message: format!("invalid date_format `{}`", self.date_format),
            });
        }
        if self.permalink.trim().is_empty() {
            return Err(Error::Config {
                path: path.to_path_buf(),
                message: "permalink must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

/// Index generator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexGeneratorConfig {
    pub enable: bool,
    pub per_page: usize,
    pub tags: bool,
}

impl Default for IndexGeneratorConfig {
    fn default() -> Self {
        Self {
            enable: true,
            per_page: 10,
            tags: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.default_layout, "post");
        assert_eq!(config.permalink, ":year/:month/:day/:title/");
        assert_eq!(config.index_generator.per_page, 10);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
author: Test User
permalink: posts/:slug.html
index_generator:
  per_page: 20
highlight:
  enable: false
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.author, "Test User");
        assert_eq!(config.permalink, "posts/:slug.html");
        assert_eq!(config.index_generator.per_page, 20);
        assert!(config.index_generator.enable);
        assert!(!config.highlight.enable);
    }

    #[test]
    fn test_load_rejects_zero_per_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("_config.yml");
        fs::write(&path, "index_generator:\n  per_page: 0\n").unwrap();
        let err = SiteConfig::load(&path).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_load_rejects_bad_date_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("_config.yml");
        fs::write(&path, "date_format: '%Q'\n").unwrap();
        let err = SiteConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("invalid date_format"));

        // Zone specifiers parse fine but cannot be applied to naive dates
        for format in ["%Y-%m-%d %Z", "%Y-%m-%d %z"] {
            fs::write(&path, format!("date_format: '{}'\n", format)).unwrap();
            let err = SiteConfig::load(&path).unwrap_err();
            assert!(matches!(err, Error::Config { .. }), "{}", format);
        }

        fs::write(&path, "date_format: '%B %d, %Y'\n").unwrap();
        assert!(SiteConfig::load(&path).is_ok());
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = SiteConfig::load_or_default(dir.path()).unwrap();
        assert_eq!(config.title, "Blog");
    }
}
