//! Document model

use chrono::NaiveDateTime;
use std::fs;
use std::path::{Path, PathBuf};

use super::frontmatter::{FrontMatter, DELIMITER};
use super::markdown::find_more_marker;
use crate::error::{Error, Result};

/// A source document: front matter plus a Markdown body.
///
/// Documents are immutable once loaded; everything derived from them
/// (HTML, output paths) is computed on demand.
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    front_matter: FrontMatter,
    body: String,
    title: String,
    date: NaiveDateTime,
}

impl Document {
    /// Parse a document from its source text. `path` identifies the document
    /// in errors and provides the fallback title.
    pub fn parse(path: impl Into<PathBuf>, source: &str) -> Result<Self> {
        let path = path.into();

        let (yaml, body) = FrontMatter::split(source).map_err(|e| Error::parse(&path, e))?;
        let front_matter =
            FrontMatter::from_yaml(yaml).map_err(|e| Error::parse(&path, e.to_string()))?;

        Self::from_parts(path, front_matter, body.to_string())
    }

    /// Build a document from already separated front matter and body
    pub fn from_parts(
        path: impl Into<PathBuf>,
        front_matter: FrontMatter,
        body: String,
    ) -> Result<Self> {
        let path = path.into();

        let date = match front_matter.date.as_deref() {
            None => return Err(Error::parse(&path, "missing required field `date`")),
            Some(raw) => front_matter
                .parse_date()
                .ok_or_else(|| Error::parse(&path, format!("unparsable date `{}`", raw)))?,
        };

        // Get title from front-matter or filename
        let title = front_matter.title.clone().unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Untitled")
                .to_string()
        });

        Ok(Self {
            path,
            front_matter,
            body,
            title,
            date,
        })
    }

    /// Read and parse a document from disk
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::parse(path, &source)
    }

    /// Serialize the document back to source text
    pub fn to_source(&self) -> Result<String> {
        let yaml = self
            .front_matter
            .to_yaml()
            .map_err(|e| Error::parse(&self.path, e.to_string()))?;

        let mut out = String::with_capacity(yaml.len() + self.body.len() + 8);
        out.push_str(DELIMITER);
        out.push('\n');
        out.push_str(&yaml);
        out.push_str(DELIMITER);
        out.push('\n');
        out.push_str(&self.body);
        Ok(out)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn front_matter(&self) -> &FrontMatter {
        &self.front_matter
    }

    /// Raw Markdown body
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn date(&self) -> NaiveDateTime {
        self.date
    }

    /// Layout name, or `default` when the document names none
    pub fn layout<'a>(&'a self, default: &'a str) -> &'a str {
        self.front_matter.layout.as_deref().unwrap_or(default)
    }

    /// URL-safe name: the explicit `slug` field, else the slugified title,
    /// else the file stem
    pub fn slug(&self) -> String {
        let slugify = |s: &str| Some(slug::slugify(s)).filter(|s| !s.is_empty());

        self.front_matter
            .slug
            .as_deref()
            .and_then(slugify)
            .or_else(|| slugify(&self.title))
            .or_else(|| self.path.file_stem().and_then(|s| s.to_str()).and_then(slugify))
            .unwrap_or_else(|| "untitled".to_string())
    }

    /// Tags with duplicates removed, first occurrence wins
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = Vec::with_capacity(self.front_matter.tags.len());
        for tag in &self.front_matter.tags {
            let tag = tag.trim();
            if !tag.is_empty() && !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        tags
    }

    /// Markdown before the `<!-- more -->` marker, if the body has one and
    /// the text before it is not blank
    pub fn excerpt(&self) -> Option<&str> {
        find_more_marker(&self.body)
            .map(|pos| self.body[..pos].trim())
            .filter(|excerpt| !excerpt.is_empty())
    }
}

/// Sort documents newest first, breaking ties by source path so the order
/// never depends on directory enumeration.
pub fn sort_by_date(documents: &mut [Document]) {
    documents.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.path.cmp(&b.path)));
}
