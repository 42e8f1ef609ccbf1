//! Layouts - page templates with `{{ name }}` placeholders
//!
//! A layout is plain HTML with placeholders; there are no loops, conditionals
//! or partials. The built-in `post`, `page` and `index` layouts are embedded
//! in the binary and can be replaced or extended by `*.html` files in the
//! site's layout directory.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::helpers::html_escape;

lazy_static! {
    static ref PLACEHOLDER: Regex =
        Regex::new(r"\{\{\s*([A-Za-z0-9_][A-Za-z0-9_.\-]*)\s*\}\}").unwrap();
}

const BUILTIN: [(&str, &str); 3] = [
    ("post", include_str!("builtin/post.html")),
    ("page", include_str!("builtin/page.html")),
    ("index", include_str!("builtin/index.html")),
];

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Text(String),
    Placeholder(String),
}

/// A parsed layout
#[derive(Debug, Clone)]
pub struct Layout {
    name: String,
    segments: Vec<Segment>,
}

impl Layout {
    /// Parse layout source text
    pub fn parse(name: &str, source: &str) -> Self {
        let mut segments = Vec::new();
        let mut last = 0;

        for caps in PLACEHOLDER.captures_iter(source) {
            let whole = caps.get(0).map(|m| m.range()).unwrap_or(0..0);
            if whole.start > last {
                segments.push(Segment::Text(source[last..whole.start].to_string()));
            }
            segments.push(Segment::Placeholder(caps[1].to_string()));
            last = whole.end;
        }
        if last < source.len() {
            segments.push(Segment::Text(source[last..].to_string()));
        }

        Self {
            name: name.to_string(),
            segments,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of the placeholders this layout uses, in order of appearance
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(key) => Some(key.as_str()),
            Segment::Text(_) => None,
        })
    }

    /// Substitute `context` into the layout. Unknown placeholders render empty.
    pub fn render(&self, context: &LayoutContext) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Placeholder(key) => match context.get(key) {
                    Some(value) => out.push_str(value),
                    None => tracing::trace!("Layout {} has no value for {}", self.name, key),
                },
            }
        }
        out
    }
}

/// Values substituted into a layout. Text values are escaped on insertion,
/// HTML values are inserted as-is.
#[derive(Debug, Clone, Default)]
pub struct LayoutContext {
    values: HashMap<String, String>,
}

impl LayoutContext {
    /// Create a new context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a plain-text variable (HTML-escaped)
    pub fn set_text(&mut self, name: &str, value: &str) {
        self.values.insert(name.to_string(), html_escape(value));
    }

    /// Set a variable that already holds HTML
    pub fn set_html(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// Looks up layouts by name
pub trait LayoutResolver {
    /// Find a layout, `None` if it doesn't exist
    fn resolve(&self, name: &str) -> Option<&Layout>;

    /// Check if a layout exists
    fn has_layout(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }
}

/// The layouts available to a site
#[derive(Debug, Clone)]
pub struct LayoutSet {
    layouts: BTreeMap<String, Layout>,
}

impl LayoutSet {
    /// Only the built-in layouts
    pub fn builtin() -> Self {
        let layouts = BUILTIN
            .iter()
            .map(|(name, source)| (name.to_string(), Layout::parse(name, source)))
            .collect();
        Self { layouts }
    }

    /// Built-in layouts overridden by the `*.html` files in `dir`. A missing
    /// directory is not an error.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let mut set = Self::builtin();
        if !dir.is_dir() {
            tracing::debug!("No layout directory at {:?}, using built-in layouts", dir);
            return Ok(set);
        }

        let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
        for entry in entries {
            let path = entry.map_err(|e| Error::io(dir, e))?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("html") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let source = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
            tracing::debug!("Loaded layout {} from {:?}", name, path);
            set.insert(Layout::parse(name, &source));
        }

        Ok(set)
    }

    /// Add or replace a layout
    pub fn insert(&mut self, layout: Layout) {
        self.layouts.insert(layout.name.clone(), layout);
    }

    /// Get available layout names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.layouts.keys().map(String::as_str)
    }
}

impl Default for LayoutSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LayoutResolver for LayoutSet {
    fn resolve(&self, name: &str) -> Option<&Layout> {
        self.layouts.get(name)
    }
}
