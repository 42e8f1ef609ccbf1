//! List site content

use anyhow::Result;
use serde::Serialize;
use std::io::Write;

use crate::content::Document;
use crate::helpers::{permalink, tag_slug};
use crate::Site;

/// A document as shown by `list --json`
#[derive(Debug, Serialize)]
pub struct ListEntry {
    pub source: String,
    pub title: String,
    pub date: String,
    pub layout: String,
    pub tags: Vec<String>,
    pub path: String,
}

impl ListEntry {
    fn new(site: &Site, doc: &Document) -> Self {
        Self {
            source: doc
                .path()
                .strip_prefix(&site.source_dir)
                .unwrap_or(doc.path())
                .to_string_lossy()
                .to_string(),
            title: doc.title().to_string(),
            date: doc.date().format("%Y-%m-%d %H:%M:%S").to_string(),
            layout: doc.layout(&site.config.default_layout).to_string(),
            tags: doc.tags().into_iter().map(str::to_string).collect(),
            path: permalink(&site.config.permalink, &doc.date(), &doc.slug()),
        }
    }
}

/// Documents of `site` in date order, newest first, optionally filtered by tag
pub fn entries(site: &Site, tag: Option<&str>) -> Result<Vec<ListEntry>> {
    let documents = site.loader().load_sorted()?;
    let wanted = tag.map(tag_slug);

    Ok(documents
        .iter()
        .filter(|doc| match &wanted {
            Some(wanted) => doc.tags().iter().any(|t| &tag_slug(t) == wanted),
            None => true,
        })
        .map(|doc| ListEntry::new(site, doc))
        .collect())
}

/// Print the documents of `site`
pub fn run(site: &Site, tag: Option<&str>, json: bool, out: &mut dyn Write) -> Result<()> {
    let entries = entries(site, tag)?;

    if json {
        serde_json::to_writer_pretty(&mut *out, &entries)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "Documents ({}):", entries.len())?;
    for entry in &entries {
        let date = entry.date.split(' ').next().unwrap_or(&entry.date);
        if entry.tags.is_empty() {
            writeln!(out, "  {} - {} [{}]", date, entry.title, entry.source)?;
        } else {
            writeln!(
                out,
                "  {} - {} [{}] ({})",
                date,
                entry.title,
                entry.source,
                entry.tags.join(", ")
            )?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn site() -> (tempfile::TempDir, Site) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("z-first.md"),
            "---\ntitle: First\ndate: 2010-01-01\ntags: [Ruby]\n---\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("a-second.md"),
            "---\ntitle: Second\ndate: 2011-01-01\ntags: shell\n---\n",
        )
        .unwrap();
        let site = Site::new(dir.path(), dir.path().join("public")).unwrap();
        (dir, site)
    }

    #[test]
    fn test_list_in_date_order() {
        let (_dir, site) = site();
        let mut out = Vec::new();
        run(&site, None, false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Documents (2):\n  2011-01-01 - Second [a-second.md] (shell)\n  2010-01-01 - First [z-first.md] (Ruby)\n"
        );
    }

    #[test]
    fn test_list_filter_by_tag() {
        let (_dir, site) = site();
        let entries = entries(&site, Some("ruby")).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "First");
        assert_eq!(entries[0].path, "2010/01/01/first/");
    }

    #[test]
    fn test_list_json() {
        let (_dir, site) = site();
        let mut out = Vec::new();
        run(&site, None, true, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["title"], "Second");
        assert_eq!(value[1]["tags"][0], "Ruby");
        assert_eq!(value[1]["layout"], "post");
    }
}
