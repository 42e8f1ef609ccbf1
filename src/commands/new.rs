//! Create a new document

use anyhow::Result;
use chrono::NaiveDateTime;
use std::fs;
use std::path::PathBuf;

use crate::content::{Document, FrontMatter};
use crate::Site;

/// Write a new document scaffold into the source directory. Returns the
/// path of the created file.
pub fn create_document(
    site: &Site,
    title: &str,
    layout: Option<&str>,
    tags: &[String],
    now: NaiveDateTime,
) -> Result<PathBuf> {
    fs::create_dir_all(&site.source_dir)?;

    let front_matter = FrontMatter {
        layout: Some(layout.unwrap_or(&site.config.default_layout).to_string()),
        title: Some(title.to_string()),
        date: Some(now.format("%Y-%m-%d %H:%M:%S").to_string()),
        tags: tags.to_vec(),
        ..FrontMatter::default()
    };

    let slug = slug::slugify(title);
    let slug = if slug.is_empty() { "untitled".to_string() } else { slug };
    let file_path = site.source_dir.join(format!("{}.md", slug));

    // Check if file already exists
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let document = Document::from_parts(&file_path, front_matter, String::new())?;
    fs::write(&file_path, document.to_source()?)?;

    tracing::info!("Created: {:?}", file_path);
    Ok(file_path)
}

/// Run the new command
pub fn run(site: &Site, title: &str, layout: Option<&str>, tags: &[String]) -> Result<PathBuf> {
    create_document(site, title, layout, tags, chrono::Local::now().naive_local())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2016, 8, 9)
            .unwrap()
            .and_hms_opt(7, 6, 5)
            .unwrap()
    }

    #[test]
    fn test_create_document_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path(), dir.path().join("public")).unwrap();

        let path = create_document(
            &site,
            "Bash: Quick Tips",
            None,
            &["shell".to_string(), "tips".to_string()],
            now(),
        )
        .unwrap();
        assert_eq!(path, dir.path().join("bash-quick-tips.md"));

        let doc = Document::load(&path).unwrap();
        assert_eq!(doc.title(), "Bash: Quick Tips");
        assert_eq!(doc.layout("page"), "post");
        assert_eq!(doc.tags(), vec!["shell", "tips"]);
        assert_eq!(doc.date(), now());
    }

    #[test]
    fn test_create_document_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path(), dir.path().join("public")).unwrap();

        create_document(&site, "Same", Some("page"), &[], now()).unwrap();
        let err = create_document(&site, "Same", Some("page"), &[], now()).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }
}
