//! URL and output-path helpers

use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

use crate::config::SiteConfig;

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/css/style.css") // -> "/blog/css/style.css"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/about/") // -> "https://example.com/blog/about/"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    format!("{}{}", base, url_for(config, path))
}

/// Expand the configured permalink pattern for a document
///
/// # Examples
/// ```ignore
/// permalink(":year/:month/:title/", &date, "hello") // -> "2024/01/hello/"
/// ```
pub fn permalink(pattern: &str, date: &NaiveDateTime, slug: &str) -> String {
    pattern
        .replace(":year", &date.format("%Y").to_string())
        .replace(":month", &date.format("%m").to_string())
        .replace(":day", &date.format("%d").to_string())
        .replace(":i_month", &date.format("%-m").to_string())
        .replace(":i_day", &date.format("%-d").to_string())
        .replace(":hour", &date.format("%H").to_string())
        .replace(":minute", &date.format("%M").to_string())
        .replace(":second", &date.format("%S").to_string())
        .replace(":title", slug)
        .replace(":slug", slug)
        .trim_start_matches('/')
        .to_string()
}

/// URL-safe key for a tag. Tags with nothing to slugify (`++`, `!!`) use
/// the hex of their UTF-8 bytes so each still gets its own page.
pub fn tag_slug(tag: &str) -> String {
    let slug = slug::slugify(tag);
    if !slug.is_empty() {
        return slug;
    }
    tag.trim()
        .bytes()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Path of a tag's index page, relative to the site root
pub fn tag_path(config: &SiteConfig, tag: &str) -> String {
    format!("{}/{}/", config.tag_dir.trim_matches('/'), tag_slug(tag))
}

/// Path of the `n`th (1-based) home index page, relative to the site root
pub fn index_page_path(config: &SiteConfig, base: &str, n: usize) -> String {
    if n <= 1 {
        base.to_string()
    } else {
        format!("{}{}/{}/", base, config.pagination_dir.trim_matches('/'), n)
    }
}

/// Map a site-relative path to the file written under `output_dir`.
/// Directory-style paths get an `index.html`.
pub fn output_file(output_dir: &Path, path: &str) -> PathBuf {
    let path = path.trim_start_matches('/');
    if path.is_empty() || path.ends_with('/') {
        output_dir.join(path).join("index.html")
    } else if Path::new(path).extension().is_some() {
        output_dir.join(path)
    } else {
        output_dir.join(path).join("index.html")
    }
}
