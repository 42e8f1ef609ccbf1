//! HTML helper functions

use crate::config::SiteConfig;

use super::url::{tag_path, url_for};

/// Generate a link tag
pub fn link_to(config: &SiteConfig, path: &str, text: &str, class: Option<&str>) -> String {
    let class_attr = class
        .map(|c| format!(r#" class="{}""#, html_escape(c)))
        .unwrap_or_default();
    format!(
        r#"<a{} href="{}">{}</a>"#,
        class_attr,
        html_escape(&url_for(config, path)),
        html_escape(text)
    )
}

/// Render a list of tags as links to their index pages
pub fn tag_links(config: &SiteConfig, tags: &[&str]) -> String {
    tags.iter()
        .map(|tag| link_to(config, &tag_path(config, tag), tag, Some("tag")))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Strip HTML tags from a string
pub fn strip_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;

    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}

/// Truncate a string to a specified length
pub fn truncate(s: &str, length: usize, omission: Option<&str>) -> String {
    let omission = omission.unwrap_or("...");

    if s.chars().count() <= length {
        s.to_string()
    } else {
        let truncated: String = s
            .chars()
            .take(length.saturating_sub(omission.chars().count()))
            .collect();
        format!("{}{}", truncated.trim_end(), omission)
    }
}
