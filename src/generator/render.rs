//! Rendering documents and index listings into pages

use crate::config::SiteConfig;
use crate::content::{Document, MarkdownRenderer};
use crate::error::{Error, Result};
use crate::helpers::{
    date_xml, format_date, full_url_for, html_escape, permalink, strip_html, tag_links, truncate,
    url_for,
};
use crate::layout::{LayoutContext, LayoutResolver};

/// Length of the generated `description` placeholder, in characters
const DESCRIPTION_LENGTH: usize = 160;

/// Renders documents through their layouts.
///
/// Rendering depends only on the document, the layout and the site
/// configuration, so rendering the same document twice gives the same bytes.
pub struct Renderer<'a> {
    config: &'a SiteConfig,
    markdown: MarkdownRenderer,
}

/// One entry of an index listing
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub title: String,
    pub date: String,
    pub path: String,
    pub excerpt: Option<String>,
}

/// A page of an index listing
#[derive(Debug, Clone)]
pub struct IndexPage<'e> {
    pub title: String,
    /// Site-relative path of this page
    pub path: String,
    pub entries: &'e [IndexEntry],
    pub prev_path: Option<String>,
    pub next_path: Option<String>,
}

impl<'a> Renderer<'a> {
    pub fn new(config: &'a SiteConfig) -> Self {
        Self {
            config,
            markdown: MarkdownRenderer::with_options(&config.highlight),
        }
    }

    /// Site-relative path of a document's page
    pub fn document_path(&self, doc: &Document) -> String {
        permalink(&self.config.permalink, &doc.date(), &doc.slug())
    }

    /// Render the Markdown body alone
    pub fn render_body(&self, doc: &Document) -> String {
        let (_, full) = MarkdownRenderer::split_excerpt(doc.body());
        self.markdown.render(&full)
    }

    /// Render a full page for `doc` using the layout it names (or the
    /// configured default).
    pub fn render_document(&self, doc: &Document, layouts: &dyn LayoutResolver) -> Result<String> {
        let layout_name = doc.layout(&self.config.default_layout);
        let layout = layouts
            .resolve(layout_name)
            .ok_or_else(|| Error::LayoutNotFound {
                path: doc.path().to_path_buf(),
                layout: layout_name.to_string(),
            })?;

        let content = self.render_body(doc);
        let path = self.document_path(doc);

        let mut ctx = self.site_context();
        ctx.set_text("title", doc.title());
        ctx.set_text("date", &format_date(&doc.date(), &self.config.date_format));
        ctx.set_text("date_xml", &date_xml(&doc.date()));
        ctx.set_text("layout", layout_name);
        ctx.set_text("path", &url_for(self.config, &path));
        ctx.set_text("url", &full_url_for(self.config, &path));
        ctx.set_html("tags", tag_links(self.config, &doc.tags()));
        ctx.set_text(
            "description",
            &truncate(strip_html(&content).trim(), DESCRIPTION_LENGTH, None),
        );
        ctx.set_html(
            "excerpt",
            doc.excerpt()
                .map(|e| self.markdown.render(e))
                .unwrap_or_default(),
        );
        for (key, value) in &doc.front_matter().extra {
            if let Some(text) = scalar_text(value) {
                ctx.set_text(&format!("page.{}", key), &text);
            }
        }
        ctx.set_html("content", content);

        Ok(layout.render(&ctx))
    }

    /// Build the listing entry for a document
    pub fn index_entry(&self, doc: &Document) -> IndexEntry {
        IndexEntry {
            title: doc.title().to_string(),
            date: format_date(&doc.date(), &self.config.date_format),
            path: self.document_path(doc),
            excerpt: doc.excerpt().map(|e| self.markdown.render(e)),
        }
    }

    /// Render one page of an index listing with the `index` layout
    pub fn render_index(&self, page: &IndexPage, layouts: &dyn LayoutResolver) -> Result<String> {
        let layout = layouts.resolve("index").ok_or_else(|| Error::LayoutNotFound {
            path: page.path.clone().into(),
            layout: "index".to_string(),
        })?;

        let mut ctx = self.site_context();
        ctx.set_text("title", &page.title);
        ctx.set_text("path", &url_for(self.config, &page.path));
        ctx.set_text("url", &full_url_for(self.config, &page.path));
        ctx.set_html("content", self.post_list(page.entries));
        ctx.set_html("pager", self.pager(page));

        Ok(layout.render(&ctx))
    }

    fn site_context(&self) -> LayoutContext {
        let mut ctx = LayoutContext::new();
        ctx.set_text("site.title", &self.config.title);
        ctx.set_text("site.author", &self.config.author);
        ctx.set_text("site.description", &self.config.description);
        ctx.set_text("site.url", &self.config.url);
        ctx.set_text("site.root", &self.config.root);
        ctx
    }

    fn post_list(&self, entries: &[IndexEntry]) -> String {
        let mut html = String::from("<ul class=\"post-list\">\n");
        for entry in entries {
            html.push_str(&format!(
                "<li><time>{}</time> <a href=\"{}\">{}</a>",
                html_escape(&entry.date),
                html_escape(&url_for(self.config, &entry.path)),
                html_escape(&entry.title)
            ));
            if let Some(excerpt) = &entry.excerpt {
                html.push_str("<div class=\"excerpt\">");
                html.push_str(excerpt);
                html.push_str("</div>");
            }
            html.push_str("</li>\n");
        }
        html.push_str("</ul>");
        html
    }

    fn pager(&self, page: &IndexPage) -> String {
        let link = |path: &str, rel: &str, text: &str| {
            format!(
                "<a rel=\"{}\" href=\"{}\">{}</a>",
                rel,
                html_escape(&url_for(self.config, path)),
                text
            )
        };

        let mut parts = Vec::new();
        if let Some(prev) = &page.prev_path {
            parts.push(link(prev, "prev", "Newer"));
        }
        if let Some(next) = &page.next_path {
            parts.push(link(next, "next", "Older"));
        }
        parts.join(" ")
    }
}

fn scalar_text(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
