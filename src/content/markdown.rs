//! Markdown rendering with syntax highlighting

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{highlighted_html_for_string, styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::config::HighlightConfig;
use crate::helpers::html_escape;

/// Marker separating the excerpt from the rest of a post
pub const MORE_MARKER: &str = "<!-- more -->";

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    highlight: bool,
    line_numbers: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options(&HighlightConfig::default())
    }

    /// Create with custom settings
    pub fn with_options(config: &HighlightConfig) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: config.theme.clone(),
            highlight: config.enable,
            line_numbers: config.line_number,
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        // YAML metadata blocks stay off: front matter is split off beforehand
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut in_code_block = false;
        let mut code_block_lang: Option<String> = None;
        let mut code_block_content = String::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code_block = true;
                    code_block_lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .filter(|lang| !lang.is_empty())
                            .map(str::to_string),
                        CodeBlockKind::Indented => None,
                    };
                    code_block_content.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    let block = self.code_block(&code_block_content, code_block_lang.as_deref());
                    events.push(Event::Html(CowStr::from(block)));
                    in_code_block = false;
                    code_block_lang = None;
                }
                Event::Text(text) if in_code_block => {
                    code_block_content.push_str(&text);
                }
                _ => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }

    fn code_block(&self, code: &str, lang: Option<&str>) -> String {
        match lang {
            Some(lang) if self.highlight => self.highlight_code(code, lang),
            _ => plain_code_block(code, lang.unwrap_or("text")),
        }
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: &str) -> String {
        // Try to find syntax for the language
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next());
        let Some(theme) = theme else {
            return plain_code_block(code, lang);
        };

        let highlighted = if self.line_numbers {
            self.highlight_numbered(code, syntax, theme)
        } else {
            highlighted_html_for_string(code, &self.syntax_set, syntax, theme)
        };

        match highlighted {
            Ok(html) if self.line_numbers => {
                let lines = LinesWithEndings::from(code).count();
                let gutter = (1..=lines)
                    .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
                    .collect::<Vec<_>>()
                    .join("\n");
                format!(
                    r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code"><pre>{}</pre></td></tr></table></figure>"#,
                    lang, gutter, html
                )
            }
            Ok(html) => format!(r#"<figure class="highlight {}">{}</figure>"#, lang, html),
            Err(e) => {
                tracing::debug!("Highlighting {} failed, using plain block: {}", lang, e);
                plain_code_block(code, lang)
            }
        }
    }

    /// Highlight line by line, one `<span class="line">` per source line
    fn highlight_numbered(
        &self,
        code: &str,
        syntax: &SyntaxReference,
        theme: &Theme,
    ) -> Result<String, syntect::Error> {
        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut lines = Vec::new();
        for line in LinesWithEndings::from(code) {
            let regions = highlighter.highlight_line(line, &self.syntax_set)?;
            let html = styled_line_to_highlighted_html(&regions[..], IncludeBackground::No)?;
            // The line ending sits inside the last region's span
            lines.push(format!(r#"<span class="line">{}</span>"#, html.replace('\n', "")));
        }
        Ok(lines.join("\n"))
    }

    /// Parse excerpt from content (split by <!-- more -->)
    pub fn split_excerpt(content: &str) -> (Option<String>, String) {
        let Some(pos) = find_more_marker(content) else {
            return (None, content.to_string());
        };
        let excerpt = content[..pos].trim();
        let remaining = content[pos + MORE_MARKER.len()..].trim();
        if excerpt.is_empty() {
            return (None, remaining.to_string());
        }
        let full = format!("{}\n\n{}", excerpt, remaining);
        (Some(excerpt.to_string()), full)
    }
}

/// Byte offset of the first `<!-- more -->` outside fenced code blocks
pub fn find_more_marker(content: &str) -> Option<usize> {
    let mut offset = 0;
    let mut fence: Option<&str> = None;

    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_start();
        match fence {
            Some(open) if trimmed.starts_with(open) => fence = None,
            Some(_) => {}
            None if trimmed.starts_with("```") => fence = Some("```"),
            None if trimmed.starts_with("~~~") => fence = Some("~~~"),
            None => {
                if let Some(pos) = line.find(MORE_MARKER) {
                    return Some(offset + pos);
                }
            }
        }
        offset += line.len();
    }

    None
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn plain_code_block(code: &str, lang: &str) -> String {
    format!(
        "<pre><code class=\"language-{}\">{}</code></pre>\n",
        html_escape(lang),
        html_escape(code)
    )
}
