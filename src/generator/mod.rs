//! Generator module - renders documents and writes the static site

mod render;

pub use render::{IndexEntry, IndexPage, Renderer};

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::SiteConfig;
use crate::content::{sort_by_date, ContentLoader, Document};
use crate::error::{Error, Result};
use crate::helpers::{index_page_path, output_file, tag_path};
use crate::layout::LayoutResolver;

/// Options for a single build
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Keep going after a document fails instead of stopping at the first
    /// failure
    pub continue_on_error: bool,
}

/// Outcome of a build
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Files written, in the order they were written
    pub written: Vec<PathBuf>,
    /// Documents (or index pages) that failed, with the reason
    pub failures: Vec<Error>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Static site generator
pub struct Generator<'a> {
    config: &'a SiteConfig,
    layouts: &'a dyn LayoutResolver,
    renderer: Renderer<'a>,
    output_dir: PathBuf,
}

impl<'a> Generator<'a> {
    /// Create a new generator
    pub fn new(
        config: &'a SiteConfig,
        layouts: &'a dyn LayoutResolver,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config,
            layouts,
            renderer: Renderer::new(config),
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Load, render and write every document from `loader`, then the index
    /// pages. A failing document is recorded in the report; unless
    /// `continue_on_error` is set the build stops there.
    pub fn build(&self, loader: &ContentLoader, options: BuildOptions) -> BuildReport {
        let mut report = BuildReport::default();
        let mut documents = Vec::new();
        let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();

        for result in loader.documents() {
            let written = result.and_then(|doc| {
                let target = self.write_document(&doc)?;
                Ok((doc, target))
            });

            match written {
                Ok((doc, target)) => {
                    if let Some(previous) = claimed.insert(target.clone(), doc.path().to_path_buf()) {
                        tracing::warn!(
                            "{:?} overwrote the page of {:?} at {:?}",
                            doc.path(),
                            previous,
                            target
                        );
                    }
                    report.written.push(target);
                    documents.push(doc);
                }
                Err(e) => {
                    tracing::error!("{}", e);
                    report.failures.push(e);
                    if !options.continue_on_error {
                        return report;
                    }
                }
            }
        }

        if self.config.index_generator.enable {
            sort_by_date(&mut documents);
            self.generate_index_pages(&documents, &mut report, options);
        }

        report
    }

    /// Render one document and write it to its permalink. Returns the file
    /// written.
    pub fn write_document(&self, doc: &Document) -> Result<PathBuf> {
        let html = self.renderer.render_document(doc, self.layouts)?;
        let target = output_file(&self.output_dir, &self.renderer.document_path(doc));
        write_file(&target, &html)?;
        tracing::debug!("Generated: {:?}", target);
        Ok(target)
    }

    /// Home index plus one index per tag, all paginated
    fn generate_index_pages(
        &self,
        documents: &[Document],
        report: &mut BuildReport,
        options: BuildOptions,
    ) {
        let mut listings: Vec<(String, String, Vec<IndexEntry>)> = Vec::new();

        let entries: Vec<IndexEntry> = documents
            .iter()
            .map(|doc| self.renderer.index_entry(doc))
            .collect();
        listings.push((self.config.title.clone(), String::new(), entries));

        if self.config.index_generator.tags {
            for (path, listing) in self.group_by_tag(documents) {
                listings.push((format!("Tag: {}", listing.name), path, listing.entries));
            }
        }

        for (title, base, entries) in &listings {
            if !self.write_listing(title, base, entries, report, options) {
                return;
            }
        }
    }

    /// Documents per tag page, keyed by the page path. Tags that only differ
    /// in case share a page quietly; other names that land on the same slug
    /// (`C++` and `C#`) share it with a warning.
    fn group_by_tag(&self, documents: &[Document]) -> BTreeMap<String, TagListing> {
        let mut tags: BTreeMap<String, TagListing> = BTreeMap::new();

        for doc in documents {
            let entry = self.renderer.index_entry(doc);
            for tag in doc.tags() {
                let listing = tags
                    .entry(tag_path(self.config, tag))
                    .or_insert_with(|| TagListing {
                        name: tag.to_string(),
                        aliases: Vec::new(),
                        entries: Vec::new(),
                    });

                if !listing.name.eq_ignore_ascii_case(tag)
                    && !listing.aliases.iter().any(|a| a.eq_ignore_ascii_case(tag))
                {
                    tracing::warn!(
                        "Tags {:?} and {:?} share the page {:?}",
                        listing.name,
                        tag,
                        tag_path(self.config, tag)
                    );
                    listing.aliases.push(tag.to_string());
                }

                // Two tags of one document can land on the same page
                if listing.entries.last().map(|e| &e.path) != Some(&entry.path) {
                    listing.entries.push(entry.clone());
                }
            }
        }

        tags
    }

    /// Write every page of one listing. Returns `false` when a failure
    /// should stop the build.
    fn write_listing(
        &self,
        title: &str,
        base: &str,
        entries: &[IndexEntry],
        report: &mut BuildReport,
        options: BuildOptions,
    ) -> bool {
        let per_page = self.config.index_generator.per_page.max(1);
        let chunks: Vec<&[IndexEntry]> = if entries.is_empty() {
            vec![entries]
        } else {
            entries.chunks(per_page).collect()
        };
        let total = chunks.len();

        for (i, chunk) in chunks.into_iter().enumerate() {
            let n = i + 1;
            let page = IndexPage {
                title: title.to_string(),
                path: index_page_path(self.config, base, n),
                entries: chunk,
                prev_path: (n > 1).then(|| index_page_path(self.config, base, n - 1)),
                next_path: (n < total).then(|| index_page_path(self.config, base, n + 1)),
            };

            match self.write_index_page(&page) {
                Ok(target) => report.written.push(target),
                Err(e) => {
                    tracing::error!("{}", e);
                    report.failures.push(e);
                    if !options.continue_on_error {
                        return false;
                    }
                }
            }
        }
        true
    }

    fn write_index_page(&self, page: &IndexPage) -> Result<PathBuf> {
        let html = self.renderer.render_index(page, self.layouts)?;
        let target = output_file(&self.output_dir, &page.path);
        write_file(&target, &html)?;
        tracing::debug!("Generated: {:?}", target);
        Ok(target)
    }
}

/// Documents gathered for one tag page
#[derive(Debug)]
struct TagListing {
    /// First spelling seen, used for the page title
    name: String,
    /// Other spellings that slugify to the same page
    aliases: Vec<String>,
    entries: Vec<IndexEntry>,
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    fs::write(path, contents).map_err(|e| Error::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutSet;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn source() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "deps.md",
            "---\ntitle: Managing Dependencies\ndate: 2012-03-01\ntags: [java, build]\n---\nPin versions.\n",
        );
        write(
            dir.path(),
            "logging.md",
            "---\ntitle: Logging Facades\ndate: 2013-05-12\ntags: java\n---\nUse `slf4j`.\n",
        );
        dir
    }

    #[test]
    fn test_build_writes_documents_and_indexes() {
        let src = source();
        let out = tempfile::tempdir().unwrap();
        let config = SiteConfig::default();
        let layouts = LayoutSet::builtin();
        let generator = Generator::new(&config, &layouts, out.path());

        let report = generator.build(&ContentLoader::new(src.path()), BuildOptions::default());
        assert!(report.is_success(), "{:?}", report.failures);

        let post = out.path().join("2013/05/12/logging-facades/index.html");
        assert!(fs::read_to_string(&post).unwrap().contains("<code>slf4j</code>"));
        assert!(out.path().join("2012/03/01/managing-dependencies/index.html").exists());

        let home = fs::read_to_string(out.path().join("index.html")).unwrap();
        let newer = home.find("Logging Facades").unwrap();
        let older = home.find("Managing Dependencies").unwrap();
        assert!(newer < older);

        let java = fs::read_to_string(out.path().join("tags/java/index.html")).unwrap();
        assert!(java.contains("Tag: java"));
        assert!(java.contains("Managing Dependencies"));
        assert!(out.path().join("tags/build/index.html").exists());
        assert_eq!(report.written.len(), 5);
    }

    #[test]
    fn test_fail_fast_stops_at_first_failure() {
        let src = source();
        write(src.path(), "aaa-broken.md", "---\ntitle: Broken\n");
        let out = tempfile::tempdir().unwrap();
        let config = SiteConfig::default();
        let layouts = LayoutSet::builtin();
        let generator = Generator::new(&config, &layouts, out.path());

        let report = generator.build(&ContentLoader::new(src.path()), BuildOptions::default());
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].path().ends_with("aaa-broken.md"));
        assert!(report.written.is_empty());
        assert!(!out.path().join("index.html").exists());
    }

    #[test]
    fn test_continue_on_error_isolates_failures() {
        let src = source();
        write(src.path(), "broken.md", "---\ntitle: Broken\n");
        write(src.path(), "wide.md", "---\nlayout: wide\ndate: 2014-01-01\n---\nx\n");
        let out = tempfile::tempdir().unwrap();
        let config = SiteConfig::default();
        let layouts = LayoutSet::builtin();
        let generator = Generator::new(&config, &layouts, out.path());

        let report = generator.build(
            &ContentLoader::new(src.path()),
            BuildOptions {
                continue_on_error: true,
            },
        );
        assert_eq!(report.failures.len(), 2);
        assert!(matches!(report.failures[0], Error::Parse { .. }));
        assert!(matches!(report.failures[1], Error::LayoutNotFound { .. }));
        assert!(out.path().join("2013/05/12/logging-facades/index.html").exists());

        let home = fs::read_to_string(out.path().join("index.html")).unwrap();
        assert!(!home.contains("wide"));
    }

    #[test]
    fn test_pagination() {
        let src = tempfile::tempdir().unwrap();
        for day in 1..=3 {
            write(
                src.path(),
                &format!("p{}.md", day),
                &format!("---\ntitle: Post {}\ndate: 2020-01-0{}\n---\nbody\n", day, day),
            );
        }
        let out = tempfile::tempdir().unwrap();
        let mut config = SiteConfig::default();
        config.index_generator.per_page = 2;
        config.index_generator.tags = false;
        let layouts = LayoutSet::builtin();
        let generator = Generator::new(&config, &layouts, out.path());

        let report = generator.build(&ContentLoader::new(src.path()), BuildOptions::default());
        assert!(report.is_success());

        let first = fs::read_to_string(out.path().join("index.html")).unwrap();
        assert!(first.contains("Post 3") && first.contains("Post 2"));
        assert!(first.contains(r#"<a rel="next" href="/page/2/">"#));

        let second = fs::read_to_string(out.path().join("page/2/index.html")).unwrap();
        assert!(second.contains("Post 1"));
        assert!(second.contains(r#"<a rel="prev" href="/">"#));
    }

    #[test]
    fn test_index_generator_disabled() {
        let src = source();
        let out = tempfile::tempdir().unwrap();
        let mut config = SiteConfig::default();
        config.index_generator.enable = false;
        let layouts = LayoutSet::builtin();
        let generator = Generator::new(&config, &layouts, out.path());

        let report = generator.build(&ContentLoader::new(src.path()), BuildOptions::default());
        assert_eq!(report.written.len(), 2);
        assert!(!out.path().join("index.html").exists());
    }

    #[test]
    fn test_colliding_tags_share_a_page() {
        let src = tempfile::tempdir().unwrap();
        write(src.path(), "cpp.md", "---\ntitle: Templates\ndate: 2020-01-02\ntags: [C++, c]\n---\nx\n");
        write(src.path(), "cs.md", "---\ntitle: Generics\ndate: 2020-01-01\ntags: [C#, '++']\n---\nx\n");
        let config = SiteConfig::default();
        let layouts = LayoutSet::builtin();
        let generator = Generator::new(&config, &layouts, src.path().join("public"));

        let documents = ContentLoader::new(src.path()).load_sorted().unwrap();
        let tags = generator.group_by_tag(&documents);

        let keys: Vec<_> = tags.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["tags/2b2b/", "tags/c/"]);

        let c = &tags["tags/c/"];
        assert_eq!(c.name, "C++");
        assert_eq!(c.aliases, vec!["c", "C#"]);
        let titles: Vec<_> = c.entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Templates", "Generics"]);
    }

    #[test]
    fn test_unsluggable_tag_page_is_written() {
        let src = tempfile::tempdir().unwrap();
        write(src.path(), "a.md", "---\ntitle: Plus\ndate: 2020-01-01\ntags: ['++']\n---\nx\n");
        let out = tempfile::tempdir().unwrap();
        let config = SiteConfig::default();
        let layouts = LayoutSet::builtin();
        let generator = Generator::new(&config, &layouts, out.path());

        let report = generator.build(&ContentLoader::new(src.path()), BuildOptions::default());
        assert!(report.is_success());
        let page = fs::read_to_string(out.path().join("tags/2b2b/index.html")).unwrap();
        assert!(page.contains("Tag: ++"));
        assert!(!out.path().join("tags/index.html").exists());
    }
}
