use std::{path::Path, sync::LazyLock};

use anyhow::Context as _;
use log::debug;
use maud::{html, PreEscaped};
use pulldown_cmark::{
    html::push_html, CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd,
};
use regex::Regex;

use crate::{highlight::render_code_block, metadata::PostMeta};

pub(crate) const AUTHOR_TAG: &str = "post-author";
pub(crate) const DESCRIPTION_TAG: &str = "post-description";
const ICON_END: &str = "</i>";
const SLUG_PUNCTUATION: &[char] = &[
    '.', ',', ':', ';', '!', '?', '\'', '"', '`', '/', '\\', '&', '*', '+', '=', '[', ']', '{',
    '}', '|',
];

static PARENTHESES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^()]*\)").expect("valid regex"));
static TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

/// Which heading levels set the title.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum HeadingCapture {
    Title,
    TitleAndSubtitle,
}

impl HeadingCapture {
    fn captures(self, level: HeadingLevel) -> bool {
        match self {
            Self::Title => level == HeadingLevel::H1,
            Self::TitleAndSubtitle => matches!(level, HeadingLevel::H1 | HeadingLevel::H2),
        }
    }
}

#[derive(Debug)]
pub(crate) struct RenderedPage {
    pub meta: PostMeta,
    pub body: String,
}

fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options
}

/// Drops `</i>` and everything before it.
pub(crate) fn strip_icon(heading: &str) -> &str {
    match heading.find(ICON_END) {
        Some(i) => &heading[i + ICON_END.len()..],
        None => heading,
    }
}

pub(crate) fn slugify(heading: &str) -> String {
    let text = TAGS.replace_all(strip_icon(heading), "");
    // innermost groups first, until nested ones are gone
    let mut text = text.into_owned();
    while PARENTHESES.is_match(&text) {
        text = PARENTHESES.replace_all(&text, "").into_owned();
    }
    let text: String = text
        .chars()
        .filter(|c| !SLUG_PUNCTUATION.contains(c))
        .collect::<String>()
        .to_lowercase();
    text.split_whitespace().collect::<Vec<_>>().join("-")
}

enum Pending<'a> {
    Heading {
        start: Event<'a>,
        level: HeadingLevel,
        inner: Vec<Event<'a>>,
    },
    Code {
        tag: String,
        text: String,
    },
}

/// Per-render accumulator. Captures metadata and, when asked, the rewritten
/// body events.
struct Hooks<'a> {
    meta: PostMeta,
    capture: HeadingCapture,
    keep_body: bool,
    pending: Option<Pending<'a>>,
    body: Vec<Event<'a>>,
}

impl<'a> Hooks<'a> {
    fn new(file_name: &str, capture: HeadingCapture, keep_body: bool) -> Self {
        Self {
            meta: PostMeta::new(file_name),
            capture,
            keep_body,
            pending: None,
            body: Vec::new(),
        }
    }

    fn on_event(&mut self, event: Event<'a>) {
        match self.pending.take() {
            Some(Pending::Heading {
                start,
                level,
                mut inner,
            }) => {
                if matches!(event, Event::End(TagEnd::Heading(_))) {
                    self.finish_heading(start, level, inner, event);
                } else {
                    inner.push(event);
                    self.pending = Some(Pending::Heading { start, level, inner });
                }
            }
            Some(Pending::Code { tag, mut text }) => match event {
                Event::End(TagEnd::CodeBlock) => self.finish_code(&tag, &text),
                Event::Text(t) => {
                    text.push_str(&t);
                    self.pending = Some(Pending::Code { tag, text });
                }
                _ => self.pending = Some(Pending::Code { tag, text }),
            },
            None => self.on_block_event(event),
        }
    }

    fn on_block_event(&mut self, event: Event<'a>) {
        match event {
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) => {
                self.pending = Some(Pending::Heading {
                    start: Event::Start(Tag::Heading {
                        level,
                        id,
                        classes,
                        attrs,
                    }),
                    level,
                    inner: Vec::new(),
                });
            }
            Event::Start(Tag::CodeBlock(kind)) => {
                let tag = match kind {
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().unwrap_or_default().to_string()
                    }
                    CodeBlockKind::Indented => String::new(),
                };
                self.pending = Some(Pending::Code {
                    tag,
                    text: String::new(),
                });
            }
            event => {
                if self.keep_body {
                    self.body.push(event);
                }
            }
        }
    }

    fn finish_heading(
        &mut self,
        start: Event<'a>,
        level: HeadingLevel,
        inner: Vec<Event<'a>>,
        end: Event<'a>,
    ) {
        let mut inner_html = String::new();
        push_html(&mut inner_html, inner.iter().cloned());

        if self.capture.captures(level) {
            self.meta.title = strip_icon(&inner_html).trim().to_string();
        }
        if !self.keep_body {
            return;
        }

        let slug = slugify(&plain_text(&inner));
        if level == HeadingLevel::H1 && !slug.is_empty() {
            let markup = html! {
                h1 id=(slug) {
                    a.anchor href={ "#" (slug) } aria-hidden="true" { "#" }
                    (PreEscaped(inner_html))
                }
            };
            self.body.push(Event::Html(markup.into_string().into()));
        } else {
            self.body.push(start);
            self.body.extend(inner);
            self.body.push(end);
        }
    }

    fn finish_code(&mut self, tag: &str, text: &str) {
        let literal = text.trim_end_matches('\n').to_string();
        match tag {
            AUTHOR_TAG => self.meta.author = literal,
            DESCRIPTION_TAG => self.meta.description = literal,
            _ => {
                if self.keep_body {
                    self.body.push(Event::Html(render_code_block(tag, text).into()));
                }
            }
        }
    }
}

/// Heading source text: raw inline HTML plus unescaped text.
fn plain_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::Text(t) | Event::Code(t) | Event::InlineHtml(t) | Event::Html(t) => {
                text.push_str(t)
            }
            _ => {}
        }
    }
    text
}

fn run<'a>(
    file_name: &str,
    source: &'a str,
    capture: HeadingCapture,
    keep_body: bool,
) -> Hooks<'a> {
    let mut hooks = Hooks::new(file_name, capture, keep_body);
    for event in Parser::new_ext(source, options()) {
        hooks.on_event(event);
    }
    hooks
}

/// Runs the hooks without producing any HTML.
pub(crate) fn extract_meta(file_name: &str, source: &str, capture: HeadingCapture) -> PostMeta {
    run(file_name, source, capture, false).meta
}

pub(crate) fn render_page(file_name: &str, source: &str) -> RenderedPage {
    let hooks = run(file_name, source, HeadingCapture::Title, true);
    let mut body = String::new();
    push_html(&mut body, hooks.body.into_iter());
    RenderedPage {
        meta: hooks.meta,
        body,
    }
}

/// One record per `.md` file directly inside `dir`, ordered by file name.
pub(crate) fn extract_dir(dir: &Path, capture: HeadingCapture) -> anyhow::Result<Vec<PostMeta>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("while listing {dir:?}"))? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "md") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut posts = Vec::with_capacity(paths.len());
    for path in paths {
        let source = std::fs::read_to_string(&path)
            .with_context(|| format!("while reading {path:?}"))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let meta = extract_meta(&file_name, &source, capture);
        debug!("extracted {meta:?}");
        posts.push(meta);
    }
    Ok(posts)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GUIDE: &str = "# Guide Title\n\n```post-author\nJane Doe\n```\n\nSome text.\n";

    #[test]
    fn captures_title_and_author() {
        let meta = extract_meta("guide.md", GUIDE, HeadingCapture::Title);
        assert_eq!(
            meta,
            PostMeta {
                file_name: "guide.md".to_string(),
                title: "Guide Title".to_string(),
                author: "Jane Doe".to_string(),
                description: String::new(),
            }
        );
    }

    #[test]
    fn captures_description() {
        let source = "# T\n\n```post-description\nHow to set things up.\n```\n";
        let meta = extract_meta("t.md", source, HeadingCapture::Title);
        assert_eq!(meta.description, "How to set things up.");
    }

    #[test]
    fn last_heading_wins() {
        let source = "# First\n\n## Second\n\n# Third\n";
        assert_eq!(extract_meta("a.md", source, HeadingCapture::Title).title, "Third");

        let source = "# First\n\n## Second\n";
        assert_eq!(extract_meta("a.md", source, HeadingCapture::Title).title, "First");
        assert_eq!(
            extract_meta("a.md", source, HeadingCapture::TitleAndSubtitle).title,
            "Second"
        );
    }

    #[test]
    fn icon_is_stripped_from_title_and_anchor() {
        let source = "# <i class=\"icon\"></i>Getting Started\n";
        let page = render_page("start.md", source);
        assert_eq!(page.meta.title, "Getting Started");
        assert!(page.body.contains(r#"<h1 id="getting-started">"#));
        assert!(page.body.contains(r##"href="#getting-started""##));
        assert!(page.body.contains("anchor"));
        assert!(page.body.contains(r#"<i class="icon"></i>Getting Started</h1>"#));
    }

    #[test]
    fn slug_rules() {
        assert_eq!(slugify(r#"<i class="icon"></i>Getting Started"#), "getting-started");
        assert_eq!(slugify("Install (Linux) & Setup: Part 1!"), "install-setup-part-1");
        assert_eq!(slugify("  Why?  "), "why");
        assert_eq!(slugify("Setup (Linux (x86)) Notes"), "setup-notes");
        assert_eq!(slugify("A (b) c (d (e) f) g"), "a-c-g");
    }

    #[test]
    fn metadata_blocks_are_not_rendered() {
        let source = "# T\n\n```post-author\nJane\n```\n\n```post-description\nD\n```\n\ntext\n";
        let page = render_page("t.md", source);
        assert!(!page.body.contains("Jane"));
        assert!(!page.body.contains("copy-button"));
        assert!(page.body.contains("<p>text</p>"));
        assert_eq!(page.meta.author, "Jane");
    }

    #[test]
    fn code_blocks_are_highlighted() {
        let source = "```\nls -la\n```\n\n```command-line\nmake\n```\n";
        let page = render_page("t.md", source);
        assert_eq!(page.body.matches("copy-button").count(), 2);
        assert!(page.body.contains("language-bash command-line"));
    }

    #[test]
    fn lower_headings_render_unchanged() {
        let page = render_page("t.md", "## Details\n");
        assert!(page.body.contains("<h2>Details</h2>"));
    }

    #[test]
    fn extract_dir_is_flat_and_sorted() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.md"), "# Bee\n").unwrap();
        std::fs::write(dir.path().join("a.md"), "# Ay\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "# Skip\n").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/c.md"), "# Sea\n").unwrap();

        let posts = extract_dir(dir.path(), HeadingCapture::Title).unwrap();
        let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["Ay", "Bee"]);
        assert_eq!(posts[0].file_name, "a.md");
    }

    #[cfg(unix)]
    #[test]
    fn extract_dir_follows_file_symlinks() {
        let dir = tempfile::TempDir::new().unwrap();
        let shared = tempfile::TempDir::new().unwrap();
        std::fs::write(shared.path().join("shared.md"), "# Shared\n").unwrap();
        std::os::unix::fs::symlink(shared.path().join("shared.md"), dir.path().join("linked.md"))
            .unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone.md"), dir.path().join("broken.md"))
            .unwrap();

        let posts = extract_dir(dir.path(), HeadingCapture::Title).unwrap();
        let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["Shared"]);
        assert_eq!(posts[0].file_name, "linked.md");
    }

    #[test]
    fn extract_dir_missing_directory_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(extract_dir(&dir.path().join("nope"), HeadingCapture::Title).is_err());
    }
}
