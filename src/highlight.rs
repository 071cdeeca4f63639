//! Code block rendering: syntect highlighting inside a copy-button wrapper.

use std::sync::OnceLock;

use log::debug;
use maud::{html, PreEscaped};
use syntect::{
    highlighting::{Theme, ThemeSet},
    html::highlighted_html_for_string,
    parsing::{SyntaxReference, SyntaxSet},
};

/// Language used for untagged, unknown and `command-line` blocks.
pub(crate) const BASELINE_LANGUAGE: &str = "bash";
pub(crate) const COMMAND_LINE_TAG: &str = "command-line";

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
static THEME: OnceLock<Theme> = OnceLock::new();

fn syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme() -> &'static Theme {
    THEME.get_or_init(|| {
        let mut theme_set = ThemeSet::load_defaults();
        theme_set
            .themes
            .remove("InspiredGitHub")
            .or_else(|| theme_set.themes.remove("base16-ocean.light"))
            .unwrap_or_default()
    })
}

fn find_syntax(lang: &str) -> Option<&'static SyntaxReference> {
    let ss = syntax_set();
    ss.find_syntax_by_token(lang)
        .or_else(|| ss.find_syntax_by_extension(lang))
}

/// How a fenced block's language tag is presented.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct CodeLanguage {
    pub name: String,
    pub command_line: bool,
}

impl CodeLanguage {
    pub fn resolve(tag: &str) -> Self {
        let tag = tag.trim();
        if tag == COMMAND_LINE_TAG {
            return Self {
                name: BASELINE_LANGUAGE.to_string(),
                command_line: true,
            };
        }
        let name = if !tag.is_empty() && find_syntax(tag).is_some() {
            tag.to_ascii_lowercase()
        } else {
            if !tag.is_empty() {
                debug!("unsupported code language {tag:?}, using {BASELINE_LANGUAGE}");
            }
            BASELINE_LANGUAGE.to_string()
        };
        Self {
            name,
            command_line: false,
        }
    }

    fn classes(&self) -> String {
        let mut classes = format!("code-block language-{}", self.name);
        if self.command_line {
            classes.push(' ');
            classes.push_str(COMMAND_LINE_TAG);
        }
        classes
    }
}

fn highlight(code: &str, language: &CodeLanguage) -> String {
    let ss = syntax_set();
    let syntax = find_syntax(&language.name).unwrap_or_else(|| ss.find_syntax_plain_text());
    match highlighted_html_for_string(code, ss, syntax, theme()) {
        Ok(html) => html,
        Err(e) => {
            debug!("highlighting failed ({e}), emitting plain code");
            html! { pre { code { (code) } } }.into_string()
        }
    }
}

pub(crate) fn render_code_block(tag: &str, code: &str) -> String {
    let language = CodeLanguage::resolve(tag);
    html! {
        div class=(language.classes()) {
            button.copy-button type="button" { "Copy" }
            (PreEscaped(highlight(code, &language)))
        }
    }
    .into()
}
