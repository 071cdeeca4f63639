use log::debug;
use maud::{html, PreEscaped};

use crate::{
    context::{Context, INSTALL_DIR},
    marker::{splice, Template, GUIDES_MARKER, INSTALL_GUIDES_MARKER},
    markdown::{extract_dir, HeadingCapture},
    metadata::PostMeta,
};

/// Guide links, split into the install subset and everything else.
pub(crate) struct Sidebar {
    template: Template,
    install: Vec<PostMeta>,
    guides: Vec<PostMeta>,
}

impl Sidebar {
    pub fn load(ctx: &Context) -> anyhow::Result<Self> {
        let template = Template::read(ctx.sidebar_template())?;

        let install_dir = ctx.install_dir();
        let install = if install_dir.is_dir() {
            extract_dir(&install_dir, HeadingCapture::Title)?
        } else {
            debug!("no install guides at {install_dir:?}");
            Vec::new()
        };
        let guides = extract_dir(&ctx.markdown_dir(), HeadingCapture::Title)?;

        Ok(Self {
            template,
            install,
            guides,
        })
    }

    /// `prefix` leads from the page being built back to the guides output
    /// directory, e.g. `../` for `guides/install/setup.html`.
    pub fn render(&self, prefix: &str) -> String {
        let install = link_list(&self.install, &format!("{prefix}{INSTALL_DIR}/"));
        let guides = link_list(&self.guides, prefix);

        let html = splice(
            &self.template.text,
            INSTALL_GUIDES_MARKER,
            &install,
            &self.template.path,
        );
        splice(&html, GUIDES_MARKER, &guides, &self.template.path)
    }
}

fn link_list(posts: &[PostMeta], prefix: &str) -> String {
    posts
        .iter()
        .map(|post| {
            html! {
                li { a href={ (prefix) (post.html_file_name()) } { (PreEscaped(&post.title)) } }
            }
            .into_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
