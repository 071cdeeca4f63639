use std::{
    collections::VecDeque,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use handlebars::Handlebars;
use log::{debug, info};

use crate::{
    context::Context,
    marker::{splice, Template, CONTENT_MARKER, SIDEBAR_MARKER},
    markdown,
    renderer::{self, PAGE},
};

mod archive;
mod data;
mod sidebar;
#[cfg(test)]
pub(crate) mod testutil;

pub(crate) use archive::build_archive;
use data::PageFields;
use sidebar::Sidebar;

pub(crate) fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "md")
}

fn write_output(path: &Path, html: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs_extra::dir::create_all(parent, false)
            .with_context(|| format!("while creating {parent:?}"))?;
    }
    std::fs::write(path, html).with_context(|| format!("while writing {path:?}"))?;
    info!("wrote {path:?}");
    Ok(())
}

/// Builds guide pages. Templates and sidebar entries are loaded once and
/// reused for every page.
pub(crate) struct PageBuilder<'c> {
    ctx: &'c Context,
    handlebars: Handlebars<'static>,
    template_path: PathBuf,
    sidebar: Sidebar,
}

impl<'c> PageBuilder<'c> {
    pub fn new(ctx: &'c Context) -> anyhow::Result<Self> {
        let template = Template::read(ctx.page_template())?;
        let mut handlebars = renderer::generate_renderer();
        renderer::register(&mut handlebars, PAGE, &template)?;

        Ok(Self {
            ctx,
            handlebars,
            template_path: template.path,
            sidebar: Sidebar::load(ctx)?,
        })
    }

    /// One `../` per directory between `out_path` and the output root.
    fn sidebar_prefix(&self, out_path: &Path) -> String {
        let depth = out_path
            .strip_prefix(self.ctx.output_dir())
            .map(|rel| rel.components().count().saturating_sub(1))
            .unwrap_or(0);
        "../".repeat(depth)
    }

    pub fn build(
        &self,
        md_path: &Path,
        out_path: &Path,
        author: Option<&str>,
    ) -> anyhow::Result<()> {
        let source = std::fs::read_to_string(md_path)
            .with_context(|| format!("while reading {md_path:?}"))?;
        let file_name = md_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let page = markdown::render_page(&file_name, &source);
        let meta = page.meta.with_author_override(author);

        let filled = self
            .handlebars
            .render(PAGE, &PageFields::from(&meta))
            .with_context(|| format!("while generating from {md_path:?}"))?;
        let sidebar = self.sidebar.render(&self.sidebar_prefix(out_path));
        let html = splice(&filled, SIDEBAR_MARKER, &sidebar, &self.template_path);
        let html = splice(&html, CONTENT_MARKER, &page.body, &self.template_path);

        write_output(out_path, &html)
    }

    /// `rel_md` is relative to the section's markdown directory.
    pub fn build_file(&self, rel_md: &Path, author: Option<&str>) -> anyhow::Result<()> {
        self.build(
            &self.ctx.markdown_dir().join(rel_md),
            &self.ctx.page_output(rel_md),
            author,
        )
    }

    /// Builds every markdown file below the markdown directory, one at a
    /// time. The first failure aborts the run.
    pub fn build_all(&self, author: Option<&str>) -> anyhow::Result<usize> {
        let markdown_dir = self.ctx.markdown_dir();
        let mut built = 0;

        let mut q = VecDeque::new();
        q.push_back(PathBuf::new());
        while let Some(rel_dir) = q.pop_front() {
            let dir = markdown_dir.join(&rel_dir);
            debug!("visiting {dir:?}");

            let mut entries = std::fs::read_dir(&dir)
                .with_context(|| format!("while listing {dir:?}"))?
                .collect::<Result<Vec<_>, _>>()?;
            entries.sort_by_key(|entry| entry.file_name());

            for entry in entries {
                let rel_path = rel_dir.join(entry.file_name());
                if entry.file_type()?.is_dir() {
                    q.push_back(rel_path);
                } else if is_markdown(&rel_path) && entry.path().is_file() {
                    self.build_file(&rel_path, author)?;
                    built += 1;
                }
            }
        }

        Ok(built)
    }
}
