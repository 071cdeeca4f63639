use std::path::PathBuf;

use anyhow::Context as _;
use log::info;
use maud::html;

use super::{
    data::{ArchiveItem, ArchivePageData},
    sidebar::Sidebar,
    write_output,
};
use crate::{
    context::Context,
    marker::{splice, Template, POSTS_MARKER, SIDEBAR_MARKER},
    markdown::{extract_dir, HeadingCapture},
    renderer::{self, ARCHIVE, ARCHIVE_ITEM},
};

const ARCHIVE_HEADING: &str = "All Posts";

/// Writes `<root>/<category>/index.html` listing every post of the category.
pub(crate) fn build_archive(ctx: &Context, category: &str) -> anyhow::Result<PathBuf> {
    let archive = Template::read(ctx.archive_template(category))?;
    let item = Template::read(ctx.archive_item_template(category))?;

    let mut handlebars = renderer::generate_renderer();
    renderer::register(&mut handlebars, ARCHIVE, &archive)?;
    renderer::register(&mut handlebars, ARCHIVE_ITEM, &item)?;

    let sidebar = Sidebar::load(ctx)?.render(&format!("../{}/", ctx.section));
    let posts = extract_dir(
        &ctx.archive_markdown_dir(category),
        HeadingCapture::TitleAndSubtitle,
    )?;

    let mut items = vec![html! { h2.archive-heading { (ARCHIVE_HEADING) } }.into_string()];
    for post in &posts {
        let rendered = handlebars
            .render(ARCHIVE_ITEM, &ArchiveItem::from(post))
            .with_context(|| format!("while rendering archive item {:?}", post.file_name))?;
        items.push(rendered);
    }

    let page = handlebars
        .render(
            ARCHIVE,
            &ArchivePageData {
                category,
                count: posts.len(),
            },
        )
        .with_context(|| format!("while generating archive for {category:?}"))?;
    let html = splice(&page, SIDEBAR_MARKER, &sidebar, &archive.path);
    let html = splice(&html, POSTS_MARKER, &items.join("\n"), &archive.path);

    let out_path = ctx.archive_output(category);
    write_output(&out_path, &html)?;
    info!("archive {category:?}: {} posts", posts.len());
    Ok(out_path)
}
