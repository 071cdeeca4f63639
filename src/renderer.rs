use anyhow::Context;
use handlebars::Handlebars;

use crate::marker::Template;

pub(crate) const PAGE: &str = "page";
pub(crate) const ARCHIVE: &str = "archive";
pub(crate) const ARCHIVE_ITEM: &str = "archive-item";

/// Field values are already HTML, so nothing is escaped here.
pub(crate) fn generate_renderer() -> Handlebars<'static> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars
}

pub(crate) fn register(
    handlebars: &mut Handlebars<'static>,
    name: &str,
    template: &Template,
) -> anyhow::Result<()> {
    handlebars
        .register_template_string(name, &template.text)
        .with_context(|| format!("while parsing template {:?}", template.path))
}
