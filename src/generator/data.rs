use handlebars::html_escape;
use serde::Serialize;

use crate::metadata::PostMeta;

#[derive(Serialize, Debug)]
pub(super) struct PageFields<'a> {
    pub title: &'a str,
    pub author: String,
    pub description: String,
}

impl<'a> From<&'a PostMeta> for PageFields<'a> {
    fn from(meta: &'a PostMeta) -> Self {
        Self {
            title: &meta.title,
            author: html_escape(&meta.author),
            description: html_escape(&meta.description),
        }
    }
}

#[derive(Serialize, Debug)]
pub(super) struct ArchiveItem<'a> {
    #[serde(flatten)]
    pub fields: PageFields<'a>,
    pub href: String,
}

impl<'a> From<&'a PostMeta> for ArchiveItem<'a> {
    fn from(meta: &'a PostMeta) -> Self {
        Self {
            fields: PageFields::from(meta),
            href: meta.html_file_name(),
        }
    }
}

#[derive(Serialize, Debug)]
pub(super) struct ArchivePageData<'a> {
    pub category: &'a str,
    pub count: usize,
}
