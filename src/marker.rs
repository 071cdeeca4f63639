use std::path::{Path, PathBuf};

use anyhow::Context as _;
use log::warn;

pub(crate) const SIDEBAR_MARKER: &str = "<!-- sidebar -->";
pub(crate) const CONTENT_MARKER: &str = "<!-- content -->";
pub(crate) const INSTALL_GUIDES_MARKER: &str = "<!-- install guides -->";
pub(crate) const GUIDES_MARKER: &str = "<!-- guides -->";
pub(crate) const POSTS_MARKER: &str = "<!-- posts -->";

#[derive(thiserror::Error, Debug)]
pub(crate) enum TemplateError {
    #[error("template {path:?} is not valid UTF-8 text")]
    NotText {
        path: PathBuf,
        #[source]
        source: std::str::Utf8Error,
    },
}

/// Index of the first line containing `marker`.
pub(crate) fn marker_line(template: &str, marker: &str) -> Option<usize> {
    template.split('\n').position(|line| line.contains(marker))
}

/// Inserts `block` as whole lines right after the first line containing
/// `marker`. Without a marker line the block goes to the top.
pub(crate) fn insert_after_marker(template: &str, marker: &str, block: &str) -> String {
    let mut lines: Vec<&str> = template.split('\n').collect();
    let at = marker_line(template, marker).map_or(0, |i| i + 1);
    lines.insert(at, block);
    lines.join("\n")
}

/// Template text loaded from disk.
#[derive(Debug, Clone)]
pub(crate) struct Template {
    pub path: PathBuf,
    pub text: String,
}

impl Template {
    pub fn read(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let bytes =
            std::fs::read(path).with_context(|| format!("while reading template {path:?}"))?;
        Ok(Self::from_bytes(path, bytes)?)
    }

    pub fn from_bytes(path: impl Into<PathBuf>, bytes: Vec<u8>) -> Result<Self, TemplateError> {
        let path = path.into();
        match String::from_utf8(bytes) {
            Ok(text) => Ok(Self { path, text }),
            Err(e) => Err(TemplateError::NotText {
                path,
                source: e.utf8_error(),
            }),
        }
    }
}

/// Same as [`insert_after_marker`] but reports a missing marker.
pub(crate) fn splice(document: &str, marker: &str, block: &str, origin: &Path) -> String {
    if marker_line(document, marker).is_none() {
        warn!("marker {marker:?} not found in {origin:?}, inserting at the top");
    }
    insert_after_marker(document, marker, block)
}
