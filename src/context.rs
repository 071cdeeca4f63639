use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::bail;

pub(crate) const TEMPLATE_DIR: &str = "templates";
pub(crate) const INSTALL_DIR: &str = "install";

/// A page section with a sidebar. Only guides have one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Section {
    Guides,
}

impl Section {
    pub fn name(self) -> &'static str {
        match self {
            Self::Guides => "guides",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Section {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "guides" => Ok(Self::Guides),
            _ => bail!("unsupported section {s:?}, only \"guides\" has pages"),
        }
    }
}

/// Where sources, templates and outputs live under the site root.
#[derive(Debug, Clone)]
pub(crate) struct Context {
    pub root: PathBuf,
    pub section: Section,
}

impl Context {
    pub fn new(root: impl Into<PathBuf>, section: Section) -> Self {
        Self {
            root: root.into(),
            section,
        }
    }

    fn template(&self, name: &str) -> PathBuf {
        self.root.join(TEMPLATE_DIR).join(format!("{name}.html"))
    }

    /// `<root>/guides-markdown`
    pub fn markdown_dir(&self) -> PathBuf {
        self.root.join(format!("{}-markdown", self.section))
    }

    pub fn install_dir(&self) -> PathBuf {
        self.markdown_dir().join(INSTALL_DIR)
    }

    /// `<root>/guides`
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(self.section.name())
    }

    pub fn page_template(&self) -> PathBuf {
        self.template(&format!("{}-page", self.section))
    }

    pub fn sidebar_template(&self) -> PathBuf {
        self.template(&format!("{}-sidebar", self.section))
    }

    /// Output path mirroring `rel_md` below the output directory.
    pub fn page_output(&self, rel_md: &Path) -> PathBuf {
        self.output_dir().join(rel_md).with_extension("html")
    }

    pub fn archive_markdown_dir(&self, category: &str) -> PathBuf {
        self.root.join(format!("{category}-markdown"))
    }

    pub fn archive_template(&self, category: &str) -> PathBuf {
        self.template(&format!("{category}-archive"))
    }

    pub fn archive_item_template(&self, category: &str) -> PathBuf {
        self.template(&format!("{category}-item"))
    }

    pub fn archive_output(&self, category: &str) -> PathBuf {
        self.root.join(category).join("index.html")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_names() {
        assert_eq!("guides".parse::<Section>().unwrap(), Section::Guides);
        assert!("blog".parse::<Section>().is_err());
    }

    #[test]
    fn layout_paths() {
        let ctx = Context::new("site", Section::Guides);
        assert_eq!(ctx.markdown_dir(), Path::new("site/guides-markdown"));
        assert_eq!(ctx.install_dir(), Path::new("site/guides-markdown/install"));
        assert_eq!(ctx.page_template(), Path::new("site/templates/guides-page.html"));
        assert_eq!(
            ctx.page_output(Path::new("install/setup.md")),
            Path::new("site/guides/install/setup.html")
        );
        assert_eq!(ctx.archive_output("blog"), Path::new("site/blog/index.html"));
        assert_eq!(
            ctx.archive_item_template("blog"),
            Path::new("site/templates/blog-item.html")
        );
    }
}
