#[derive(serde::Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PostMeta {
    pub file_name: String,
    /// Inner HTML of the captured heading, icon markup removed.
    pub title: String,
    pub author: String,
    pub description: String,
}

impl PostMeta {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            ..Default::default()
        }
    }

    /// `guide.md` -> `guide.html`
    pub fn html_file_name(&self) -> String {
        let stem = self
            .file_name
            .strip_suffix(".md")
            .unwrap_or(&self.file_name);
        format!("{stem}.html")
    }

    /// An explicit author always wins over one found in the document.
    pub fn with_author_override(mut self, author: Option<&str>) -> Self {
        if let Some(author) = author {
            self.author = author.to_string();
        }
        self
    }
}
