use std::{fs, path::Path};

use tempfile::TempDir;

use crate::context::{Context, Section};

pub(crate) const PAGE_TEMPLATE: &str = "<!DOCTYPE html>
<html>
<head>
<title>{{title}}</title>
<meta name=\"author\" content=\"{{author}}\">
<meta name=\"description\" content=\"{{description}}\">
</head>
<body>
<!-- sidebar -->
<main>
<!-- content -->
</main>
</body>
</html>
";

pub(crate) const SIDEBAR_TEMPLATE: &str = "<nav class=\"sidebar\">
<ul class=\"install\">
<!-- install guides -->
</ul>
<ul class=\"guides\">
<!-- guides -->
</ul>
</nav>";

pub(crate) fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// A throwaway site root with templates and a few guides.
pub(crate) struct Site {
    pub ctx: Context,
    _dir: TempDir,
}

impl Site {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let ctx = Context::new(dir.path(), Section::Guides);

        write(&ctx.page_template(), PAGE_TEMPLATE);
        write(&ctx.sidebar_template(), SIDEBAR_TEMPLATE);

        let md = ctx.markdown_dir();
        write(&md.join("a.md"), "# Alpha\n\nFirst guide.\n");
        write(
            &md.join("b.md"),
            "# Beta\n\n```post-author\nBob\n```\n\n```post-description\nSecond guide.\n```\n",
        );
        write(&md.join("install/setup.md"), "# <i class=\"fa fa-cog\"></i>Setup\n");
        write(&md.join("sub/c.md"), "# Gamma\n\nNested guide.\n");

        Self { ctx, _dir: dir }
    }
}
