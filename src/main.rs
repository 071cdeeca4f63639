use std::path::{Component, PathBuf};

use clap::{command, value_parser, Arg, ArgAction, ArgMatches, Command};
use context::{Context, Section};
use generator::{build_archive, is_markdown, PageBuilder};
use log::{error, info};

mod context;
mod generator;
mod highlight;
mod marker;
mod markdown;
mod metadata;
mod renderer;

fn cli() -> Command {
    command!()
        .about("Builds guide pages and archive listings from markdown")
        .args(&[
            Arg::new("author")
                .long("author")
                .value_name("NAME")
                .help("Author shown on built pages. Overrides `post-author` blocks."),
            Arg::new("file")
                .long("file")
                .value_name("FILE.md")
                .value_parser(value_parser!(PathBuf))
                .help("Markdown file to build, relative to the section's markdown directory"),
            Arg::new("all")
                .long("all")
                .action(ArgAction::SetTrue)
                .help("Build every markdown file of the section, including subdirectories"),
            Arg::new("archive")
                .long("archive")
                .value_name("CATEGORY")
                .help("Build the archive listing page of a category"),
            Arg::new("root")
                .long("root")
                .value_name("DIR")
                .value_parser(value_parser!(PathBuf))
                .default_value(".")
                .help("Site root holding sources, templates and outputs"),
            Arg::new("section")
                .long("section")
                .value_name("NAME")
                .default_value("guides")
                .help("Page section to build"),
        ])
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let root: &PathBuf = matches
        .get_one("root")
        .ok_or_else(|| anyhow::anyhow!("--root has a default"))?;
    let section_name: &String = matches
        .get_one("section")
        .ok_or_else(|| anyhow::anyhow!("--section has a default"))?;
    let section: Section = match section_name.parse() {
        Ok(section) => section,
        Err(e) => {
            error!("{e}");
            return Ok(());
        }
    };
    let ctx = Context::new(root, section);
    let author = matches.get_one::<String>("author").map(String::as_str);
    let file = matches.get_one::<PathBuf>("file");
    let all = matches.get_flag("all");
    let archive = matches.get_one::<String>("archive");

    if !all && file.is_none() && archive.is_none() {
        cli().print_help()?;
        return Ok(());
    }

    if let Some(category) = archive {
        build_archive(&ctx, category)?;
    }

    if all {
        let built = PageBuilder::new(&ctx)?.build_all(author)?;
        info!("built {built} pages");
    } else if let Some(file) = file {
        if !is_markdown(file) {
            error!("--file must name a markdown (.md) file, got {file:?}");
            return Ok(());
        }
        if file.is_absolute() || file.components().any(|c| c == Component::ParentDir) {
            error!("--file must stay inside {:?}, got {file:?}", ctx.markdown_dir());
            return Ok(());
        }
        let source = ctx.markdown_dir().join(file);
        if !source.is_file() {
            error!("no such file: {source:?}");
            return Ok(());
        }
        PageBuilder::new(&ctx)?.build_file(file, author)?;
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if std::env::args_os().len() <= 1 {
        cli().print_help()?;
        return Ok(());
    }

    run(&cli().get_matches())
}
