use anyhow::{bail, Context, Result};
use clap::{Arg, ArgMatches, Command};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use docfx_yaml::docfields::FieldExtractor;
use docfx_yaml::parser::parse_doctree;
use docfx_yaml::renderer::{MarkdownRenderer, Newline, RenderConfig};

fn cli() -> Command {
    let input = Arg::new("input")
        .help("Doctree JSON file")
        .required(true)
        .index(1);
    let output = Arg::new("output")
        .short('o')
        .long("output")
        .value_name("FILE")
        .help("Write to FILE instead of stdout");

    Command::new("docfx-yaml")
        .about("Render Sphinx doctrees as DocFX Markdown")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .global(true)
                .help("YAML file with rendering options"),
        )
        .arg(
            Arg::new("width")
                .long("width")
                .value_name("N")
                .global(true)
                .value_parser(clap::value_parser!(usize))
                .help("Maximum line width"),
        )
        .arg(
            Arg::new("newline")
                .long("newline")
                .value_name("STYLE")
                .global(true)
                .value_parser(["native", "unix", "windows", "lf", "crlf"])
                .help("Line ending of the output"),
        )
        .arg(
            Arg::new("static-dir")
                .long("static-dir")
                .value_name("NAME")
                .global(true)
                .help("Directory name image paths are rewritten relative to"),
        )
        .arg(
            Arg::new("source-root")
                .long("source-root")
                .value_name("DIR")
                .global(true)
                .help("Emit include markers for code blocks sourced below DIR"),
        )
        .subcommand(
            Command::new("render")
                .about("Render a doctree to Markdown")
                .arg(input.clone())
                .arg(output.clone()),
        )
        .subcommand(
            Command::new("fields")
                .about("Extract info-field data as YAML")
                .arg(input)
                .arg(output),
        )
}

fn load_config(matches: &ArgMatches) -> Result<RenderConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => RenderConfig::from_path(Path::new(path))
            .with_context(|| format!("failed to load config from {}", path))?,
        None => RenderConfig::default(),
    };

    if let Some(width) = matches.get_one::<usize>("width") {
        config.width = *width;
    }
    if let Some(name) = matches.get_one::<String>("newline") {
        match Newline::from_name(name) {
            Some(newline) => config.newline = newline,
            None => bail!("unknown newline style `{}`", name),
        }
    }
    if let Some(static_dir) = matches.get_one::<String>("static-dir") {
        config.static_dir = static_dir.clone();
    }
    if let Some(source_root) = matches.get_one::<String>("source-root") {
        config.source_root = Some(PathBuf::from(source_root));
    }

    Ok(config)
}

fn read_input(matches: &ArgMatches) -> Result<String> {
    let input = matches
        .get_one::<String>("input")
        .context("missing input file")?;
    fs::read_to_string(input).with_context(|| format!("failed to read {}", input))
}

fn write_output(matches: &ArgMatches, content: &str) -> Result<()> {
    match matches.get_one::<String>("output") {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("failed to write {}", path))?;
            info!(path = %path, "wrote output");
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_env("DOCFX_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let matches = cli().get_matches();

    match matches.subcommand() {
        Some(("render", sub)) => {
            let config = load_config(sub)?;
            let json = read_input(sub)?;
            let rendered = MarkdownRenderer::new(config.clone())
                .render_json(&json)
                .context("failed to render doctree")?;
            let mut markdown = rendered.markdown;
            if !markdown.is_empty() {
                markdown.push_str(config.newline.as_str());
            }
            write_output(sub, &markdown)?;
        }
        Some(("fields", sub)) => {
            let config = load_config(sub)?;
            let json = read_input(sub)?;
            let tree = parse_doctree(&json).context("failed to load doctree")?;
            let fields = FieldExtractor::new(config)
                .extract(&tree)
                .context("failed to extract info fields")?;
            write_output(sub, &fields.to_yaml()?)?;
        }
        _ => bail!("no subcommand given"),
    }

    Ok(())
}
