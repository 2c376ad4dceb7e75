use anyhow::{anyhow, Result};
use annotator_leiden::{render_html, try_render, visible_text, DisplayError};
use clap::{Args, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use tracing::info;

use super::{read_source, source_name};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RenderFormat {
    /// Leiden conventions as plain text
    Text,
    /// Display tree as HTML spans
    Html,
    /// Display tree as JSON
    Json,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Transcription file, or - for stdin
    pub input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: RenderFormat,
}

pub fn render(args: RenderArgs, _cwd: &str) -> Result<()> {
    let source = read_source(&args.input)?;

    let nodes = match try_render(&source) {
        Ok(nodes) => nodes,
        Err(DisplayError::Parse(err)) => {
            // Line breaks are dropped before parsing, so offsets refer to
            // the flattened text
            let flattened = source.replace('\n', "");
            eprintln!("{}", err.report(&source_name(&args.input), &flattened));
            return Err(anyhow!("{} does not parse", source_name(&args.input)));
        }
        Err(err) => return Err(err.into()),
    };
    info!(nodes = nodes.len(), format = ?args.format, "Rendered transcription");

    match args.format {
        RenderFormat::Text => println!("{}", visible_text(&nodes)),
        RenderFormat::Html => println!("{}", render_html(&nodes)),
        RenderFormat::Json => println!("{}", serde_json::to_string_pretty(&nodes)?),
    }

    eprintln!("{} {}", "✓".green(), source_name(&args.input));
    Ok(())
}
