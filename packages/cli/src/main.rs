mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{check, config, render, tags, CheckArgs, ConfigArgs, RenderArgs, TagsArgs};
use tracing_subscriber::EnvFilter;

/// Annotator CLI - inspect and validate annotated transcriptions
#[derive(Parser, Debug)]
#[command(name = "annotator")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a transcription with Leiden conventions
    Render(RenderArgs),

    /// List the entity tags of a transcription
    Tags(TagsArgs),

    /// Check whether a selection can be tagged
    Check(CheckArgs),

    /// Inspect or create annotator.config.json
    Config(ConfigArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Render(args) => render(args, &cwd),
        Command::Tags(args) => tags(args, &cwd),
        Command::Check(args) => check(args, &cwd),
        Command::Config(args) => config(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
