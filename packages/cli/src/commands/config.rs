use anyhow::Result;
use annotator_workspace::{AnnotatorConfig, DEFAULT_CONFIG_NAME};
use clap::{Args, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Validate the configuration and print the effective values
    Check,

    /// Write a configuration file with the default values
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

pub fn config(args: ConfigArgs, cwd: &str) -> Result<()> {
    match args.command {
        ConfigCommand::Check => check(cwd),
        ConfigCommand::Init { force } => init(cwd, force),
    }
}

fn check(cwd: &str) -> Result<()> {
    let path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);
    let config = AnnotatorConfig::load(cwd)?;

    if path.exists() {
        println!("{} {} is valid", "✓".green(), DEFAULT_CONFIG_NAME.bright_white());
    } else {
        println!(
            "{} No {} found, using defaults",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
    }
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn init(cwd: &str, force: bool) -> Result<()> {
    let path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    if path.exists() && !force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    let json = serde_json::to_string_pretty(&AnnotatorConfig::default())?;
    fs::write(&path, json + "\n")?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    Ok(())
}
