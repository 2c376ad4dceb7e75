use anyhow::Result;
use annotator_editor::{validate_selection, EditorError};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::read_source;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Transcription file, or - for stdin
    pub input: PathBuf,

    /// Byte offset where the selection starts
    pub start: usize,

    /// Byte offset just past the selection
    pub end: usize,
}

/// Report whether a selection could be tagged
pub fn check(args: CheckArgs, _cwd: &str) -> Result<()> {
    let source = read_source(&args.input)?;

    match validate_selection(&source, args.start, args.end) {
        Ok(check) if check.overlaps => {
            println!("{} Error! ({})", "✗".red(), check.message());
            Err(anyhow::anyhow!("Selection cannot be tagged"))
        }
        Ok(_) => {
            println!(
                "{} No error: {:?} can be tagged",
                "✓".green(),
                &source[args.start..args.end]
            );
            Ok(())
        }
        Err(err @ (EditorError::EmptySelection | EditorError::InvalidRange { .. })) => {
            println!("{} {}", "✗".red(), err);
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}
