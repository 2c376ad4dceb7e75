use anyhow::Result;
use annotator_editor::TextDocument;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::{read_source, source_name};

#[derive(Args, Debug)]
pub struct TagsArgs {
    /// Transcription file, or - for stdin
    pub input: PathBuf,

    /// Print the tags as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn tags(args: TagsArgs, _cwd: &str) -> Result<()> {
    let mut document = TextDocument::new(read_source(&args.input)?);

    let tags = match document.tags() {
        Ok(tags) => tags,
        Err(annotator_editor::EditorError::Parse(err)) => {
            eprintln!("{}", err.report(&source_name(&args.input), document.source()));
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&tags)?);
        return Ok(());
    }

    if tags.is_empty() {
        println!("No entity found.");
        return Ok(());
    }

    println!("{} entities, next id {}", tags.len(), document.next_tag_id());
    for tag in &tags {
        let linked = match &tag.qid {
            Some(qid) => format!(" linked to Q{}", qid).green().to_string(),
            None => " not linked".dimmed().to_string(),
        };
        println!(
            "  {} {} {}{}",
            format!("t{}", tag.id).bright_white(),
            format!("[{}]", tag.kind).cyan(),
            tag.text,
            linked
        );
    }
    Ok(())
}
