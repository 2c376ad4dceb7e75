pub mod check;
pub mod config;
pub mod render;
pub mod tags;

pub use check::{check, CheckArgs};
pub use config::{config, ConfigArgs};
pub use render::{render, RenderArgs};
pub use tags::{tags, TagsArgs};

use anyhow::{Context, Result};
use std::path::Path;

/// Read a transcription, with `-` for stdin
pub(crate) fn read_source(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut source = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut source)
            .context("Cannot read transcription from stdin")?;
        return Ok(source);
    }
    std::fs::read_to_string(input)
        .with_context(|| format!("Cannot read transcription {}", input.display()))
}

/// Name shown in diagnostics
pub(crate) fn source_name(input: &Path) -> String {
    if input == Path::new("-") {
        "<stdin>".to_string()
    } else {
        input.display().to_string()
    }
}
