//! Error types for the editor

use thiserror::Error;

use crate::overlap::OverlapReason;

pub type EditorResult<T> = Result<T, EditorError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("Parse error: {0}")]
    Parse(#[from] annotator_parser::ParseError),

    #[error("Cannot tag an empty selection")]
    EmptySelection,

    #[error("Selection {start}..{end} is not a valid range of a {len} byte text")]
    InvalidRange { start: usize, end: usize, len: usize },

    #[error("Invalid selection: {0}. Cannot add the tag.")]
    Overlap(OverlapReason),

    #[error("No <w> tag with id '{0}'")]
    UnknownTag(String),

    #[error("Unknown tag type: {0}")]
    UnknownTagKind(String),
}

impl EditorError {
    pub fn invalid_range(start: usize, end: usize, len: usize) -> Self {
        Self::InvalidRange { start, end, len }
    }

    /// Whether the error comes from user input rather than a caller bug
    pub fn is_validation(&self) -> bool {
        matches!(self, EditorError::Overlap(_))
    }
}
