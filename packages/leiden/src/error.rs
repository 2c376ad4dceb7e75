use annotator_parser::ParseError;
use thiserror::Error;

pub type DisplayResult<T> = Result<T, DisplayError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DisplayError {
    #[error("Cannot display document: {0}")]
    Parse(#[from] ParseError),

    #[error("Display tree contains an error node: {message}")]
    ErrorNode { message: String },
}

impl DisplayError {
    pub fn error_node(message: impl Into<String>) -> Self {
        Self::ErrorNode {
            message: message.into(),
        }
    }
}
