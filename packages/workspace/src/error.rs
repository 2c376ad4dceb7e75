use annotator_editor::EditorError;
use annotator_reconcile::{ReconcileError, ZoneId};
use thiserror::Error;

use crate::schema::SchemaId;

pub type WorkspaceResult<T> = Result<T, WorkspaceError>;

#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error(transparent)]
    Editor(#[from] EditorError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error("Unknown datatype for the statement creation: {0}.")]
    UnknownDatatype(String),

    #[error("Invalid time value: {0:?}")]
    InvalidTime(String),

    #[error("Schema {0} does not exist")]
    UnknownSchema(SchemaId),

    #[error("Item snaks hold a token, not a widget value")]
    ItemSnakValue,

    #[error("Select a property before adding values")]
    NoProperty,

    #[error("No snak at {0}")]
    UnknownSnak(String),

    #[error("Zone {0} is not a link")]
    NotALink(ZoneId),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure reported by a record search or creation collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    #[error("Unexpected response: {0}")]
    Response(String),
}
