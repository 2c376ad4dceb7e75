//! # Annotator workspace
//!
//! One annotation session over a transcription: tagging in the text,
//! reconciling tokens with knowledge-base records and describing the
//! records to create, ending in a [`Submission`].
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ TextDocument │──▶│    Board     │◀──│ SchemaEditor │
//! └──────────────┘   └──────────────┘   └──────────────┘
//!                           ▲
//!                    ┌──────────────┐   RecordSearch / RecordCreation
//!                    │  Reconciler  │◀─ (async collaborators)
//!                    └──────────────┘
//! ```

pub mod annotator;
pub mod config;
pub mod error;
pub mod events;
pub mod reconciler;
pub mod schema;
pub mod services;
pub mod submission;

pub use annotator::{Annotator, CreationReport};
pub use config::{AnnotatorConfig, DEFAULT_CONFIG_NAME};
pub use error::{ServiceError, WorkspaceError, WorkspaceResult};
pub use events::AnnotatorEvent;
pub use reconciler::{Link, LinkedToken, Reconciler};
pub use schema::{
    parse_time, Datatype, PropertySnak, Schema, SchemaEditor, SchemaId, SchemaPayload, Snak,
    SnakInput, SnakPath, SnakPayload, SnakType, SnakValue, Statement, StatementGroup, Term,
    TermKind, TimeValue, UNKNOWN_REJECTED,
};
pub use services::{
    resolve_label, search_candidates, Candidate, RecordCreation, RecordSearch, RecordSeed,
    RecordSummary, SearchResults,
};
pub use submission::{Entities, LinkedEntity, Reconciliations, Submission};
