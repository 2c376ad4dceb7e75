use annotator_reconcile::{BoardEvent, ZoneId};
use serde::{Deserialize, Serialize};

use crate::schema::SchemaId;

/// Notifications for views that mirror the annotator's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AnnotatorEvent {
    /// Tokens were re-derived from the text
    TokensRefreshed {
        version: u64,
        created: usize,
        removed: usize,
    },

    LinkRemoved {
        zone: ZoneId,
        record: Option<String>,
    },

    SchemaRemoved { schema: SchemaId },

    /// Forwarded from the board
    Board { event: BoardEvent },
}
