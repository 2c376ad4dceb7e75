//! Payload sent when the annotation is saved.
//!
//! ```json
//! {
//!   "document": "D12",
//!   "entities": { "taggedEntities": {..}, "untaggedEntities": {..} },
//!   "reconciliations": { "newEntities": [..], "unknownEntities": [..], "linkedEntities": [..] },
//!   "schemata": [..]
//! }
//! ```

use std::collections::BTreeMap;

use annotator_reconcile::{Board, TokenId, TokenKind, TokenSummary};
use serde::{Deserialize, Serialize};

use crate::error::WorkspaceResult;
use crate::reconciler::Reconciler;
use crate::schema::{SchemaEditor, SchemaPayload};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    pub entities: Entities,
    pub reconciliations: Reconciliations,
    pub schemata: Vec<SchemaPayload>,
}

/// Every token, keyed by tag id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entities {
    pub tagged_entities: BTreeMap<String, TokenSummary>,
    pub untagged_entities: BTreeMap<String, TokenSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliations {
    pub new_entities: Vec<TokenSummary>,
    pub unknown_entities: Vec<TokenSummary>,
    pub linked_entities: Vec<LinkedEntity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedEntity {
    pub token: TokenSummary,
    pub qid: String,
}

impl Submission {
    pub fn build(
        document: Option<String>,
        board: &Board,
        reconciler: &Reconciler,
        schemas: &SchemaEditor,
    ) -> WorkspaceResult<Self> {
        let entities = Entities {
            tagged_entities: pool_summaries(board, TokenKind::Tagged),
            untagged_entities: pool_summaries(board, TokenKind::Untagged),
        };

        let unknown = reconciler.unknown_entities(board);
        let reconciliations = Reconciliations {
            new_entities: summaries(board, &reconciler.new_entities(board)),
            unknown_entities: summaries(board, &unknown),
            linked_entities: reconciler
                .linked_entities(board)
                .into_iter()
                .filter_map(|linked| {
                    Some(LinkedEntity {
                        token: board.token(&linked.token)?.summary(),
                        qid: linked.qid,
                    })
                })
                .collect(),
        };

        Ok(Self {
            document,
            entities,
            reconciliations,
            schemata: schemas.payload(board, &unknown)?,
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

fn pool_summaries(board: &Board, kind: TokenKind) -> BTreeMap<String, TokenSummary> {
    board
        .pool(kind)
        .iter()
        .map(|token| (token.tag_id().to_string(), token.summary()))
        .collect()
}

fn summaries(board: &Board, ids: &[TokenId]) -> Vec<TokenSummary> {
    ids.iter()
        .filter_map(|id| board.token(id))
        .map(|token| token.summary())
        .collect()
}
