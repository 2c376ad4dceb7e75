use std::fmt;

use serde::{Deserialize, Serialize};

use crate::token::{ReconciliationStatus, Token, TokenId};

/// Board-assigned drop zone identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZoneId(pub u64);

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "zone-{}", self.0)
    }
}

/// Variant-specific state of a drop zone
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneKind {
    /// At most one token; can be disabled
    Single {
        occupant: Option<TokenId>,
        enabled: bool,
    },
    /// Deduplicated tokens in insertion order
    Multi { members: Vec<TokenId> },
    /// Deletes untagged tokens after confirmation; holds nothing
    Delete,
}

/// Predicate rejecting tokens a zone must not accept, with the message
/// shown to the user on rejection
pub struct Condition {
    rejects: Box<dyn Fn(&Token) -> bool + Send + Sync>,
    message: String,
}

impl Condition {
    pub fn new(rejects: impl Fn(&Token) -> bool + Send + Sync + 'static, message: impl Into<String>) -> Self {
        Self {
            rejects: Box::new(rejects),
            message: message.into(),
        }
    }

    pub fn rejects(&self, token: &Token) -> bool {
        (self.rejects)(token)
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// Container accepting tokens by drag and drop
#[derive(Debug)]
pub struct DropZone {
    pub(crate) id: ZoneId,
    pub(crate) label: String,
    pub(crate) kind: ZoneKind,
    /// Status given to every token placed here
    pub(crate) status: Option<ReconciliationStatus>,
    pub(crate) condition: Option<Condition>,
    /// Tokens placed here count as used by a schema
    pub(crate) schema: bool,
    /// Zones that may never hold a token at the same time as this one
    pub(crate) disjoint: Vec<ZoneId>,
}

impl DropZone {
    fn with_kind(label: impl Into<String>, kind: ZoneKind) -> Self {
        Self {
            id: ZoneId(0),
            label: label.into(),
            kind,
            status: None,
            condition: None,
            schema: false,
            disjoint: Vec::new(),
        }
    }

    pub fn single(label: impl Into<String>) -> Self {
        Self::with_kind(
            label,
            ZoneKind::Single {
                occupant: None,
                enabled: true,
            },
        )
    }

    pub fn multi(label: impl Into<String>) -> Self {
        Self::with_kind(label, ZoneKind::Multi { members: Vec::new() })
    }

    pub fn delete(label: impl Into<String>) -> Self {
        Self::with_kind(label, ZoneKind::Delete)
    }

    pub fn with_status(mut self, status: ReconciliationStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn for_schema(mut self) -> Self {
        self.schema = true;
        self
    }

    pub fn id(&self) -> ZoneId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> &ZoneKind {
        &self.kind
    }

    pub fn status(&self) -> Option<ReconciliationStatus> {
        self.status
    }

    pub fn is_schema(&self) -> bool {
        self.schema
    }

    pub fn disjoint_zones(&self) -> &[ZoneId] {
        &self.disjoint
    }

    /// False only for a disabled single zone
    pub fn is_enabled(&self) -> bool {
        match &self.kind {
            ZoneKind::Single { enabled, .. } => *enabled,
            _ => true,
        }
    }

    pub fn occupant(&self) -> Option<&TokenId> {
        match &self.kind {
            ZoneKind::Single { occupant, .. } => occupant.as_ref(),
            _ => None,
        }
    }

    /// Tokens currently held, in placement order
    pub fn tokens(&self) -> Vec<TokenId> {
        match &self.kind {
            ZoneKind::Single { occupant, .. } => occupant.iter().cloned().collect(),
            ZoneKind::Multi { members } => members.clone(),
            ZoneKind::Delete => Vec::new(),
        }
    }

    pub fn contains(&self, token: &TokenId) -> bool {
        match &self.kind {
            ZoneKind::Single { occupant, .. } => occupant.as_ref() == Some(token),
            ZoneKind::Multi { members } => members.contains(token),
            ZoneKind::Delete => false,
        }
    }

    pub(crate) fn add_disjoint(&mut self, other: ZoneId) {
        if other != self.id && !self.disjoint.contains(&other) {
            self.disjoint.push(other);
        }
    }

    /// Drop `token` from this zone's contents. Returns whether it was held.
    pub(crate) fn take(&mut self, token: &TokenId) -> bool {
        match &mut self.kind {
            ZoneKind::Single { occupant, .. } if occupant.as_ref() == Some(token) => {
                *occupant = None;
                true
            }
            ZoneKind::Multi { members } => match members.iter().position(|m| m == token) {
                Some(index) => {
                    members.remove(index);
                    true
                }
                None => false,
            },
            _ => false,
        }
    }
}
