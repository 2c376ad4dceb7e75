use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ReconcileError;
use crate::zone::ZoneId;

/// Default maximum number of characters a token displays
pub const MAX_DISPLAY_LENGTH: usize = 75;

/// Where a token comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Derived from a `<w>` tag in the text
    Tagged,
    /// Created by hand, not present in the text
    Untagged,
}

impl TokenKind {
    pub fn prefix(&self) -> char {
        match self {
            TokenKind::Tagged => 't',
            TokenKind::Untagged => 'u',
        }
    }
}

/// Where a token stands relative to the knowledge base
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconciliationStatus {
    #[default]
    Unused,
    Unknown,
    New,
    Linked,
}

impl ReconciliationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReconciliationStatus::Unused => "unused",
            ReconciliationStatus::Unknown => "unknown",
            ReconciliationStatus::New => "new",
            ReconciliationStatus::Linked => "linked",
        }
    }

    /// Visual status marker carried by every rendering
    pub fn status_class(&self) -> String {
        format!("entity-token-{}", self.as_str())
    }
}

impl fmt::Display for ReconciliationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// External token identifier: `t<tagId>` or `u<tagId>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId {
    pub kind: TokenKind,
    pub tag_id: String,
}

impl TokenId {
    pub fn new(kind: TokenKind, tag_id: impl Into<String>) -> Self {
        Self {
            kind,
            tag_id: tag_id.into(),
        }
    }

    pub fn tagged(tag_id: impl Into<String>) -> Self {
        Self::new(TokenKind::Tagged, tag_id)
    }

    pub fn untagged(tag_id: impl Into<String>) -> Self {
        Self::new(TokenKind::Untagged, tag_id)
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.tag_id)
    }
}

impl FromStr for TokenId {
    type Err = ReconcileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let kind = match chars.next() {
            Some('t') => TokenKind::Tagged,
            Some('u') => TokenKind::Untagged,
            Some(other) => return Err(ReconcileError::UnknownTokenKind(other.to_string())),
            None => return Err(ReconcileError::UnknownTokenKind(String::new())),
        };
        Ok(TokenId::new(kind, chars.as_str()))
    }
}

impl Serialize for TokenId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TokenId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A place a token can be rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "container", content = "id", rename_all = "camelCase")]
pub enum Container {
    Pool(TokenKind),
    Zone(ZoneId),
}

/// One rendering of a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenView {
    pub text: String,
    pub status_class: String,
}

/// Reconciliation unit. Owns the canonical text and status; every
/// rendering is refreshed from them on change.
#[derive(Debug, Clone)]
pub struct Token {
    id: TokenId,
    full_text: String,
    status: ReconciliationStatus,
    max_display_len: usize,
    views: BTreeMap<Container, TokenView>,
}

impl Token {
    pub fn new(id: TokenId, text: impl Into<String>) -> Self {
        Self {
            id,
            full_text: text.into(),
            status: ReconciliationStatus::Unused,
            max_display_len: MAX_DISPLAY_LENGTH,
            views: BTreeMap::new(),
        }
    }

    pub fn with_max_display_len(mut self, max: usize) -> Self {
        self.max_display_len = max;
        self.refresh_views();
        self
    }

    pub fn id(&self) -> &TokenId {
        &self.id
    }

    pub fn kind(&self) -> TokenKind {
        self.id.kind
    }

    pub fn tag_id(&self) -> &str {
        &self.id.tag_id
    }

    /// Display text, truncated
    pub fn text(&self) -> String {
        truncate_chars(&self.full_text, self.max_display_len)
    }

    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    pub fn status(&self) -> ReconciliationStatus {
        self.status
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.full_text = text.into();
        self.refresh_views();
    }

    pub fn set_status(&mut self, status: ReconciliationStatus) {
        self.status = status;
        self.refresh_views();
    }

    /// Rendering in `container`, created on first use
    pub fn render_into(&mut self, container: Container) -> &TokenView {
        let view = self.make_view();
        self.views.entry(container).or_insert(view)
    }

    pub fn view(&self, container: Container) -> Option<&TokenView> {
        self.views.get(&container)
    }

    pub fn is_rendered_in(&self, container: Container) -> bool {
        self.views.contains_key(&container)
    }

    pub fn containers(&self) -> impl Iterator<Item = Container> + '_ {
        self.views.keys().copied()
    }

    /// Detach one rendering
    pub fn remove_from(&mut self, container: Container) -> Option<TokenView> {
        self.views.remove(&container)
    }

    /// Detach every rendering
    pub fn clear_views(&mut self) {
        self.views.clear();
    }

    pub fn summary(&self) -> TokenSummary {
        TokenSummary {
            kind: self.id.kind,
            tag_id: self.id.tag_id.clone(),
            token_id: self.id.clone(),
            text: self.full_text.clone(),
            reconciliation_type: self.status,
        }
    }

    fn make_view(&self) -> TokenView {
        TokenView {
            text: self.text(),
            status_class: self.status.status_class(),
        }
    }

    fn refresh_views(&mut self) {
        let fresh = self.make_view();
        for view in self.views.values_mut() {
            view.clone_from(&fresh);
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token {}: {}", self.id, truncate_chars(&self.full_text, 15))
    }
}

/// Serializable view of a token for payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSummary {
    #[serde(rename = "type")]
    pub kind: TokenKind,
    pub tag_id: String,
    pub token_id: TokenId,
    pub text: String,
    pub reconciliation_type: ReconciliationStatus,
}

/// First `max` characters of `text`
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text.to_string(),
    }
}
