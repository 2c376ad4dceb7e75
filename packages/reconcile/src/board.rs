//! # Reconciliation board
//!
//! Owns every token (through the two pools) and every drop zone, and is
//! the only place their state changes. Zones refer to tokens by
//! [`TokenId`]; tokens keep one [`TokenView`](crate::TokenView) per
//! container they are rendered in.
//!
//! ## Drag and drop
//!
//! A gesture starts with [`Board::begin_drag`], which hands out a
//! [`DragTransfer`]. [`Board::drop_on`] takes the transfer by value, so it
//! is consumed on every path (placed, rejected, cancelled or ignored) and
//! can never be left stale.
//!
//! ## Disjoint zones
//!
//! Before a token enters a zone it is evicted from every zone registered
//! as disjoint with it. A token is never held by two mutually disjoint
//! zones at once.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, info, instrument};

use crate::error::{ReconcileError, ReconcileResult};
use crate::events::{BoardEvent, Subscriber};
use crate::notifier::Notifier;
use crate::pool::Pool;
use crate::token::{Container, ReconciliationStatus, Token, TokenId, TokenKind, MAX_DISPLAY_LENGTH};
use crate::zone::{DropZone, ZoneId, ZoneKind};

pub const DELETE_REJECTED: &str = "Only untagged tokens can be deleted!";
pub const DELETE_CONFIRM: &str = "Are you sure you want to delete this token?";
const PLACE_IN_DELETE_ZONE: &str = "Tokens cannot be placed in a delete zone";

/// The token being dragged during one gesture
#[derive(Debug, PartialEq, Eq)]
pub struct DragTransfer {
    token: TokenId,
}

impl DragTransfer {
    pub fn token(&self) -> &TokenId {
        &self.token
    }
}

/// What a drop did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Placed,
    /// The token already was in this multi zone
    AlreadyPresent,
    /// The zone is disabled
    Disabled,
    /// A condition or the zone type refused the token; the user was told why
    Rejected { message: String },
    /// The user declined the confirmation
    Cancelled,
    Deleted,
}

pub struct Board {
    tagged: Pool,
    untagged: Pool,
    zones: BTreeMap<ZoneId, DropZone>,
    next_zone: u64,
    max_display_len: usize,
    events: Vec<BoardEvent>,
    subscribers: Vec<Subscriber>,
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("tagged", &self.tagged.len())
            .field("untagged", &self.untagged.len())
            .field("zones", &self.zones.len())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            tagged: Pool::new(TokenKind::Tagged),
            untagged: Pool::new(TokenKind::Untagged),
            zones: BTreeMap::new(),
            next_zone: 1,
            max_display_len: MAX_DISPLAY_LENGTH,
            events: Vec::new(),
            subscribers: Vec::new(),
        }
    }

    pub fn with_max_display_len(mut self, max: usize) -> Self {
        self.max_display_len = max;
        self
    }

    // ---- tokens ----

    pub fn pool(&self, kind: TokenKind) -> &Pool {
        match kind {
            TokenKind::Tagged => &self.tagged,
            TokenKind::Untagged => &self.untagged,
        }
    }

    fn pool_mut(&mut self, kind: TokenKind) -> &mut Pool {
        match kind {
            TokenKind::Tagged => &mut self.tagged,
            TokenKind::Untagged => &mut self.untagged,
        }
    }

    pub fn token(&self, id: &TokenId) -> Option<&Token> {
        self.pool(id.kind).get(&id.tag_id)
    }

    fn token_mut(&mut self, id: &TokenId) -> ReconcileResult<&mut Token> {
        self.pool_mut(id.kind)
            .get_mut(&id.tag_id)
            .ok_or_else(|| ReconcileError::UnknownToken(id.clone()))
    }

    /// Token for an external `t<id>` / `u<id>` identifier
    pub fn get_token(&self, token_id: &str) -> ReconcileResult<&Token> {
        let id: TokenId = token_id.parse()?;
        self.token(&id).ok_or(ReconcileError::UnknownToken(id))
    }

    pub fn add_token(&mut self, kind: TokenKind, tag_id: impl Into<String>, text: impl Into<String>) -> ReconcileResult<TokenId> {
        let id = TokenId::new(kind, tag_id);
        let token = Token::new(id.clone(), text).with_max_display_len(self.max_display_len);
        self.pool_mut(kind).add(token)?;
        debug!(token = %id, "Token added to pool");
        Ok(id)
    }

    /// Create the tagged token for `tag_id`, or update its text.
    /// Returns whether a token was created.
    pub fn upsert_tagged(&mut self, tag_id: &str, text: &str) -> ReconcileResult<bool> {
        let id = TokenId::tagged(tag_id);
        if let Ok(token) = self.token_mut(&id) {
            if token.full_text() != text {
                token.set_text(text);
            }
            return Ok(false);
        }
        self.add_token(TokenKind::Tagged, tag_id, text)?;
        Ok(true)
    }

    pub fn set_token_text(&mut self, id: &TokenId, text: impl Into<String>) -> ReconcileResult<()> {
        self.token_mut(id)?.set_text(text);
        Ok(())
    }

    pub fn set_token_status(&mut self, id: &TokenId, status: ReconciliationStatus) -> ReconcileResult<()> {
        self.token_mut(id)?.set_status(status);
        Ok(())
    }

    /// Whether the token sits in a schema zone
    pub fn is_used_in_schema(&self, id: &TokenId) -> bool {
        self.zones.values().any(|zone| zone.schema && zone.contains(id))
    }

    pub fn zones_containing(&self, id: &TokenId) -> Vec<ZoneId> {
        self.zones
            .values()
            .filter(|zone| zone.contains(id))
            .map(|zone| zone.id)
            .collect()
    }

    /// Remove a token from its pool and every zone
    #[instrument(skip(self, id), fields(token = %id))]
    pub fn delete_token(&mut self, id: &TokenId) -> ReconcileResult<Token> {
        if self.token(id).is_none() {
            return Err(ReconcileError::UnknownToken(id.clone()));
        }

        for zone_id in self.zones_containing(id) {
            if let Some(zone) = self.zones.get_mut(&zone_id) {
                zone.take(id);
            }
            self.emit(BoardEvent::TokenRemoved {
                token: id.clone(),
                zone: zone_id,
            });
        }

        let mut token = self
            .pool_mut(id.kind)
            .remove(&id.tag_id)
            .ok_or_else(|| ReconcileError::UnknownToken(id.clone()))?;
        token.clear_views();

        info!("Token deleted");
        self.emit(BoardEvent::TokenDeleted { token: id.clone() });
        Ok(token)
    }

    // ---- zones ----

    pub fn add_zone(&mut self, mut zone: DropZone) -> ZoneId {
        let id = ZoneId(self.next_zone);
        self.next_zone += 1;
        zone.id = id;
        debug!(zone = %id, label = %zone.label, "Zone added");
        self.zones.insert(id, zone);
        id
    }

    pub fn zone(&self, id: ZoneId) -> Option<&DropZone> {
        self.zones.get(&id)
    }

    fn zone_or_err(&self, id: ZoneId) -> ReconcileResult<&DropZone> {
        self.zones.get(&id).ok_or(ReconcileError::UnknownZone(id))
    }

    fn zone_mut(&mut self, id: ZoneId) -> ReconcileResult<&mut DropZone> {
        self.zones.get_mut(&id).ok_or(ReconcileError::UnknownZone(id))
    }

    pub fn zones(&self) -> impl Iterator<Item = &DropZone> + '_ {
        self.zones.values()
    }

    /// Register `a` and `b` as mutually disjoint
    pub fn make_disjoint(&mut self, a: ZoneId, b: ZoneId) -> ReconcileResult<()> {
        self.zone_or_err(b)?;
        self.zone_mut(a)?.add_disjoint(b);
        self.zone_mut(b)?.add_disjoint(a);
        Ok(())
    }

    pub fn enable_zone(&mut self, id: ZoneId) -> ReconcileResult<()> {
        if let ZoneKind::Single { enabled, .. } = &mut self.zone_mut(id)?.kind {
            *enabled = true;
        }
        Ok(())
    }

    /// Disable a single zone, clearing its occupant
    pub fn disable_zone(&mut self, id: ZoneId) -> ReconcileResult<()> {
        if let ZoneKind::Single { enabled, .. } = &mut self.zone_mut(id)?.kind {
            *enabled = false;
        }
        self.remove_from_zone(id, None)?;
        Ok(())
    }

    /// Detach `token` from the zone, or the occupant of a single zone when
    /// no token is given. Returns the detached token.
    pub fn remove_from_zone(&mut self, id: ZoneId, token: Option<&TokenId>) -> ReconcileResult<Option<TokenId>> {
        let zone = self.zone_or_err(id)?;
        let target = match token {
            Some(token) => zone.contains(token).then(|| token.clone()),
            None => zone.occupant().cloned(),
        };
        if let Some(target) = &target {
            self.evict(id, target);
        }
        Ok(target)
    }

    /// Remove a zone, detaching its tokens and unregistering it from
    /// every disjoint list. Returns the tokens it held.
    #[instrument(skip(self, id), fields(zone = %id))]
    pub fn remove_zone(&mut self, id: ZoneId) -> ReconcileResult<Vec<TokenId>> {
        let zone = self.zones.remove(&id).ok_or(ReconcileError::UnknownZone(id))?;
        let held = zone.tokens();

        for token in &held {
            if let Ok(t) = self.token_mut(token) {
                t.remove_from(Container::Zone(id));
            }
            self.emit(BoardEvent::TokenRemoved {
                token: token.clone(),
                zone: id,
            });
            self.settle_status(token);
        }
        for other in self.zones.values_mut() {
            other.disjoint.retain(|z| *z != id);
        }

        debug!(tokens = held.len(), "Zone removed");
        self.emit(BoardEvent::ZoneRemoved { zone: id });
        Ok(held)
    }

    // ---- drag and drop ----

    pub fn begin_drag(&self, token: &TokenId) -> ReconcileResult<DragTransfer> {
        if self.token(token).is_none() {
            return Err(ReconcileError::UnknownToken(token.clone()));
        }
        Ok(DragTransfer {
            token: token.clone(),
        })
    }

    /// Finish a gesture by dropping the dragged token on `zone`
    #[instrument(skip(self, transfer, zone, notifier), fields(token = %transfer.token, zone = %zone))]
    pub fn drop_on(&mut self, transfer: DragTransfer, zone: ZoneId, notifier: &mut dyn Notifier) -> ReconcileResult<DropOutcome> {
        let DragTransfer { token } = transfer;
        let target = self.zone_or_err(zone)?;
        let dragged = self
            .token(&token)
            .ok_or_else(|| ReconcileError::UnknownToken(token.clone()))?;

        if matches!(target.kind, ZoneKind::Delete) {
            if dragged.kind() != TokenKind::Untagged {
                notifier.alert(DELETE_REJECTED);
                debug!("Delete refused for tagged token");
                return Ok(DropOutcome::Rejected {
                    message: DELETE_REJECTED.to_string(),
                });
            }
            if !notifier.confirm(DELETE_CONFIRM) {
                return Ok(DropOutcome::Cancelled);
            }
            self.delete_token(&token)?;
            return Ok(DropOutcome::Deleted);
        }

        if !target.is_enabled() {
            return Ok(DropOutcome::Disabled);
        }

        if let Some(condition) = &target.condition {
            if condition.rejects(dragged) {
                let message = condition.message().to_string();
                notifier.alert(&message);
                debug!(%message, "Drop rejected by zone condition");
                return Ok(DropOutcome::Rejected { message });
            }
        }

        self.insert(zone, &token)
    }

    /// Put a token in a zone without a drag gesture. Conditions are not
    /// checked; a disabled zone still refuses.
    pub fn place(&mut self, zone: ZoneId, token: &TokenId) -> ReconcileResult<DropOutcome> {
        let target = self.zone_or_err(zone)?;
        if self.token(token).is_none() {
            return Err(ReconcileError::UnknownToken(token.clone()));
        }
        if matches!(target.kind, ZoneKind::Delete) {
            return Ok(DropOutcome::Rejected {
                message: PLACE_IN_DELETE_ZONE.to_string(),
            });
        }
        if !target.is_enabled() {
            return Ok(DropOutcome::Disabled);
        }
        self.insert(zone, token)
    }

    fn insert(&mut self, zone: ZoneId, token: &TokenId) -> ReconcileResult<DropOutcome> {
        let target = self.zone_or_err(zone)?;
        if matches!(&target.kind, ZoneKind::Multi { members } if members.contains(token)) {
            return Ok(DropOutcome::AlreadyPresent);
        }
        let disjoint = target.disjoint.clone();
        let status = target.status;
        let current = target.occupant().cloned();

        if let Some(current) = current {
            self.evict(zone, &current);
        }
        for other in &disjoint {
            self.evict(*other, token);
        }

        match &mut self.zone_mut(zone)?.kind {
            ZoneKind::Single { occupant, .. } => *occupant = Some(token.clone()),
            ZoneKind::Multi { members } => members.push(token.clone()),
            ZoneKind::Delete => {}
        }

        let placed = self.token_mut(token)?;
        placed.render_into(Container::Zone(zone));
        if let Some(status) = status {
            placed.set_status(status);
        }

        debug_assert!(
            disjoint
                .iter()
                .all(|other| !self.zones.get(other).is_some_and(|z| z.contains(token))),
            "token held by two disjoint zones"
        );

        debug!(token = %token, zone = %zone, "Token placed");
        self.emit(BoardEvent::TokenAdded {
            token: token.clone(),
            zone,
        });
        Ok(DropOutcome::Placed)
    }

    /// Take `token` out of `zone` if it is there
    fn evict(&mut self, zone: ZoneId, token: &TokenId) {
        let held = match self.zones.get_mut(&zone) {
            Some(z) => z.take(token),
            None => false,
        };
        if !held {
            return;
        }
        if let Ok(t) = self.token_mut(token) {
            t.remove_from(Container::Zone(zone));
        }
        self.emit(BoardEvent::TokenRemoved {
            token: token.clone(),
            zone,
        });
        self.settle_status(token);
    }

    /// A token held by no zone is unused again
    fn settle_status(&mut self, token: &TokenId) {
        if self.zones.values().any(|zone| zone.contains(token)) {
            return;
        }
        if let Ok(t) = self.token_mut(token) {
            t.set_status(ReconciliationStatus::Unused);
        }
    }

    // ---- events ----

    /// Call `subscriber` for every event from now on
    pub fn subscribe(&mut self, subscriber: impl FnMut(&BoardEvent) + Send + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: BoardEvent) {
        for subscriber in &mut self.subscribers {
            subscriber(&event);
        }
        self.events.push(event);
    }
}
