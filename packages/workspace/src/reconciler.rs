//! # Reconciler
//!
//! Decides what each token becomes in the knowledge base:
//!
//! ```text
//! New items      (multi)  ──▶ a record is created for each token
//! Unknown items  (multi)  ──▶ reconciles with the UNKNOWN value
//! Links          (single) ──▶ token ↔ existing record id
//! ```
//!
//! Every zone here is disjoint with every other, including links created
//! later, so a token is reconciled one way at most.

use annotator_reconcile::{Board, DropZone, ReconcileResult, ReconciliationStatus, TokenId, ZoneId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{WorkspaceError, WorkspaceResult};

/// A single zone tied to a selected record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub zone: ZoneId,
    pub record: Option<String>,
    pub label: Option<String>,
}

/// Token linked to an existing record, as submitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedToken {
    pub token: TokenId,
    pub qid: String,
}

#[derive(Debug)]
pub struct Reconciler {
    new_items: ZoneId,
    unknown_items: ZoneId,
    links: Vec<Link>,
}

impl Reconciler {
    pub fn new(board: &mut Board) -> ReconcileResult<Self> {
        let new_items = board.add_zone(
            DropZone::multi("Drop here to create a new item").with_status(ReconciliationStatus::New),
        );
        let unknown_items = board.add_zone(
            DropZone::multi("Drop here to reconcile with the unknown value")
                .with_status(ReconciliationStatus::Unknown),
        );
        board.make_disjoint(new_items, unknown_items)?;

        Ok(Self {
            new_items,
            unknown_items,
            links: Vec::new(),
        })
    }

    pub fn new_items(&self) -> ZoneId {
        self.new_items
    }

    pub fn unknown_items(&self) -> ZoneId {
        self.unknown_items
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn link(&self, zone: ZoneId) -> Option<&Link> {
        self.links.iter().find(|link| link.zone == zone)
    }

    /// Add an empty link, disjoint with every reconciliation zone
    pub fn create_link(&mut self, board: &mut Board) -> ReconcileResult<ZoneId> {
        let zone = board.add_zone(DropZone::single("link").with_status(ReconciliationStatus::Linked));
        board.make_disjoint(zone, self.new_items)?;
        board.make_disjoint(zone, self.unknown_items)?;
        for link in &self.links {
            board.make_disjoint(zone, link.zone)?;
        }

        self.links.push(Link {
            zone,
            record: None,
            label: None,
        });
        debug!(%zone, links = self.links.len(), "Link created");
        Ok(zone)
    }

    /// Choose the record a link points at
    pub fn select_record(
        &mut self,
        zone: ZoneId,
        record: impl Into<String>,
        label: Option<String>,
    ) -> WorkspaceResult<()> {
        let link = self
            .links
            .iter_mut()
            .find(|link| link.zone == zone)
            .ok_or(WorkspaceError::NotALink(zone))?;
        link.record = Some(record.into());
        link.label = label;
        Ok(())
    }

    /// Create a link holding `token` and pointing at `record`
    pub fn link_token(
        &mut self,
        board: &mut Board,
        token: &TokenId,
        record: &str,
    ) -> WorkspaceResult<ZoneId> {
        let zone = self.create_link(board)?;
        if let Err(err) = board.place(zone, token) {
            self.remove_link(board, zone)?;
            return Err(err.into());
        }
        let label = board.token(token).map(|t| t.full_text().to_string());
        self.select_record(zone, record, label)?;
        info!(%token, record, %zone, "Token linked");
        Ok(zone)
    }

    /// Token held by the first link pointing at `record`
    pub fn token_for(&self, board: &Board, record: &str) -> Option<TokenId> {
        self.links
            .iter()
            .filter(|link| link.record.as_deref() == Some(record))
            .find_map(|link| board.zone(link.zone)?.occupant().cloned())
    }

    /// Delete a link. Its token goes back to being unused.
    pub fn remove_link(&mut self, board: &mut Board, zone: ZoneId) -> WorkspaceResult<Link> {
        let index = self
            .links
            .iter()
            .position(|link| link.zone == zone)
            .ok_or(WorkspaceError::NotALink(zone))?;
        board.remove_zone(zone)?;
        let link = self.links.remove(index);
        debug!(%zone, "Link removed");
        Ok(link)
    }

    pub fn new_entities(&self, board: &Board) -> Vec<TokenId> {
        zone_tokens(board, self.new_items)
    }

    pub fn unknown_entities(&self, board: &Board) -> Vec<TokenId> {
        zone_tokens(board, self.unknown_items)
    }

    /// Links that hold a token and point at a record
    pub fn linked_entities(&self, board: &Board) -> Vec<LinkedToken> {
        self.links
            .iter()
            .filter_map(|link| {
                let token = board.zone(link.zone)?.occupant()?.clone();
                let qid = link.record.clone()?;
                Some(LinkedToken { token, qid })
            })
            .collect()
    }
}

fn zone_tokens(board: &Board, zone: ZoneId) -> Vec<TokenId> {
    board.zone(zone).map(|z| z.tokens()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use annotator_reconcile::{ReconcileError, TokenKind};

    fn setup() -> (Board, Reconciler, TokenId) {
        let mut board = Board::new();
        let reconciler = Reconciler::new(&mut board).unwrap();
        let token = board.add_token(TokenKind::Tagged, "1", "Caesar").unwrap();
        (board, reconciler, token)
    }

    #[test]
    fn test_new_and_unknown_are_disjoint() {
        let (mut board, reconciler, token) = setup();

        board.place(reconciler.new_items(), &token).unwrap();
        assert_eq!(reconciler.new_entities(&board), vec![token.clone()]);
        assert_eq!(board.token(&token).unwrap().status(), ReconciliationStatus::New);

        board.place(reconciler.unknown_items(), &token).unwrap();
        assert!(reconciler.new_entities(&board).is_empty());
        assert_eq!(reconciler.unknown_entities(&board), vec![token.clone()]);
        assert_eq!(board.token(&token).unwrap().status(), ReconciliationStatus::Unknown);
    }

    #[test]
    fn test_link_token_takes_it_out_of_new_items() {
        let (mut board, mut reconciler, token) = setup();
        board.place(reconciler.new_items(), &token).unwrap();

        let zone = reconciler.link_token(&mut board, &token, "42").unwrap();

        assert!(reconciler.new_entities(&board).is_empty());
        assert_eq!(board.zone(zone).unwrap().occupant(), Some(&token));
        assert_eq!(board.token(&token).unwrap().status(), ReconciliationStatus::Linked);
        assert_eq!(reconciler.token_for(&board, "42"), Some(token.clone()));
        assert_eq!(reconciler.link(zone).unwrap().label.as_deref(), Some("Caesar"));
        assert_eq!(
            reconciler.linked_entities(&board),
            vec![LinkedToken {
                token,
                qid: "42".to_string()
            }]
        );
    }

    #[test]
    fn test_links_are_disjoint_with_each_other() {
        let (mut board, mut reconciler, token) = setup();
        let first = reconciler.link_token(&mut board, &token, "1").unwrap();
        let second = reconciler.link_token(&mut board, &token, "2").unwrap();

        assert!(board.zone(first).unwrap().occupant().is_none());
        assert_eq!(board.zone(second).unwrap().occupant(), Some(&token));
        assert_eq!(reconciler.token_for(&board, "1"), None);
    }

    #[test]
    fn test_incomplete_links_are_not_submitted() {
        let (mut board, mut reconciler, token) = setup();
        let empty = reconciler.create_link(&mut board).unwrap();
        reconciler.select_record(empty, "7", None).unwrap();

        let unselected = reconciler.create_link(&mut board).unwrap();
        board.place(unselected, &token).unwrap();

        assert!(reconciler.linked_entities(&board).is_empty());
    }

    #[test]
    fn test_remove_link_frees_token() {
        let (mut board, mut reconciler, token) = setup();
        let zone = reconciler.link_token(&mut board, &token, "42").unwrap();

        let link = reconciler.remove_link(&mut board, zone).unwrap();

        assert_eq!(link.record.as_deref(), Some("42"));
        assert!(reconciler.links().is_empty());
        assert!(board.zone(zone).is_none());
        assert_eq!(board.token(&token).unwrap().status(), ReconciliationStatus::Unused);
        assert!(board
            .zone(reconciler.new_items())
            .unwrap()
            .disjoint_zones()
            .iter()
            .all(|z| *z != zone));
    }

    #[test]
    fn test_failed_link_token_leaves_no_link() {
        let (mut board, mut reconciler, _) = setup();
        let zones = board.zones().count();

        let missing = TokenId::tagged("99");
        assert!(matches!(
            reconciler.link_token(&mut board, &missing, "42"),
            Err(WorkspaceError::Reconcile(ReconcileError::UnknownToken(_)))
        ));

        assert!(reconciler.links().is_empty());
        assert_eq!(board.zones().count(), zones);
        assert_eq!(reconciler.token_for(&board, "42"), None);
    }

    #[test]
    fn test_unknown_link() {
        let (mut board, mut reconciler, _) = setup();
        let new_items = reconciler.new_items();
        assert!(matches!(
            reconciler.remove_link(&mut board, new_items),
            Err(WorkspaceError::NotALink(_))
        ));
    }
}
