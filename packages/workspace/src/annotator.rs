//! # Annotator
//!
//! Composes the text editor, the reconciliation board, the reconciler and
//! the schema editor into one annotation session.
//!
//! ```text
//! typing ──debounce──▶ TextDocument ──tags──▶ tagged pool
//!                                               │ drag
//!   untagged pool ◀── on_item_selected          ▼
//!                        Board: new / unknown / links / schemas / trash
//!                                               │
//!                               submission() ◀──┘
//! ```
//!
//! Every board change is forwarded as an [`AnnotatorEvent::Board`];
//! follow-up work (titling a schema after its token) happens before the
//! call that caused it returns.

use std::collections::HashSet;

use annotator_editor::{
    Duration, InputDebouncer, Instant, Mutation, MutationResult, OverlapCheck, TagKind, TextDocument,
    UntaggedIds,
};
use annotator_leiden::DisplayNode;
use annotator_reconcile::{
    Board, BoardEvent, DragTransfer, DropOutcome, DropZone, Notifier, TokenId, TokenKind, ZoneId,
};
use tracing::{debug, info, instrument, warn};

use crate::config::AnnotatorConfig;
use crate::error::{ServiceError, WorkspaceError, WorkspaceResult};
use crate::events::AnnotatorEvent;
use crate::reconciler::{Link, Reconciler};
use crate::schema::{Schema, SchemaEditor, SchemaId, SnakPath, SnakType, Term, TermKind};
use crate::services::{search_candidates, Candidate, RecordCreation, RecordSearch, RecordSeed};
use crate::submission::Submission;

/// Result of creating the record for one token of the "new items" zone
#[derive(Debug, Clone, PartialEq)]
pub struct CreationReport {
    pub token: TokenId,
    pub outcome: Result<String, ServiceError>,
}

#[derive(Debug)]
pub struct Annotator {
    config: AnnotatorConfig,
    document_id: Option<String>,
    document: TextDocument,
    board: Board,
    reconciler: Reconciler,
    schemas: SchemaEditor,
    trash: ZoneId,
    input: InputDebouncer<String>,
    untagged_ids: UntaggedIds,
    events: Vec<AnnotatorEvent>,
}

impl Annotator {
    /// Start a session on `source` and derive its tokens
    pub fn new(source: impl Into<String>, config: AnnotatorConfig) -> WorkspaceResult<Self> {
        let mut board = Board::new().with_max_display_len(config.max_display_length);
        let reconciler = Reconciler::new(&mut board)?;
        let trash = board.add_zone(DropZone::delete("Drop here to delete an untagged token"));

        let mut annotator = Self {
            input: InputDebouncer::new(Duration::from_millis(config.debounce_ms)),
            config,
            document_id: None,
            document: TextDocument::new(source),
            board,
            reconciler,
            schemas: SchemaEditor::new(),
            trash,
            untagged_ids: UntaggedIds::default(),
            events: Vec::new(),
        };
        annotator.refresh_tokens()?;
        Ok(annotator)
    }

    pub fn with_document_id(mut self, id: impl Into<String>) -> Self {
        self.document_id = Some(id.into());
        self
    }

    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    pub fn source(&self) -> &str {
        self.document.source()
    }

    /// Leiden display of the current text
    pub fn display(&mut self) -> &[DisplayNode] {
        self.document.display()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    pub fn schemas(&self) -> &SchemaEditor {
        &self.schemas
    }

    /// Zone that deletes untagged tokens dropped on it
    pub fn trash(&self) -> ZoneId {
        self.trash
    }

    /// Tagging buttons offered to the user
    pub fn tag_kinds(&self) -> &[TagKind] {
        &self.config.tag_types
    }

    // ---- text ----

    /// Record typed text. It is applied once input has been quiet for the
    /// debounce window; see [`Annotator::tick`].
    pub fn on_text_input(&mut self, text: impl Into<String>, now: Instant) {
        self.input.schedule(text.into(), now);
    }

    /// Apply debounced input that is due. Returns whether text was applied.
    pub fn tick(&mut self, now: Instant) -> WorkspaceResult<bool> {
        match self.input.poll(now) {
            Some(text) => {
                self.apply_text(text)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Apply pending input now
    pub fn flush_input(&mut self) -> WorkspaceResult<bool> {
        match self.input.flush() {
            Some(text) => {
                self.apply_text(text)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn apply_text(&mut self, text: String) -> WorkspaceResult<()> {
        let before = self.document.version();
        if self.document.set_text(text) != before {
            self.refresh_tokens()?;
        }
        Ok(())
    }

    /// Live feedback for a selection
    pub fn check_selection(&self, start: usize, end: usize) -> WorkspaceResult<OverlapCheck> {
        Ok(self.document.check_selection(start, end)?)
    }

    /// Wrap a selection in a new tag and create its token
    pub fn tag_selection(&mut self, start: usize, end: usize, kind: TagKind) -> WorkspaceResult<MutationResult> {
        if !self.config.tag_types.contains(&kind) {
            return Err(annotator_editor::EditorError::UnknownTagKind(kind.to_string()).into());
        }
        self.flush_input()?;
        let result = self.document.tag_selection(start, end, kind)?;
        self.refresh_tokens()?;
        Ok(result)
    }

    /// Re-derive tagged tokens from the text. New tags get a token, renamed
    /// ones update theirs and tokens whose tag disappeared are deleted.
    /// Text that does not parse leaves the tokens as they are.
    #[instrument(skip(self), fields(version = self.document.version()))]
    pub fn refresh_tokens(&mut self) -> WorkspaceResult<()> {
        let tags = match self.document.tags() {
            Ok(tags) => tags,
            Err(err) => {
                warn!(error = %err, "Text does not parse, tokens kept");
                return Ok(());
            }
        };

        let mut created = 0;
        let mut seen = HashSet::new();
        for tag in &tags {
            if self.board.upsert_tagged(&tag.id, &tag.text)? {
                created += 1;
            }
            seen.insert(tag.id.as_str());
        }

        let vanished: Vec<TokenId> = self
            .board
            .pool(TokenKind::Tagged)
            .tag_ids()
            .filter(|id| !seen.contains(id))
            .map(TokenId::tagged)
            .collect();
        for id in &vanished {
            self.board.delete_token(id)?;
        }
        self.forward_board_events();

        debug!(created, removed = vanished.len(), "Tokens refreshed");
        self.events.push(AnnotatorEvent::TokensRefreshed {
            version: self.document.version(),
            created,
            removed: vanished.len(),
        });
        Ok(())
    }

    // ---- tokens and zones ----

    /// New untagged token for an entity the text does not tag
    pub fn add_untagged_token(&mut self, text: impl Into<String>) -> WorkspaceResult<TokenId> {
        let id = self.untagged_ids.new_id();
        Ok(self.board.add_token(TokenKind::Untagged, id, text)?)
    }

    /// Start dragging the token with the external id (`t3`, `u1`)
    pub fn begin_drag(&self, token_id: &str) -> WorkspaceResult<DragTransfer> {
        let id: TokenId = token_id.parse()?;
        Ok(self.board.begin_drag(&id)?)
    }

    pub fn drop_on(
        &mut self,
        transfer: DragTransfer,
        zone: ZoneId,
        notifier: &mut dyn Notifier,
    ) -> WorkspaceResult<DropOutcome> {
        let outcome = self.board.drop_on(transfer, zone, notifier);
        self.forward_board_events();
        Ok(outcome?)
    }

    pub fn create_link(&mut self) -> WorkspaceResult<ZoneId> {
        Ok(self.reconciler.create_link(&mut self.board)?)
    }

    pub fn select_link_record(&mut self, zone: ZoneId, record: &str, label: Option<String>) -> WorkspaceResult<()> {
        self.reconciler.select_record(zone, record, label)
    }

    pub fn remove_link(&mut self, zone: ZoneId) -> WorkspaceResult<Link> {
        let link = self.reconciler.remove_link(&mut self.board, zone);
        self.forward_board_events();
        let link = link?;
        self.events.push(AnnotatorEvent::LinkRemoved {
            zone,
            record: link.record.clone(),
        });
        Ok(link)
    }

    /// A record was picked in an item snak's search. The token already
    /// linked to that record is reused; otherwise an untagged token is
    /// created and linked. The token is then placed in `zone`.
    #[instrument(skip(self, label))]
    pub fn on_item_selected(&mut self, record: &str, label: &str, zone: ZoneId) -> WorkspaceResult<TokenId> {
        let token = match self.reconciler.token_for(&self.board, record) {
            Some(token) => token,
            None => {
                let token = self.add_untagged_token(label)?;
                self.reconciler.link_token(&mut self.board, &token, record)?;
                token
            }
        };
        let placed = self.board.place(zone, &token);
        self.forward_board_events();
        placed?;
        info!(%token, "Item placed");
        Ok(token)
    }

    // ---- schemas ----

    pub fn add_schema(&mut self) -> SchemaId {
        self.schemas.add_schema(&mut self.board)
    }

    pub fn remove_schema(&mut self, id: SchemaId) -> WorkspaceResult<Schema> {
        let schema = self.schemas.remove_schema(&mut self.board, id);
        self.forward_board_events();
        let schema = schema?;
        self.events.push(AnnotatorEvent::SchemaRemoved { schema: id });
        Ok(schema)
    }

    /// Edit a schema with access to the board its zones live on
    pub fn edit_schema<R>(
        &mut self,
        id: SchemaId,
        edit: impl FnOnce(&mut Schema, &mut Board) -> R,
    ) -> WorkspaceResult<R> {
        let schema = self.schemas.schema_mut(id)?;
        let result = edit(schema, &mut self.board);
        self.forward_board_events();
        Ok(result)
    }

    pub fn set_snak_type(&mut self, path: SnakPath, snak_type: SnakType) -> WorkspaceResult<()> {
        let snak = self.schemas.snak_mut(path)?;
        let changed = snak.set_snak_type(&mut self.board, snak_type);
        self.forward_board_events();
        Ok(changed?)
    }

    pub fn set_snak_value(&mut self, path: SnakPath, value: serde_json::Value) -> WorkspaceResult<()> {
        self.schemas.snak_mut(path)?.set_value(value)
    }

    /// [`Annotator::on_item_selected`] for the item snak at `path`
    pub fn select_snak_item(&mut self, path: SnakPath, record: &str, label: &str) -> WorkspaceResult<TokenId> {
        let zone = self
            .schemas
            .snak_mut(path)?
            .zone()
            .ok_or_else(|| WorkspaceError::UnknownSnak(path.to_string()))?;
        self.on_item_selected(record, label, zone)
    }

    // ---- services ----

    pub async fn search(&self, search: &dyn RecordSearch, query: &str) -> Vec<Candidate> {
        search_candidates(
            search,
            query,
            &self.config.language,
            Duration::from_millis(self.config.search_timeout_ms),
        )
        .await
    }

    /// Create a record for every token in the "new items" zone. A created
    /// record's id is stamped as `qid` on the token's tag and the token is
    /// linked to it. Failures leave the token where it was.
    pub async fn create_new_records(&mut self, creator: &dyn RecordCreation) -> WorkspaceResult<Vec<CreationReport>> {
        let mut reports = Vec::new();

        for token in self.reconciler.new_entities(&self.board) {
            let seed = self.seed_for(&token)?;
            let outcome = creator.create(&seed).await;

            match &outcome {
                Ok(qid) => {
                    if token.kind == TokenKind::Tagged {
                        self.document.apply(Mutation::SetTagAttribute {
                            tag_id: token.tag_id.clone(),
                            name: "qid".to_string(),
                            value: qid.clone(),
                        })?;
                    }
                    self.reconciler.link_token(&mut self.board, &token, qid)?;
                    info!(%token, %qid, "Record created");
                }
                Err(err) => warn!(%token, error = %err, "Record creation failed"),
            }
            reports.push(CreationReport { token, outcome });
        }

        self.forward_board_events();
        self.refresh_tokens()?;
        Ok(reports)
    }

    /// Terms and statements of the token's schema; a bare label when the
    /// token has no schema or its schema has no label
    fn seed_for(&self, token: &TokenId) -> WorkspaceResult<RecordSeed> {
        let unknown = self.reconciler.unknown_entities(&self.board);
        let (mut terms, statements) = match self.schemas.schema_for_token(&self.board, token) {
            Some(schema) => match schema.payload(&self.board, &unknown)? {
                Some(payload) => (payload.terms, payload.statements),
                None => (Vec::new(), Vec::new()),
            },
            None => (Vec::new(), Vec::new()),
        };

        if !terms.iter().any(|t| t.kind == TermKind::Label) {
            if let Some(text) = self.board.token(token).map(|t| t.full_text().to_string()) {
                terms.insert(
                    0,
                    Term {
                        kind: TermKind::Label,
                        lang_code: self.config.language.clone(),
                        value: text,
                    },
                );
            }
        }
        Ok(RecordSeed { terms, statements })
    }

    // ---- output ----

    pub fn submission(&self) -> WorkspaceResult<Submission> {
        Submission::build(self.document_id.clone(), &self.board, &self.reconciler, &self.schemas)
    }

    /// Events since the last drain
    pub fn drain_events(&mut self) -> Vec<AnnotatorEvent> {
        std::mem::take(&mut self.events)
    }

    /// Forward board events, keeping schemas in step. A token reconciling
    /// with the unknown value leaves every schema zone, which emits more
    /// events, so the queue is drained until it stays empty.
    fn forward_board_events(&mut self) {
        loop {
            let events = self.board.drain_events();
            if events.is_empty() {
                break;
            }
            for event in events {
                match &event {
                    BoardEvent::TokenAdded { token, zone } => {
                        self.schemas.on_token_added(&self.board, *zone, token);
                        if *zone == self.reconciler.unknown_items() {
                            if let Err(err) = self.schemas.release_token(&mut self.board, token) {
                                warn!(%token, error = %err, "Cannot release token from schemas");
                            }
                        }
                    }
                    BoardEvent::TokenRemoved { zone, .. } => self.schemas.on_token_removed(*zone),
                    _ => {}
                }
                self.events.push(AnnotatorEvent::Board { event });
            }
        }
    }
}
