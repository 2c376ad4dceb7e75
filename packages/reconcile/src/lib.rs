//! # Annotator reconciliation
//!
//! Tokens, pools and drop zones: the state machine that tracks which
//! tagged spans are reconciled to which knowledge-base records.
//!
//! ```text
//!  Pool(tagged)   Pool(untagged)
//!       │               │
//!       └──begin_drag───┘
//!               │ DragTransfer
//!               ▼
//!          drop_on(zone) ──▶ Single │ Multi │ Delete
//!               │
//!               └──▶ BoardEvent (TokenAdded, TokenRemoved, ...)
//! ```

pub mod board;
pub mod error;
pub mod events;
pub mod notifier;
pub mod pool;
pub mod token;
pub mod zone;

pub use board::{Board, DragTransfer, DropOutcome, DELETE_CONFIRM, DELETE_REJECTED};
pub use error::{ReconcileError, ReconcileResult};
pub use events::{BoardEvent, Subscriber};
pub use notifier::Notifier;
pub use pool::Pool;
pub use token::{
    truncate_chars, Container, ReconciliationStatus, Token, TokenId, TokenKind, TokenSummary,
    TokenView, MAX_DISPLAY_LENGTH,
};
pub use zone::{Condition, DropZone, ZoneId, ZoneKind};
