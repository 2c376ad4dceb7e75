//! # Annotator text editor
//!
//! Owns the transcription's markup buffer and everything that edits it.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ parser: markup text → Fragment              │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: TextDocument                        │
//! │  - overlap validation of selections         │
//! │  - tag insertion and attribute stamping     │
//! │  - <w> tag extraction                       │
//! │  - debounced input                          │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ leiden: Fragment → display tree             │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use annotator_editor::{TagKind, TextDocument};
//!
//! let mut doc = TextDocument::new("Caesar crossed the river.");
//! doc.tag_selection(0, 6, TagKind::Person).unwrap();
//! assert_eq!(
//!     doc.source(),
//!     r#"<w id="1" type="person">Caesar</w> crossed the river."#
//! );
//! ```

mod debounce;
mod document;
mod errors;
mod mutations;
mod overlap;
mod tags;

pub use debounce::{InputDebouncer, DEFAULT_DEBOUNCE_MS};
pub use document::TextDocument;
pub use errors::{EditorError, EditorResult};
pub use mutations::{insert_tag, set_tag_attribute, Mutation, MutationResult};
pub use overlap::{
    check_character_overlap, check_tag_overlap, validate_selection, OverlapCheck, OverlapReason,
};
pub use tags::{extract_tags, TagKind, TagRecord, UntaggedIds};

pub use web_time::{Duration, Instant};
