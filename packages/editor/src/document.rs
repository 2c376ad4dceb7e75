//! # Text document
//!
//! The raw markup buffer is the source of truth. The parsed fragment and
//! the Leiden display tree are derived from it lazily and dropped on every
//! change.
//!
//! ```text
//! set_text / apply ──▶ source ──parse──▶ Fragment ──▶ tags()
//!                         │
//!                         └──render──▶ [DisplayNode] ──▶ display()
//! ```

use annotator_leiden::{render, DisplayNode};
use annotator_parser::{next_free_tag_id, parse, Fragment, ParseResult};
use tracing::{debug, info, warn};

use crate::errors::{EditorError, EditorResult};
use crate::mutations::{insert_tag, set_tag_attribute, Mutation, MutationResult};
use crate::overlap::{validate_selection, OverlapCheck};
use crate::tags::{extract_tags, TagKind, TagRecord};

/// Editable transcription text
#[derive(Debug)]
pub struct TextDocument {
    source: String,

    /// Increments on every change of `source`
    version: u64,

    fragment: Option<ParseResult<Fragment>>,
    display: Option<Vec<DisplayNode>>,
}

impl TextDocument {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            version: 0,
            fragment: None,
            display: None,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Id the next inserted tag will get: one more than the highest id
    /// in the current text
    pub fn next_tag_id(&self) -> u64 {
        next_free_tag_id(&self.source)
    }

    /// Replace the buffer with user input
    pub fn set_text(&mut self, text: impl Into<String>) -> u64 {
        let text = text.into();
        if text == self.source {
            return self.version;
        }
        self.source = text;
        self.invalidate();
        self.version
    }

    fn invalidate(&mut self) {
        self.version += 1;
        self.fragment = None;
        self.display = None;
    }

    /// Parsed buffer
    pub fn fragment(&mut self) -> EditorResult<&Fragment> {
        let source = &self.source;
        match self.fragment.get_or_insert_with(|| parse(source)) {
            Ok(fragment) => Ok(fragment),
            Err(err) => Err(EditorError::Parse(err.clone())),
        }
    }

    /// Leiden display of the buffer. A buffer that does not parse shows
    /// a single error node.
    pub fn display(&mut self) -> &[DisplayNode] {
        let source = &self.source;
        self.display.get_or_insert_with(|| render(source))
    }

    /// Entity tags in the buffer
    pub fn tags(&mut self) -> EditorResult<Vec<TagRecord>> {
        Ok(extract_tags(self.fragment()?))
    }

    /// Live feedback for the current selection
    pub fn check_selection(&self, start: usize, end: usize) -> EditorResult<OverlapCheck> {
        validate_selection(&self.source, start, end)
    }

    /// Wrap `start..end` in a new tag of the given kind
    pub fn tag_selection(&mut self, start: usize, end: usize, kind: TagKind) -> EditorResult<MutationResult> {
        self.apply(Mutation::TagSelection { start, end, kind })
    }

    pub fn apply(&mut self, mutation: Mutation) -> EditorResult<MutationResult> {
        debug!(?mutation, version = self.version, "Applying mutation");

        match mutation {
            Mutation::TagSelection { start, end, kind } => {
                let tag_id = self.next_tag_id();
                let (text, selection) = match insert_tag(&self.source, start, end, kind, tag_id) {
                    Ok(inserted) => inserted,
                    Err(err) => {
                        warn!(error = %err, start, end, "Tag insertion refused");
                        return Err(err);
                    }
                };
                self.source = text;
                self.invalidate();
                info!(tag_id, %kind, version = self.version, "Tagged selection");

                Ok(MutationResult {
                    version: self.version,
                    tag_id: Some(tag_id),
                    selection: Some(selection),
                })
            }

            Mutation::SetTagAttribute { tag_id, name, value } => {
                let text = set_tag_attribute(&self.source, &tag_id, &name, &value)?;
                self.source = text;
                self.invalidate();
                info!(%tag_id, %name, version = self.version, "Set tag attribute");
                Ok(self.result())
            }

            Mutation::ReplaceText { text } => {
                self.set_text(text);
                Ok(self.result())
            }
        }
    }

    fn result(&self) -> MutationResult {
        MutationResult {
            version: self.version,
            tag_id: None,
            selection: None,
        }
    }
}
