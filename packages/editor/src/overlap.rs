//! # Tag overlap validation
//!
//! Decides whether a selection of the raw markup can be wrapped in a new
//! `<w>` tag. Two independent checks run on every candidate:
//!
//! - the **character** check looks at `<` and `>` only: the selection
//!   must not cut a tag delimiter in half, and must not start inside a
//!   tag that began before it;
//! - the **structural** check matches whole tags by name: every tag
//!   closed inside the selection must have been opened inside it, and
//!   every tag opened inside it must also close inside it.
//!
//! A selection holding complete tags (`<w id="1">a</w> b`) passes both,
//! so compound spans can be re-tagged.
//!
//! Offsets are byte offsets into the UTF-8 text.

use std::fmt;

use annotator_parser::tokenizer::{tag_name, tokenize, Token};
use serde::{Deserialize, Serialize};

use crate::errors::{EditorError, EditorResult};

/// Why a selection cannot be tagged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OverlapReason {
    /// The selection contains the end of a tag but not its start
    EndOfTag,
    /// The selection contains the start of a tag but not its end
    StartOfTag,
    /// The selection begins inside a tag
    MiddleOfTag,
}

impl OverlapReason {
    pub fn message(&self) -> &'static str {
        match self {
            OverlapReason::EndOfTag => "end of tag selected",
            OverlapReason::StartOfTag => "start of tag selected",
            OverlapReason::MiddleOfTag => "middle of tag selected",
        }
    }
}

impl fmt::Display for OverlapReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of an overlap check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlapCheck {
    pub overlaps: bool,
    pub reason: Option<OverlapReason>,
}

impl OverlapCheck {
    pub const CLEAR: OverlapCheck = OverlapCheck {
        overlaps: false,
        reason: None,
    };

    fn rejected(reason: OverlapReason) -> Self {
        Self {
            overlaps: true,
            reason: Some(reason),
        }
    }

    /// Status line text for live selection feedback
    pub fn message(&self) -> &'static str {
        self.reason.map_or("", |reason| reason.message())
    }
}

/// Character check. `selection` is the selected substring and
/// `selection_start` its byte offset in `text`.
pub fn check_character_overlap(text: &str, selection: &str, selection_start: usize) -> OverlapCheck {
    // Only `<` is ever pushed, so the stack reduces to its depth
    let mut open = 0usize;
    for c in selection.chars() {
        match c {
            '<' => open += 1,
            '>' if open == 0 => return OverlapCheck::rejected(OverlapReason::EndOfTag),
            '>' => open -= 1,
            _ => {}
        }
    }
    if open > 0 {
        return OverlapCheck::rejected(OverlapReason::StartOfTag);
    }

    let before = text.get(..selection_start.min(text.len())).unwrap_or_default();
    for c in before.chars().rev() {
        match c {
            '>' => break,
            '<' => return OverlapCheck::rejected(OverlapReason::MiddleOfTag),
            _ => {}
        }
    }

    OverlapCheck::CLEAR
}

/// Structural check over the tags inside `selection`
pub fn check_tag_overlap(selection: &str) -> OverlapCheck {
    let mut open: Vec<&str> = Vec::new();

    for (token, _) in tokenize(selection) {
        match token {
            Ok(Token::StartTag(raw)) if !raw.ends_with("/>") => open.push(tag_name(raw)),
            Ok(Token::EndTag(raw)) => match open.pop() {
                Some(name) if name == tag_name(raw) => {}
                // Closes a tag that was opened before the selection
                _ => return OverlapCheck::rejected(OverlapReason::EndOfTag),
            },
            // Partial tags are the character check's concern
            _ => {}
        }
    }

    if open.is_empty() {
        OverlapCheck::CLEAR
    } else {
        OverlapCheck::rejected(OverlapReason::StartOfTag)
    }
}

/// Run both checks on `text[start..end]` and report the first violation.
///
/// An empty or malformed range is a caller error, not an overlap.
pub fn validate_selection(text: &str, start: usize, end: usize) -> EditorResult<OverlapCheck> {
    let selection = selected(text, start, end)?;
    if selection.is_empty() {
        return Err(EditorError::EmptySelection);
    }

    let check = check_character_overlap(text, selection, start);
    if check.overlaps {
        return Ok(check);
    }
    Ok(check_tag_overlap(selection))
}

/// `text[start..end]`, or `InvalidRange` when the offsets do not describe
/// a range on char boundaries
pub(crate) fn selected(text: &str, start: usize, end: usize) -> EditorResult<&str> {
    if start > end {
        return Err(EditorError::invalid_range(start, end, text.len()));
    }
    text.get(start..end)
        .ok_or_else(|| EditorError::invalid_range(start, end, text.len()))
}
