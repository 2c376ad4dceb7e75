//! # Buffer mutations
//!
//! Edits of the markup buffer that the editor performs on the user's
//! behalf. Free typing is a whole-buffer replacement; tagging and
//! attribute stamping are computed against the current text.

use annotator_common::{walk_element_mut, VisitorMut};
use annotator_parser::{parse, serialize, Element, ENTITY_TAG};
use serde::{Deserialize, Serialize};

use crate::errors::{EditorError, EditorResult};
use crate::overlap::{selected, validate_selection};
use crate::tags::TagKind;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Mutation {
    /// Wrap the bytes `start..end` in a new `<w>` tag
    TagSelection {
        start: usize,
        end: usize,
        kind: TagKind,
    },

    /// Set an attribute on every `<w>` element with the given id
    SetTagAttribute {
        tag_id: String,
        name: String,
        value: String,
    },

    /// Replace the whole buffer
    ReplaceText { text: String },
}

/// Result of applying a mutation
#[derive(Debug, Clone, PartialEq)]
pub struct MutationResult {
    /// Document version after the mutation
    pub version: u64,
    /// Id given to a newly inserted tag
    pub tag_id: Option<u64>,
    /// Byte range to select afterwards: the tagged text inside its new tag
    pub selection: Option<(usize, usize)>,
}

/// Text with `text[start..end]` wrapped in a `<w>` tag with id `tag_id`.
/// Returns the new text and the range of the wrapped content.
pub fn insert_tag(
    text: &str,
    start: usize,
    end: usize,
    kind: TagKind,
    tag_id: u64,
) -> EditorResult<(String, (usize, usize))> {
    let check = validate_selection(text, start, end)?;
    if let Some(reason) = check.reason {
        return Err(EditorError::Overlap(reason));
    }
    let selection = selected(text, start, end)?;

    let open = match kind.type_attr() {
        Some(kind) => format!(r#"<{ENTITY_TAG} id="{tag_id}" type="{kind}">"#),
        None => format!(r#"<{ENTITY_TAG} id="{tag_id}">"#),
    };

    let mut out = String::with_capacity(text.len() + open.len() + 4);
    out.push_str(&text[..start]);
    out.push_str(&open);
    out.push_str(selection);
    out.push_str("</");
    out.push_str(ENTITY_TAG);
    out.push('>');
    out.push_str(&text[end..]);

    let content_start = start + open.len();
    Ok((out, (content_start, content_start + selection.len())))
}

struct AttributeStamp<'a> {
    tag_id: &'a str,
    name: &'a str,
    value: &'a str,
    stamped: usize,
}

impl VisitorMut for AttributeStamp<'_> {
    fn visit_element_mut(&mut self, element: &mut Element) {
        if element.name == ENTITY_TAG && element.attr("id") == Some(self.tag_id) {
            element.set_attr(self.name, self.value);
            self.stamped += 1;
        }
        walk_element_mut(self, element);
    }
}

/// Text with `name="value"` set on every `<w id="tag_id">` fragment
pub fn set_tag_attribute(text: &str, tag_id: &str, name: &str, value: &str) -> EditorResult<String> {
    let mut fragment = parse(text)?;
    let mut stamp = AttributeStamp {
        tag_id,
        name,
        value,
        stamped: 0,
    };
    stamp.visit_fragment_mut(&mut fragment);

    if stamp.stamped == 0 {
        return Err(EditorError::UnknownTag(tag_id.to_string()));
    }
    Ok(serialize(&fragment))
}
