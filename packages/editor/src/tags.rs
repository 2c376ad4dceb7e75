use std::fmt;
use std::str::FromStr;

use annotator_common::{walk_element, Visitor};
use annotator_parser::{Element, Fragment, ENTITY_TAG};
use serde::{Deserialize, Serialize};

use crate::errors::EditorError;

/// Entity type offered by the tagging buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    Untyped,
    Person,
    Place,
    Resource,
}

impl TagKind {
    pub const ALL: [TagKind; 4] = [
        TagKind::Untyped,
        TagKind::Person,
        TagKind::Place,
        TagKind::Resource,
    ];

    /// Value of the `type` attribute, `None` for a bare `<w>`
    pub fn type_attr(&self) -> Option<&'static str> {
        match self {
            TagKind::Untyped => None,
            TagKind::Person => Some("person"),
            TagKind::Place => Some("place"),
            TagKind::Resource => Some("resource"),
        }
    }

    /// Kind named by a `type` attribute. Unknown types are kept as untyped.
    pub fn from_type_attr(value: Option<&str>) -> Self {
        match value {
            Some("person") => TagKind::Person,
            Some("place") => TagKind::Place,
            Some("resource") => TagKind::Resource,
            _ => TagKind::Untyped,
        }
    }

    /// Button label
    pub fn label(&self) -> &'static str {
        match self {
            TagKind::Untyped => "<w>",
            TagKind::Person => "Person",
            TagKind::Place => "Place",
            TagKind::Resource => "Resource",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_attr().unwrap_or("untyped"))
    }
}

impl FromStr for TagKind {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "untyped" | "w" => Ok(TagKind::Untyped),
            "person" => Ok(TagKind::Person),
            "place" => Ok(TagKind::Place),
            "resource" => Ok(TagKind::Resource),
            other => Err(EditorError::UnknownTagKind(other.to_string())),
        }
    }
}

/// One entity tag found in the document. Fragments of a word split over
/// several `<w>` elements sharing an id are merged into one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagRecord {
    pub id: String,
    pub kind: TagKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qid: Option<String>,
    /// Number of `<w>` elements carrying this id
    pub fragments: usize,
    pub text: String,
}

struct TagExtractor {
    records: Vec<TagRecord>,
}

impl Visitor for TagExtractor {
    fn visit_element(&mut self, element: &Element) {
        if element.name == ENTITY_TAG {
            self.record(element);
        }
        walk_element(self, element);
    }
}

impl TagExtractor {
    fn record(&mut self, element: &Element) {
        let id = match element.attr("id") {
            Some(id) if !id.is_empty() => id,
            _ => return,
        };
        let text = element.text_content();

        if let Some(existing) = self.records.iter_mut().find(|r| r.id == id) {
            existing.text.push_str(&text);
            existing.fragments += 1;
            if existing.qid.is_none() {
                existing.qid = element.attr("qid").map(str::to_string);
            }
            return;
        }

        self.records.push(TagRecord {
            id: id.to_string(),
            kind: TagKind::from_type_attr(element.attr("type")),
            qid: element.attr("qid").map(str::to_string),
            fragments: 1,
            text,
        });
    }
}

/// Every `<w>` tag with a non-empty id, in document order
pub fn extract_tags(fragment: &Fragment) -> Vec<TagRecord> {
    let mut extractor = TagExtractor {
        records: Vec::new(),
    };
    extractor.visit_fragment(fragment);
    extractor.records
}

/// Allocator for untagged-entity ids
#[derive(Debug, Clone)]
pub struct UntaggedIds {
    next: u64,
}

impl UntaggedIds {
    /// Start after the highest numeric id in `existing`
    pub fn after<'a>(existing: impl IntoIterator<Item = &'a str>) -> Self {
        let max = existing
            .into_iter()
            .filter_map(|id| id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self { next: max + 1 }
    }

    pub fn new_id(&mut self) -> String {
        let id = self.next;
        self.next += 1;
        id.to_string()
    }
}

impl Default for UntaggedIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}
