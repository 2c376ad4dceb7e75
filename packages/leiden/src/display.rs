use annotator_parser::{decode_entities, Attribute, Span};
use serde::{Deserialize, Serialize};

/// Display attribute holding the original element name
pub const TAG_ATTR: &str = "data-tei-tag";

/// Prefix for display attributes that carry original element attributes
pub const ATTR_PREFIX: &str = "data-tei-attr-";

/// Node of the display tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DisplayNode {
    /// Text copied verbatim from the markup (entities undecoded)
    Text { content: String },

    /// Wrapper standing for one markup element
    Wrapper(Wrapper),

    /// Markup comment, invisible but kept for the round trip
    Comment { content: String },

    /// Inline diagnostic shown instead of content that could not be displayed
    Error {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        span: Option<Span>,
    },
}

/// Generic display wrapper for a markup element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wrapper {
    /// Original element name
    pub tag: String,
    /// Original attributes, renamed with [`ATTR_PREFIX`], in source order
    pub attributes: Vec<Attribute>,
    /// Transformed children, free of decorative glyphs
    pub children: Vec<DisplayNode>,
    pub decoration: Decoration,
    /// Element was written `<name/>` in the markup
    #[serde(default)]
    pub self_closing: bool,
}

/// Editorial rendering applied to a wrapper
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Decoration {
    /// Children shown as they are
    #[default]
    Plain,

    /// Children shown between a prefix and a suffix
    Wrap { prefix: String, suffix: String },

    /// Children replaced by a fixed text
    Replace { text: String },

    /// Nothing shown
    Hidden,

    /// Children followed by a line break
    LineBreak,

    /// Element misses required attributes; the message replaces its content
    Invalid { message: String },
}

impl Decoration {
    pub fn wrap(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Decoration::Wrap {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    pub fn replace(text: impl Into<String>) -> Self {
        Decoration::Replace { text: text.into() }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Decoration::Invalid {
            message: message.into(),
        }
    }
}

impl DisplayNode {
    pub fn text(content: impl Into<String>) -> Self {
        DisplayNode::Text {
            content: content.into(),
        }
    }

    pub fn error(message: impl Into<String>, span: Option<Span>) -> Self {
        DisplayNode::Error {
            message: message.into(),
            span,
        }
    }

    pub fn as_wrapper(&self) -> Option<&Wrapper> {
        match self {
            DisplayNode::Wrapper(wrapper) => Some(wrapper),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, DisplayNode::Error { .. })
    }

    pub(crate) fn write_visible_text(&self, out: &mut String) {
        match self {
            DisplayNode::Text { content } => out.push_str(&decode_entities(content)),
            DisplayNode::Wrapper(wrapper) => wrapper.write_visible_text(out),
            DisplayNode::Comment { .. } => {}
            DisplayNode::Error { message, .. } => out.push_str(message),
        }
    }
}

impl Wrapper {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            decoration: Decoration::Plain,
            self_closing: false,
        }
    }

    /// Add an original attribute under its display name
    pub fn with_original_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attributes
            .push(Attribute::new(format!("{ATTR_PREFIX}{name}"), value));
        self
    }

    pub fn with_child(mut self, child: DisplayNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_decoration(mut self, decoration: Decoration) -> Self {
        self.decoration = decoration;
        self
    }

    /// Original attributes recovered from the display-namespaced ones.
    /// Attributes outside the namespace are not part of the markup.
    pub fn original_attributes(&self) -> Vec<Attribute> {
        self.attributes
            .iter()
            .filter_map(|attr| {
                attr.name
                    .strip_prefix(ATTR_PREFIX)
                    .map(|name| Attribute::new(name, attr.value.clone()))
            })
            .collect()
    }

    /// Original value of attribute `name`
    pub fn original_attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name.strip_prefix(ATTR_PREFIX) == Some(name))
            .map(|attr| attr.value.as_str())
    }

    fn write_visible_text(&self, out: &mut String) {
        match &self.decoration {
            Decoration::Plain => self.write_children_text(out),
            Decoration::Wrap { prefix, suffix } => {
                out.push_str(prefix);
                self.write_children_text(out);
                out.push_str(suffix);
            }
            Decoration::Replace { text } => out.push_str(text),
            Decoration::Hidden => {}
            Decoration::LineBreak => {
                self.write_children_text(out);
                out.push('\n');
            }
            Decoration::Invalid { message } => out.push_str(message),
        }
    }

    fn write_children_text(&self, out: &mut String) {
        for child in &self.children {
            child.write_visible_text(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_original_attributes_skip_foreign_names() {
        let mut wrapper = Wrapper::new("w")
            .with_original_attr("id", "1")
            .with_original_attr("type", "person");
        wrapper.attributes.push(Attribute::new("class", "anno"));

        assert_eq!(
            wrapper.original_attributes(),
            vec![Attribute::new("id", "1"), Attribute::new("type", "person")]
        );
        assert_eq!(wrapper.original_attr("type"), Some("person"));
        assert_eq!(wrapper.original_attr("class"), None);
    }

    #[test]
    fn test_visible_text_per_decoration() {
        let wrap = DisplayNode::Wrapper(
            Wrapper::new("ex")
                .with_child(DisplayNode::text("imp"))
                .with_decoration(Decoration::wrap("(", "?)")),
        );
        let hidden = DisplayNode::Wrapper(
            Wrapper::new("sic")
                .with_child(DisplayNode::text("x"))
                .with_decoration(Decoration::Hidden),
        );
        let line = DisplayNode::Wrapper(Wrapper::new("lb").with_decoration(Decoration::LineBreak));

        let mut out = String::new();
        for node in [wrap, hidden, line, DisplayNode::text("a &amp; b")] {
            node.write_visible_text(&mut out);
        }
        assert_eq!(out, "(imp?)\na & b");
    }

    #[test]
    fn test_serializes_with_type_tag() {
        let node = DisplayNode::Wrapper(Wrapper::new("lb").with_decoration(Decoration::LineBreak));
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "Wrapper");
        assert_eq!(json["tag"], "lb");
        assert_eq!(json["decoration"]["kind"], "lineBreak");
    }
}
