use crate::ast::*;

/// Element names that are always written as `<name/>` when childless
pub const SELF_CLOSING: &[&str] = &["lb", "gap", "g", "space"];

pub fn is_self_closing(name: &str) -> bool {
    SELF_CLOSING.contains(&name)
}

/// Serializer converts a markup tree back to source text.
///
/// Text and attribute values are written raw (they were never decoded), so
/// a parsed fragment serializes back to its source byte for byte, apart from
/// whitespace inside tags which is normalized to single spaces.
pub struct Serializer {
    output: String,
}

impl Serializer {
    pub fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    /// Serialize a whole fragment
    pub fn serialize(mut self, fragment: &Fragment) -> String {
        for node in &fragment.children {
            self.write_node(node);
        }
        self.output
    }

    /// Serialize a list of sibling nodes
    pub fn serialize_nodes(mut self, nodes: &[Node]) -> String {
        for node in nodes {
            self.write_node(node);
        }
        self.output
    }

    fn write_node(&mut self, node: &Node) {
        match node {
            Node::Element(element) => self.write_element(element),
            Node::Text { content, .. } => self.output.push_str(content),
            Node::Comment { content, .. } => self.output.push_str(content),
        }
    }

    fn write_element(&mut self, element: &Element) {
        self.output.push('<');
        self.output.push_str(&element.name);
        write_attributes(&mut self.output, &element.attributes);

        if element.children.is_empty() && (element.self_closing || is_self_closing(&element.name)) {
            self.output.push_str("/>");
            return;
        }

        self.output.push('>');
        for child in &element.children {
            self.write_node(child);
        }
        self.output.push_str("</");
        self.output.push_str(&element.name);
        self.output.push('>');
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

/// Write ` name="value"` pairs, switching to single quotes when the value
/// itself contains a double quote
pub fn write_attributes(output: &mut String, attributes: &[Attribute]) {
    for attr in attributes {
        output.push(' ');
        output.push_str(&attr.name);
        output.push('=');
        let quote = if attr.value.contains('"') { '\'' } else { '"' };
        output.push(quote);
        output.push_str(&attr.value);
        output.push(quote);
    }
}

/// Serialize a fragment to markup text
pub fn serialize(fragment: &Fragment) -> String {
    Serializer::new().serialize(fragment)
}
