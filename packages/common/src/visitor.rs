use annotator_parser::ast::*;

/// Visitor pattern for traversing markup trees immutably
///
/// Default implementations walk the entire tree in document order.
/// Override specific visit_* methods to act on nodes.
pub trait Visitor: Sized {
    fn visit_fragment(&mut self, fragment: &Fragment) {
        walk_fragment(self, fragment);
    }

    fn visit_node(&mut self, node: &Node) {
        walk_node(self, node);
    }

    fn visit_element(&mut self, element: &Element) {
        walk_element(self, element);
    }

    fn visit_text(&mut self, _content: &str, _span: Span) {
        // Leaf node, no children to walk
    }

    fn visit_comment(&mut self, _content: &str, _span: Span) {
        // Leaf node, no children to walk
    }
}

/// Mutable visitor pattern for transforming markup trees
///
/// Similar to Visitor, but provides mutable access to nodes.
pub trait VisitorMut: Sized {
    fn visit_fragment_mut(&mut self, fragment: &mut Fragment) {
        walk_fragment_mut(self, fragment);
    }

    fn visit_node_mut(&mut self, node: &mut Node) {
        walk_node_mut(self, node);
    }

    fn visit_element_mut(&mut self, element: &mut Element) {
        walk_element_mut(self, element);
    }

    fn visit_text_mut(&mut self, _content: &mut String) {
        // Leaf node, no children to walk
    }
}

// Default walk implementations for immutable visitor

pub fn walk_fragment<V: Visitor>(visitor: &mut V, fragment: &Fragment) {
    for node in &fragment.children {
        visitor.visit_node(node);
    }
}

pub fn walk_node<V: Visitor>(visitor: &mut V, node: &Node) {
    match node {
        Node::Element(element) => visitor.visit_element(element),
        Node::Text { content, span } => visitor.visit_text(content, *span),
        Node::Comment { content, span } => visitor.visit_comment(content, *span),
    }
}

pub fn walk_element<V: Visitor>(visitor: &mut V, element: &Element) {
    for child in &element.children {
        visitor.visit_node(child);
    }
}

// Default walk implementations for mutable visitor

pub fn walk_fragment_mut<V: VisitorMut>(visitor: &mut V, fragment: &mut Fragment) {
    for node in &mut fragment.children {
        visitor.visit_node_mut(node);
    }
}

pub fn walk_node_mut<V: VisitorMut>(visitor: &mut V, node: &mut Node) {
    match node {
        Node::Element(element) => visitor.visit_element_mut(element),
        Node::Text { content, .. } => visitor.visit_text_mut(content),
        Node::Comment { .. } => {}
    }
}

pub fn walk_element_mut<V: VisitorMut>(visitor: &mut V, element: &mut Element) {
    for child in &mut element.children {
        visitor.visit_node_mut(child);
    }
}

/// Collects every element with the given name, outermost first
pub struct ElementCollector<'a> {
    name: &'a str,
    pub found: Vec<Element>,
}

impl<'a> ElementCollector<'a> {
    pub fn new(name: &'a str) -> Self {
        Self {
            name,
            found: Vec::new(),
        }
    }
}

impl Visitor for ElementCollector<'_> {
    fn visit_element(&mut self, element: &Element) {
        if element.name == self.name {
            self.found.push(element.clone());
        }
        walk_element(self, element);
    }
}

/// All elements named `name` in document order
pub fn find_elements(fragment: &Fragment, name: &str) -> Vec<Element> {
    let mut collector = ElementCollector::new(name);
    collector.visit_fragment(fragment);
    collector.found
}
