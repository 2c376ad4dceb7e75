use annotator_parser::decode_entities;

use crate::display::{Decoration, DisplayNode, Wrapper, TAG_ATTR};

/// Render a display tree as HTML: one `span` per wrapper carrying the
/// `data-tei-*` attributes, glyphs as text, `<br>` for line breaks.
pub fn render_html(nodes: &[DisplayNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(&mut out, node);
    }
    out
}

fn write_node(out: &mut String, node: &DisplayNode) {
    match node {
        DisplayNode::Text { content } => out.push_str(&escape(&decode_entities(content))),
        DisplayNode::Wrapper(wrapper) => write_wrapper(out, wrapper),
        DisplayNode::Comment { .. } => {}
        DisplayNode::Error { message, .. } => {
            out.push_str("<span class=\"leiden-error\">");
            out.push_str(&escape(message));
            out.push_str("</span>");
        }
    }
}

fn write_wrapper(out: &mut String, wrapper: &Wrapper) {
    out.push_str("<span ");
    out.push_str(TAG_ATTR);
    out.push_str("=\"");
    out.push_str(&escape(&wrapper.tag));
    out.push('"');
    for attr in &wrapper.attributes {
        out.push(' ');
        out.push_str(&attr.name);
        out.push_str("=\"");
        out.push_str(&escape(&decode_entities(&attr.value)));
        out.push('"');
    }
    if wrapper.decoration == Decoration::Hidden {
        out.push_str(" hidden");
    }
    if matches!(wrapper.decoration, Decoration::Invalid { .. }) {
        out.push_str(" class=\"leiden-error\"");
    }
    out.push('>');

    match &wrapper.decoration {
        Decoration::Plain | Decoration::Hidden => write_children(out, wrapper),
        Decoration::Wrap { prefix, suffix } => {
            out.push_str(&escape(prefix));
            write_children(out, wrapper);
            out.push_str(&escape(suffix));
        }
        Decoration::Replace { text } => out.push_str(&escape(text)),
        Decoration::Invalid { message } => out.push_str(&escape(message)),
        Decoration::LineBreak => {
            write_children(out, wrapper);
            out.push_str("<br>");
        }
    }

    out.push_str("</span>");
}

fn write_children(out: &mut String, wrapper: &Wrapper) {
    for child in &wrapper.children {
        write_node(out, child);
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
