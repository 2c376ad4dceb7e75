use annotator_parser::is_self_closing;
use annotator_parser::serializer::write_attributes;
use tracing::instrument;

use crate::display::{DisplayNode, Wrapper};
use crate::error::{DisplayError, DisplayResult};

/// Rebuild markup text from a display tree.
///
/// Each sibling list is written independently: a line break that follows
/// text already written at its own level gets a newline in front of it.
/// Error nodes have no markup form and fail the whole conversion.
#[instrument(skip(nodes), fields(nodes = nodes.len()))]
pub fn from_display(nodes: &[DisplayNode]) -> DisplayResult<String> {
    let mut text = String::new();
    for node in nodes {
        match node {
            DisplayNode::Text { content } => text.push_str(content),
            DisplayNode::Comment { content } => text.push_str(content),
            DisplayNode::Wrapper(wrapper) => {
                if !text.is_empty() && wrapper.tag == "lb" {
                    text.push('\n');
                }
                write_wrapper(&mut text, wrapper)?;
            }
            DisplayNode::Error { message, .. } => {
                return Err(DisplayError::error_node(message.clone()));
            }
        }
    }
    Ok(text)
}

fn write_wrapper(text: &mut String, wrapper: &Wrapper) -> DisplayResult<()> {
    text.push('<');
    text.push_str(&wrapper.tag);
    write_attributes(text, &wrapper.original_attributes());

    if wrapper.children.is_empty() && (wrapper.self_closing || is_self_closing(&wrapper.tag)) {
        text.push_str("/>");
        return Ok(());
    }

    text.push('>');
    text.push_str(&from_display(&wrapper.children)?);
    text.push_str("</");
    text.push_str(&wrapper.tag);
    text.push('>');
    Ok(())
}
