use annotator_parser::{parse, Element, Fragment, Node};
use tracing::{debug, instrument, warn};

use crate::display::{Decoration, DisplayNode, Wrapper};
use crate::error::DisplayResult;

/// Placeholder shown for a gap of unknown extent
const EXTENT_PLACEHOLDER: &str = "----";

/// Largest number of missing characters a gap may declare
pub const MAX_GAP_QUANTITY: usize = 1000;

/// Transform a parsed fragment into its display tree
#[instrument(skip(fragment), fields(nodes = fragment.children.len()))]
pub fn to_display(fragment: &Fragment) -> Vec<DisplayNode> {
    transform_nodes(&fragment.children, false)
}

/// Parse `source` and transform it. Newlines are dropped before parsing;
/// the backward transform puts one back in front of every line break.
pub fn try_render(source: &str) -> DisplayResult<Vec<DisplayNode>> {
    let flattened = source.replace('\n', "");
    let fragment = parse(&flattened)?;
    Ok(to_display(&fragment))
}

/// Like [`try_render`], but a parse failure becomes a single error node
pub fn render(source: &str) -> Vec<DisplayNode> {
    match try_render(source) {
        Ok(nodes) => nodes,
        Err(err) => {
            warn!(error = %err, "Markup does not parse, rendering inline error");
            let span = match &err {
                crate::DisplayError::Parse(parse_err) => {
                    let pos = parse_err.pos();
                    Some(annotator_parser::Span::new(pos, pos))
                }
                crate::DisplayError::ErrorNode { .. } => None,
            };
            vec![DisplayNode::error(err.to_string(), span)]
        }
    }
}

fn transform_nodes(nodes: &[Node], incomplete: bool) -> Vec<DisplayNode> {
    nodes
        .iter()
        .map(|node| match node {
            Node::Element(element) => DisplayNode::Wrapper(transform_element(element, incomplete)),
            Node::Text { content, .. } => DisplayNode::text(content.clone()),
            Node::Comment { content, .. } => DisplayNode::Comment {
                content: content.clone(),
            },
        })
        .collect()
}

/// `<w part="I">` starts a word continued in a later fragment
fn is_incomplete(element: &Element) -> bool {
    element.name == "w" && element.attr("part") == Some("I")
}

fn transform_element(element: &Element, incomplete: bool) -> Wrapper {
    let mut wrapper = Wrapper::new(element.name.clone());
    for attr in &element.attributes {
        wrapper = wrapper.with_original_attr(&attr.name, attr.value.clone());
    }
    wrapper.self_closing = element.self_closing;
    wrapper.children = transform_nodes(&element.children, incomplete || is_incomplete(element));
    wrapper.decoration = decoration_for(element, incomplete);

    if let Decoration::Invalid { message } = &wrapper.decoration {
        debug!(element = %element.name, start = element.span.start, %message, "Invalid editorial element");
    }
    wrapper
}

/// Editorial rendering rule for one element. `incomplete` is set when an
/// ancestor is a continued word fragment.
fn decoration_for(element: &Element, incomplete: bool) -> Decoration {
    match element.name.as_str() {
        "lb" => Decoration::LineBreak,
        "gap" => gap(element),
        "del" => {
            if element.attr("rend") == Some("erasure") {
                Decoration::wrap("⟦", "⟧")
            } else {
                Decoration::invalid("del without rend=\"erasure\"")
            }
        }
        "supplied" => match element.attr("reason") {
            None => Decoration::invalid("supplied without reason"),
            Some("lost") => Decoration::wrap("[", uncertain_suffix(element, incomplete, ']')),
            Some("omitted") => Decoration::wrap("<", ">"),
            Some(_) => Decoration::Plain,
        },
        "surplus" => Decoration::wrap("{", "}"),
        "corr" => Decoration::wrap("<", ">"),
        "sic" => Decoration::Hidden,
        "ex" => Decoration::wrap("(", uncertain_suffix(element, incomplete, ')')),
        "space" => Decoration::replace("v."),
        "g" => Decoration::replace(format!("(({}))", element.attr("type").unwrap_or_default())),
        _ => Decoration::Plain,
    }
}

fn gap(element: &Element) -> Decoration {
    let quantity = element.attr("quantity");
    if !element.has_attr("reason") || (quantity.is_none() && !element.has_attr("extent")) {
        return Decoration::invalid("gap without reason or quantity or extent");
    }

    let mut text = match quantity {
        Some(quantity) => match quantity.trim().parse::<usize>() {
            Ok(n) if n <= MAX_GAP_QUANTITY => ".".repeat(n),
            _ => {
                return Decoration::invalid(format!(
                    "gap quantity {quantity:?} is not a number up to {MAX_GAP_QUANTITY}"
                ))
            }
        },
        None => EXTENT_PLACEHOLDER.to_string(),
    };
    if element.attr("reason") == Some("lost") {
        text = format!("[{text}]");
    }
    Decoration::Replace { text }
}

/// `?` for low certainty, `-` inside a continued word, then the closing glyph
fn uncertain_suffix(element: &Element, incomplete: bool, close: char) -> String {
    if element.attr("cert") == Some("low") {
        format!("?{close}")
    } else if incomplete {
        format!("-{close}")
    } else {
        close.to_string()
    }
}
