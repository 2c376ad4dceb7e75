use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::tokenizer::{tag_name, tokenize, Lexed, Token};
use tracing::debug;

/// Parser for inline transcription markup.
///
/// The source is treated as the content of a synthetic root element, so any
/// number of top-level siblings (text, elements, comments) is accepted.
pub struct Parser<'src> {
    tokens: Vec<Lexed<'src>>,
    pos: usize,
}

/// Element under construction
struct OpenElement {
    element: Element,
    start: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            tokens: tokenize(source),
            pos: 0,
        }
    }

    /// Parse the whole source as a fragment
    pub fn parse_fragment(&mut self) -> ParseResult<Fragment> {
        let mut root: Vec<Node> = Vec::new();
        let mut stack: Vec<OpenElement> = Vec::new();

        while self.pos < self.tokens.len() {
            let (token, range) = self.tokens[self.pos].clone();
            self.pos += 1;

            let token = token.map_err(|_| ParseError::lexer_error(range.start))?;

            match token {
                Token::Text(text) => {
                    push_child(&mut root, &mut stack, Node::Text {
                        content: text.to_string(),
                        span: Span::new(range.start, range.end),
                    });
                }

                Token::Comment(comment) => {
                    push_child(&mut root, &mut stack, Node::Comment {
                        content: comment.to_string(),
                        span: Span::new(range.start, range.end),
                    });
                }

                Token::StartTag(raw) => {
                    let (name, attributes, self_closing) = parse_start_tag(raw, range.start)?;
                    let element = Element {
                        name,
                        attributes,
                        children: Vec::new(),
                        self_closing,
                        span: Span::new(range.start, range.end),
                    };

                    if self_closing {
                        push_child(&mut root, &mut stack, Node::Element(element));
                    } else {
                        stack.push(OpenElement {
                            element,
                            start: range.start,
                        });
                    }
                }

                Token::EndTag(raw) => {
                    let name = tag_name(raw);
                    let open = match stack.pop() {
                        Some(open) => open,
                        None => {
                            return Err(ParseError::unexpected_closing_tag(range.start, None, name));
                        }
                    };

                    if open.element.name != name {
                        return Err(ParseError::unexpected_closing_tag(
                            range.start,
                            Some(&open.element.name),
                            name,
                        ));
                    }

                    let mut element = open.element;
                    element.span = Span::new(open.start, range.end);
                    push_child(&mut root, &mut stack, Node::Element(element));
                }
            }
        }

        if let Some(open) = stack.pop() {
            return Err(ParseError::unclosed_element(open.start, open.element.name));
        }

        debug!(top_level = root.len(), "Parsed markup fragment");
        Ok(Fragment::new(root))
    }
}

fn push_child(root: &mut Vec<Node>, stack: &mut [OpenElement], node: Node) {
    match stack.last_mut() {
        Some(open) => open.element.children.push(node),
        None => root.push(node),
    }
}

/// Split a lexed start tag into name, attributes and self-closing flag.
///
/// The lexer guarantees the overall shape, so this only walks
/// `name="value"` pairs; anything unexpected is still reported rather than
/// trusted.
pub(crate) fn parse_start_tag(raw: &str, offset: usize) -> ParseResult<(String, Vec<Attribute>, bool)> {
    let name = tag_name(raw).to_string();
    let self_closing = raw.trim_end_matches('>').trim_end().ends_with('/');

    // Skip "<name"
    let mut rest = &raw[1 + name.len()..];
    let mut attributes = Vec::new();

    loop {
        rest = rest.trim_start();
        if rest.is_empty() || rest.starts_with('>') || rest.starts_with('/') {
            break;
        }

        let eq = rest
            .find('=')
            .ok_or_else(|| ParseError::malformed_tag(offset, format!("attribute without value in {}", raw)))?;
        let attr_name = rest[..eq].trim().to_string();
        rest = rest[eq + 1..].trim_start();

        let quote = rest
            .chars()
            .next()
            .filter(|c| *c == '"' || *c == '\'')
            .ok_or_else(|| ParseError::malformed_tag(offset, format!("unquoted value for {}", attr_name)))?;
        let close = rest[1..]
            .find(quote)
            .ok_or_else(|| ParseError::malformed_tag(offset, format!("unterminated value for {}", attr_name)))?;

        let value = rest[1..1 + close].to_string();
        rest = &rest[close + 2..];

        if attributes.iter().any(|a: &Attribute| a.name == attr_name) {
            return Err(ParseError::malformed_tag(offset, format!("duplicate attribute {}", attr_name)));
        }
        attributes.push(Attribute::new(attr_name, value));
    }

    Ok((name, attributes, self_closing))
}

/// Parse markup source into a fragment
pub fn parse(source: &str) -> ParseResult<Fragment> {
    Parser::new(source).parse_fragment()
}
