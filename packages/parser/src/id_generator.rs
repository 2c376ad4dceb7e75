use crate::parser::parse_start_tag;
use crate::tokenizer::{tokenize, Token};

/// Element name of an entity tag
pub const ENTITY_TAG: &str = "w";

/// Next free id for a new `<w>` tag: one more than the highest numeric `id`
/// attribute on any `<w>` start tag, or 1 when there is none.
///
/// Works on the raw token stream rather than a parsed tree so a document
/// that currently fails to parse still yields a usable id.
pub fn next_free_tag_id(text: &str) -> u64 {
    max_tag_id(text).map_or(1, |max| max + 1)
}

/// Highest numeric `id` among `<w>` start tags, if any
pub fn max_tag_id(text: &str) -> Option<u64> {
    tokenize(text)
        .into_iter()
        .filter_map(|(token, range)| match token {
            Ok(Token::StartTag(raw)) => Some((raw, range.start)),
            _ => None,
        })
        .filter_map(|(raw, offset)| parse_start_tag(raw, offset).ok())
        .filter(|(name, _, _)| name == ENTITY_TAG)
        .filter_map(|(_, attributes, _)| {
            attributes
                .into_iter()
                .find(|a| a.name == "id")
                .and_then(|a| a.value.parse::<u64>().ok())
        })
        .max()
}
