//! # Annotator markup parser
//!
//! Lexes and parses the inline markup stored in a transcription's text
//! field (`<w id="1" type="person">Caesar</w>` interspersed with editorial
//! elements such as `<lb/>`, `<gap/>`, `<del>`) into a [`Fragment`] tree,
//! and serializes trees back to text.

pub mod ast;
pub mod error;
pub mod id_generator;
pub mod parser;
pub mod serializer;
pub mod tokenizer;

pub use ast::{decode_entities, Attribute, Element, Fragment, Node, Span};
pub use error::{ParseError, ParseResult};
pub use id_generator::{max_tag_id, next_free_tag_id, ENTITY_TAG};
pub use parser::{parse, Parser};
pub use serializer::{is_self_closing, serialize, Serializer, SELF_CLOSING};
pub use tokenizer::{tokenize, Token};
