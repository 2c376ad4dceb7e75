use logos::Logos;
use std::fmt;
use std::ops::Range;

/// Token types for inline transcription markup.
///
/// Start tags are lexed whole (name and attributes) and split later by the
/// parser, so text between tags never has to be re-lexed in another mode.
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token<'src> {
    #[regex(
        r#"<[A-Za-z_][A-Za-z0-9_.:\-]*([ \t\r\n]+[A-Za-z_][A-Za-z0-9_.:\-]*[ \t\r\n]*=[ \t\r\n]*("[^"]*"|'[^']*'))*[ \t\r\n]*/?>"#,
        |lex| lex.slice()
    )]
    StartTag(&'src str),

    #[regex(r"</[A-Za-z_][A-Za-z0-9_.:\-]*[ \t\r\n]*>", |lex| lex.slice())]
    EndTag(&'src str),

    #[regex(r"<!--([^-]|-[^-])*-->", |lex| lex.slice())]
    Comment(&'src str),

    #[regex(r"[^<]+", |lex| lex.slice())]
    Text(&'src str),
}

impl<'src> fmt::Display for Token<'src> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::StartTag(s) | Token::EndTag(s) | Token::Comment(s) | Token::Text(s) => {
                write!(f, "{}", s)
            }
        }
    }
}

/// A lexed item: either a token or the range the lexer could not match.
pub type Lexed<'src> = (Result<Token<'src>, ()>, Range<usize>);

/// Tokenize markup source. Unmatched input (a stray `<`, a start tag with
/// an unterminated attribute value) is reported as `Err(())` with its range
/// so callers can decide whether to fail or skip.
pub fn tokenize(source: &str) -> Vec<Lexed<'_>> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(token) = lexer.next() {
        tokens.push((token, lexer.span()));
    }

    tokens
}

/// Name of a start or end tag slice (`<w id="1">` → `w`, `</w>` → `w`).
pub fn tag_name(raw: &str) -> &str {
    let trimmed = raw
        .trim_start_matches('<')
        .trim_start_matches('/');
    let end = trimmed
        .find(|c: char| c.is_ascii_whitespace() || c == '>' || c == '/')
        .unwrap_or(trimmed.len());
    &trimmed[..end]
}
