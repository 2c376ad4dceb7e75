use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected closing tag </{found}> at {pos}: expected {}", describe_expected(.expected))]
    UnexpectedClosingTag {
        pos: usize,
        expected: Option<String>,
        found: String,
    },

    #[error("Element <{name}> opened at {pos} is never closed")]
    UnclosedElement { pos: usize, name: String },

    #[error("Malformed tag at {pos}: {message}")]
    MalformedTag { pos: usize, message: String },

    #[error("Lexer error at {pos}")]
    LexerError { pos: usize },
}

fn describe_expected(expected: &Option<String>) -> String {
    match expected {
        Some(name) => format!("</{}>", name),
        None => "no closing tag".to_string(),
    }
}

impl ParseError {
    pub fn unexpected_closing_tag(pos: usize, expected: Option<&str>, found: impl Into<String>) -> Self {
        Self::UnexpectedClosingTag {
            pos,
            expected: expected.map(str::to_string),
            found: found.into(),
        }
    }

    pub fn unclosed_element(pos: usize, name: impl Into<String>) -> Self {
        Self::UnclosedElement {
            pos,
            name: name.into(),
        }
    }

    pub fn malformed_tag(pos: usize, message: impl Into<String>) -> Self {
        Self::MalformedTag {
            pos,
            message: message.into(),
        }
    }

    pub fn lexer_error(pos: usize) -> Self {
        Self::LexerError { pos }
    }

    /// Byte offset in the source where the error was detected
    pub fn pos(&self) -> usize {
        match self {
            Self::UnexpectedClosingTag { pos, .. }
            | Self::UnclosedElement { pos, .. }
            | Self::MalformedTag { pos, .. }
            | Self::LexerError { pos } => *pos,
        }
    }

    /// Render the error as a labelled source report
    #[cfg(feature = "pretty-errors")]
    pub fn report(&self, source_name: &str, source: &str) -> String {
        use ariadne::{Label, Report, ReportKind, Source};

        let pos = self.pos().min(source.len());
        let end = (pos + 1).min(source.len()).max(pos);
        let mut out = Vec::new();

        let written = Report::build(ReportKind::Error, source_name, pos)
            .with_message(self.to_string())
            .with_label(Label::new((source_name, pos..end)).with_message("here"))
            .finish()
            .write((source_name, Source::from(source)), &mut out);

        match written {
            Ok(()) => String::from_utf8_lossy(&out).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}
