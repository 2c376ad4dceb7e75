use thiserror::Error;

use crate::token::TokenId;
use crate::zone::ZoneId;

pub type ReconcileResult<T> = Result<T, ReconcileError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("Unknown token type: {0}!")]
    UnknownTokenKind(String),

    #[error("Token {0} does not exist")]
    UnknownToken(TokenId),

    #[error("Token {0} already exists in its pool")]
    DuplicateToken(TokenId),

    #[error("Drop zone {0} does not exist")]
    UnknownZone(ZoneId),
}
