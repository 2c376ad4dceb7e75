use serde::{Deserialize, Serialize};

use crate::token::TokenId;
use crate::zone::ZoneId;

/// Change notifications emitted by the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BoardEvent {
    /// A token was placed in a zone
    TokenAdded { token: TokenId, zone: ZoneId },

    /// A token left a zone (evicted, removed or displaced)
    TokenRemoved { token: TokenId, zone: ZoneId },

    /// A token was deleted from its pool and every zone
    TokenDeleted { token: TokenId },

    /// A zone was removed from the board
    ZoneRemoved { zone: ZoneId },
}

/// Callback registered for board events
pub type Subscriber = Box<dyn FnMut(&BoardEvent) + Send>;
