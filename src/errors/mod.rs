use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod adapter;
use adapter::{embedded_io::EmbeddedIoError, postcard::PostcardError};

use crate::types::message_id::MessageId;

/// Conditions the communication task raises while servicing an event.
///
/// None of these are fatal. The event that produced one is abandoned and
/// the next event is serviced as normal.
#[non_exhaustive]
#[derive(Error, Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommError {
    #[error("Malformed {id:?} payload: {err}")]
    Decode { id: MessageId, err: PostcardError },
    #[error("Could not encode {id:?} message: {err}")]
    Encode { id: MessageId, err: PostcardError },
    #[error("Transport failed to send {id:?} frame: {err}")]
    Send { id: MessageId, err: EmbeddedIoError },
    #[error("No receive handler for message id {id}")]
    Unhandled { id: u8 },
}

/// How loudly a [`CommError`] should be reported.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Severity {
    /// A message was lost in either direction.
    Alert,
    /// A frame arrived that this firmware does not accept.
    Unhandled,
}

impl CommError {
    pub const fn severity(&self) -> Severity {
        match self {
            CommError::Decode { .. } | CommError::Encode { .. } | CommError::Send { .. } => {
                Severity::Alert
            }
            CommError::Unhandled { .. } => Severity::Unhandled,
        }
    }

}
