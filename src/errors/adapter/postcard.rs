use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Copyable summary of a [`postcard::Error`].
///
/// The codec distinguishes a payload that ended early from one that is
/// malformed, which is what the diagnostics care about. Everything else
/// collapses into [`PostcardError::Other`].
#[non_exhaustive]
#[derive(Error, Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PostcardError {
    #[error("The output buffer cannot hold the encoded message")]
    BufferFull,
    #[error("The payload ended before the message was complete")]
    UnexpectedEnd,
    #[error("The payload contains an invalid varint")]
    BadVarint,
    #[error("The payload contains an invalid option or bool discriminant")]
    BadDiscriminant,
    #[error("The payload contains an invalid enum variant")]
    BadEnum,
    #[error("The payload contains invalid text")]
    BadText,
    #[error("The payload was not well encoded")]
    BadEncoding,
    #[error("The payload continues past the end of the message")]
    TrailingBytes,
    #[error("Some other codec error occured")]
    Other,
}

impl From<postcard::Error> for PostcardError {
    fn from(value: postcard::Error) -> Self {
        use postcard::Error as E;
        match value {
            E::SerializeBufferFull => Self::BufferFull,
            E::DeserializeUnexpectedEnd => Self::UnexpectedEnd,
            E::DeserializeBadVarint => Self::BadVarint,
            E::DeserializeBadBool | E::DeserializeBadOption => Self::BadDiscriminant,
            E::DeserializeBadEnum => Self::BadEnum,
            E::DeserializeBadChar | E::DeserializeBadUtf8 => Self::BadText,
            E::DeserializeBadEncoding | E::DeserializeBadCrc => Self::BadEncoding,
            _ => Self::Other,
        }
    }
}
