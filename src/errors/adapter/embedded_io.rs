use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Transport failure kinds, mirroring the subset of
/// [`embedded_io::ErrorKind`] a serial link can actually produce.
#[non_exhaustive]
#[derive(Error, Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EmbeddedIoError {
    #[error("Unspecified error kind.")]
    Other,
    #[error("The link is not connected.")]
    NotConnected,
    #[error("The link was closed by the other end.")]
    BrokenPipe,
    #[error("The frame was rejected by the transport.")]
    InvalidInput,
    #[error("Data not valid for the operation were encountered.")]
    InvalidData,
    #[error("The operation timed out.")]
    TimedOut,
    #[error("The operation was interrupted.")]
    Interrupted,
    #[error("The transport has no room for the frame.")]
    WriteZero,
    #[error("The operation is not supported by the transport.")]
    Unsupported,
}

impl From<embedded_io::ErrorKind> for EmbeddedIoError {
    fn from(value: embedded_io::ErrorKind) -> Self {
        use embedded_io::ErrorKind as E;
        match value {
            E::NotConnected => Self::NotConnected,
            E::BrokenPipe | E::ConnectionReset | E::ConnectionAborted => Self::BrokenPipe,
            E::InvalidInput => Self::InvalidInput,
            E::InvalidData => Self::InvalidData,
            E::TimedOut => Self::TimedOut,
            E::Interrupted => Self::Interrupted,
            E::WriteZero | E::OutOfMemory => Self::WriteZero,
            E::Unsupported => Self::Unsupported,
            _ => Self::Other,
        }
    }
}

impl embedded_io::Error for EmbeddedIoError {
    fn kind(&self) -> embedded_io::ErrorKind {
        use embedded_io::ErrorKind as E;
        match self {
            Self::Other => E::Other,
            Self::NotConnected => E::NotConnected,
            Self::BrokenPipe => E::BrokenPipe,
            Self::InvalidInput => E::InvalidInput,
            Self::InvalidData => E::InvalidData,
            Self::TimedOut => E::TimedOut,
            Self::Interrupted => E::Interrupted,
            Self::WriteZero => E::WriteZero,
            Self::Unsupported => E::Unsupported,
        }
    }
}
