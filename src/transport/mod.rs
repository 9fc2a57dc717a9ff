//! The framed link to the host.
//!
//! Delimiting, escaping and checksumming frames on the wire is entirely the
//! transport's business. The communication task only sees whole frames made
//! of a raw message identifier and a payload.

use crate::errors::adapter::embedded_io::EmbeddedIoError;

pub mod channel;

/// A frame copied into the receive buffer by [`Transport::try_receive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Received {
    /// Raw identifier, which may be outside the known set
    pub id: u8,
    /// Number of payload bytes written to the front of the buffer
    pub len: usize,
}

pub trait Transport {
    /// Resolves when a frame may be available to [`Transport::try_receive`].
    ///
    /// Spurious wake-ups are fine, the caller always polls afterwards.
    async fn ready(&mut self);

    /// Copy the next complete frame into `buf` without blocking.
    ///
    /// Returns `None` when no frame is available. Implementations must never
    /// report a length larger than `buf`, and should drop frames that do not
    /// fit rather than truncate them.
    fn try_receive(&mut self, buf: &mut [u8]) -> Option<Received>;

    /// Send one frame tagged with `id`.
    async fn send(&mut self, id: u8, payload: &[u8]) -> Result<(), EmbeddedIoError>;
}
