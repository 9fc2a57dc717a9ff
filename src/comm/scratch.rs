//! The single buffer shared by the decode and encode phases of an event.
//!
//! Exclusive access is structural: the buffer lives in the task and is lent
//! out by `&mut` for one event at a time. A [`Request`] is a view of a
//! received payload, and turning it into a reply consumes it, so nothing
//! decoded with a borrow into the payload can outlive the encode.

use serde::{Deserialize, Serialize};

use crate::consts::SCRATCH_LEN;
use crate::errors::adapter::postcard::PostcardError;
use crate::errors::CommError;
use crate::types::message_id::MessageId;

pub struct Scratch<const N: usize = SCRATCH_LEN> {
    buf: [u8; N],
}

impl<const N: usize> Default for Scratch<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Scratch<N> {
    pub const fn new() -> Self {
        Scratch { buf: [0; N] }
    }

    /// Clear the buffer and hand it out whole, e.g. to receive into.
    pub fn fresh(&mut self) -> &mut [u8] {
        self.buf.fill(0);
        &mut self.buf
    }

    /// A view of the first `len` bytes as a received `id` payload.
    pub fn request(&mut self, id: MessageId, len: usize) -> Request<'_> {
        Request::new(id, &mut self.buf, len)
    }

    /// Encode an unsolicited message, e.g. a status broadcast.
    pub fn encode<M>(&mut self, id: MessageId, message: &M) -> Result<Outgoing<'_>, CommError>
    where
        M: Serialize + ?Sized,
    {
        encode(&mut self.buf, id, message)
    }
}

/// A received payload, bounded to the length reported by the transport.
pub struct Request<'s> {
    id: MessageId,
    buf: &'s mut [u8],
    len: usize,
}

impl<'s> Request<'s> {
    fn new(id: MessageId, buf: &'s mut [u8], len: usize) -> Self {
        if len > buf.len() {
            warn!(
                "[comm] {:?} frame claims {} bytes, buffer holds {}",
                id,
                len,
                buf.len()
            );
        }
        let len = len.min(buf.len());
        Request { id, buf, len }
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn payload(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Decode the payload as `T`. The message must span the whole payload,
    /// leftover bytes mean the frame is corrupt.
    pub fn decode<'de, T: Deserialize<'de>>(&'de self) -> Result<T, CommError> {
        let (message, rest) =
            postcard::take_from_bytes(self.payload()).map_err(|err| CommError::Decode {
                id: self.id,
                err: err.into(),
            })?;

        if !rest.is_empty() {
            return Err(CommError::Decode {
                id: self.id,
                err: PostcardError::TrailingBytes,
            });
        }

        Ok(message)
    }

    /// Encode a reply of the same kind as the request into the buffer.
    pub fn reply<M>(self, message: &M) -> Result<Outgoing<'s>, CommError>
    where
        M: Serialize + ?Sized,
    {
        let id = self.id;
        self.reply_as(id, message)
    }

    /// Encode a reply of another kind, e.g. a parameter value answering a
    /// parameter request.
    pub fn reply_as<M>(self, id: MessageId, message: &M) -> Result<Outgoing<'s>, CommError>
    where
        M: Serialize + ?Sized,
    {
        encode(self.buf, id, message)
    }
}

/// An encoded message ready to be handed to the transport.
#[derive(Debug, PartialEq, Eq)]
pub struct Outgoing<'s> {
    id: MessageId,
    payload: &'s [u8],
}

impl Outgoing<'_> {
    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn payload(&self) -> &[u8] {
        self.payload
    }
}

fn encode<'s, M>(buf: &'s mut [u8], id: MessageId, message: &M) -> Result<Outgoing<'s>, CommError>
where
    M: Serialize + ?Sized,
{
    // Whatever the previous message left behind must not leak into this one
    buf.fill(0);

    match postcard::to_slice(message, buf) {
        Ok(payload) => Ok(Outgoing { id, payload }),
        Err(err) => Err(CommError::Encode {
            id,
            err: err.into(),
        }),
    }
}
