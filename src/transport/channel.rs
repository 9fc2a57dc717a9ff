//! In-memory framed link, for running the unit against a simulated host.

use core::future::poll_fn;

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use embassy_sync::channel::{Channel, TrySendError};
use heapless::Vec;

use super::{Received, Transport};
use crate::consts::{LINK_QUEUE_LEN, SCRATCH_LEN};
use crate::errors::adapter::embedded_io::EmbeddedIoError;

/// A whole frame as queued on a [`Link`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    pub id: u8,
    pub payload: Vec<u8, SCRATCH_LEN>,
}

impl Frame {
    /// Returns `None` if the payload is longer than [`SCRATCH_LEN`].
    pub fn new(id: impl Into<u8>, payload: &[u8]) -> Option<Self> {
        Some(Frame {
            id: id.into(),
            payload: Vec::from_slice(payload).ok()?,
        })
    }
}

/// Two bounded queues, one per direction.
pub struct Link<M: RawMutex = CriticalSectionRawMutex, const Q: usize = LINK_QUEUE_LEN> {
    to_unit: Channel<M, Frame, Q>,
    to_host: Channel<M, Frame, Q>,
}

impl<M: RawMutex, const Q: usize> Default for Link<M, Q> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex, const Q: usize> Link<M, Q> {
    pub const fn new() -> Self {
        Link {
            to_unit: Channel::new(),
            to_host: Channel::new(),
        }
    }

    /// The end used by the communication task.
    pub const fn unit(&self) -> UnitPort<'_, M, Q> {
        UnitPort { link: self }
    }

    /// The end used by whatever plays the host.
    pub const fn host(&self) -> HostPort<'_, M, Q> {
        HostPort { link: self }
    }
}

pub struct UnitPort<'a, M: RawMutex = CriticalSectionRawMutex, const Q: usize = LINK_QUEUE_LEN> {
    link: &'a Link<M, Q>,
}

impl<M: RawMutex, const Q: usize> Transport for UnitPort<'_, M, Q> {
    async fn ready(&mut self) {
        poll_fn(|cx| self.link.to_unit.poll_ready_to_receive(cx)).await
    }

    fn try_receive(&mut self, buf: &mut [u8]) -> Option<Received> {
        loop {
            let frame = self.link.to_unit.try_receive().ok()?;
            let len = frame.payload.len();

            match buf.get_mut(..len) {
                Some(dst) => {
                    dst.copy_from_slice(&frame.payload);
                    return Some(Received { id: frame.id, len });
                }
                None => warn!(
                    "[link] Dropping {} byte frame, receive buffer holds {}",
                    len,
                    buf.len()
                ),
            }
        }
    }

    async fn send(&mut self, id: u8, payload: &[u8]) -> Result<(), EmbeddedIoError> {
        let frame = Frame::new(id, payload).ok_or(EmbeddedIoError::InvalidInput)?;
        self.link
            .to_host
            .try_send(frame)
            .map_err(|_| EmbeddedIoError::WriteZero)
    }
}

pub struct HostPort<'a, M: RawMutex = CriticalSectionRawMutex, const Q: usize = LINK_QUEUE_LEN> {
    link: &'a Link<M, Q>,
}

impl<M: RawMutex, const Q: usize> HostPort<'_, M, Q> {
    /// Queue a frame for the unit, waiting for room if necessary.
    pub async fn send(&self, frame: Frame) {
        self.link.to_unit.send(frame).await
    }

    pub fn try_send(&self, frame: Frame) -> Result<(), Frame> {
        self.link.to_unit.try_send(frame).map_err(|err| match err {
            TrySendError::Full(frame) => frame,
        })
    }

    /// Wait for the next frame sent by the unit.
    pub async fn receive(&self) -> Frame {
        self.link.to_host.receive().await
    }

    pub fn try_receive(&self) -> Option<Frame> {
        self.link.to_host.try_receive().ok()
    }
}

#[cfg(test)]
mod tests {
    use embassy_futures::select::{select, Either};

    use super::*;
    use crate::MessageId;

    #[test]
    fn empty_link_has_no_frame() {
        let link: Link = Link::new();
        let mut buf = [0u8; SCRATCH_LEN];
        assert_eq!(link.unit().try_receive(&mut buf), None);
        assert_eq!(link.host().try_receive(), None);
    }

    #[test]
    fn frame_is_copied_to_front_of_buffer() {
        let link: Link = Link::new();
        let frame = Frame::new(MessageId::Command, &[1, 2, 3]).unwrap();
        link.host().try_send(frame).unwrap();

        let mut buf = [0xAAu8; 8];
        let received = link.unit().try_receive(&mut buf).unwrap();
        assert_eq!(received, Received { id: 2, len: 3 });
        assert_eq!(&buf[..3], &[1, 2, 3]);
    }

    #[test]
    fn frame_larger_than_buffer_is_dropped() {
        let link: Link = Link::new();
        link.host().try_send(Frame::new(9u8, &[0; 16]).unwrap()).unwrap();
        link.host().try_send(Frame::new(3u8, &[7]).unwrap()).unwrap();

        let mut buf = [0u8; 8];
        let received = link.unit().try_receive(&mut buf).unwrap();
        assert_eq!(received, Received { id: 3, len: 1 });
    }

    #[futures_test::test]
    async fn full_outbound_queue_rejects_frame() {
        let link: Link<CriticalSectionRawMutex, 1> = Link::new();
        let mut unit = link.unit();

        assert_eq!(unit.send(0, &[1]).await, Ok(()));
        assert_eq!(unit.send(0, &[2]).await, Err(EmbeddedIoError::WriteZero));

        let frame = link.host().try_receive().unwrap();
        assert_eq!(frame.payload.as_slice(), &[1]);
    }

    #[futures_test::test]
    async fn oversize_payload_is_invalid() {
        let link: Link = Link::new();
        let payload = [0u8; SCRATCH_LEN + 1];
        assert_eq!(
            link.unit().send(0, &payload).await,
            Err(EmbeddedIoError::InvalidInput)
        );
    }

    #[futures_test::test]
    async fn ready_waits_for_inbound_frame() {
        let link: Link = Link::new();
        let mut unit = link.unit();

        let res = select(unit.ready(), embassy_futures::yield_now()).await;
        assert!(matches!(res, Either::Second(())));

        link.host().send(Frame::new(1u8, &[]).unwrap()).await;
        unit.ready().await;
    }
}
