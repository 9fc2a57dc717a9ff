use crate::comm::clock::Clock;
use crate::comm::scratch::{Outgoing, Request};
use crate::errors::CommError;
use crate::types::messages::{TimeReference, UnitId};

/// Strategy estimating how far the host clock is ahead of the unit clock.
pub trait TimeSync {
    /// Feed one exchange and get the current estimate of
    /// `peer_ms - local_ms` in milliseconds.
    fn offset_ms(&mut self, peer_ms: u64, local_ms: u64) -> i64;
}

/// Uses the offset of the latest exchange as is.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectOffset;

impl TimeSync for DirectOffset {
    fn offset_ms(&mut self, peer_ms: u64, local_ms: u64) -> i64 {
        raw_offset(peer_ms, local_ms)
    }
}

/// Exponential moving average of the offset, weighting each new exchange
/// by `1 / 2^shift`. Damps the jitter of a link with variable latency.
///
/// The average is kept scaled by `2^shift`, so a steady offset is reached
/// exactly from either side.
#[derive(Debug, Clone, Copy)]
pub struct SmoothedOffset {
    scaled: Option<i128>,
    shift: u8,
}

impl SmoothedOffset {
    const MAX_SHIFT: u8 = 16;

    pub const fn new(shift: u8) -> Self {
        let shift = if shift > Self::MAX_SHIFT {
            Self::MAX_SHIFT
        } else {
            shift
        };
        SmoothedOffset {
            scaled: None,
            shift,
        }
    }

    /// The current estimate, if any exchange has happened yet.
    pub fn estimate(&self) -> Option<i64> {
        self.scaled.map(|scaled| saturate(scaled >> self.shift))
    }
}

impl Default for SmoothedOffset {
    fn default() -> Self {
        Self::new(3)
    }
}

impl TimeSync for SmoothedOffset {
    fn offset_ms(&mut self, peer_ms: u64, local_ms: u64) -> i64 {
        let sample = raw_offset(peer_ms, local_ms) as i128;
        let scaled = match self.scaled {
            None => sample << self.shift,
            Some(prev) => prev - (prev >> self.shift) + sample,
        };
        self.scaled = Some(scaled);
        saturate(scaled >> self.shift)
    }
}

fn raw_offset(peer_ms: u64, local_ms: u64) -> i64 {
    saturate(peer_ms as i128 - local_ms as i128)
}

fn saturate(value: i128) -> i64 {
    value.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

/// Answer a time reference request in place.
///
/// The reply carries the request's host timestamp back, together with the
/// unit time and the offset estimate, both always present.
pub fn respond<'s>(
    request: Request<'s>,
    unit_id: UnitId,
    clock: &impl Clock,
    sync: &mut impl TimeSync,
) -> Result<Outgoing<'s>, CommError> {
    let received: TimeReference = request.decode()?;

    let system_time = clock.now_ms();
    let timediff = sync.offset_ms(received.timestamp_ms, system_time);
    trace!(
        "[comm] Time reference from host at {} ms, offset {} ms",
        received.timestamp_ms,
        timediff
    );

    let reply = TimeReference {
        unit_id,
        timestamp_ms: received.timestamp_ms,
        system_time: Some(system_time),
        timediff: Some(timediff),
    };

    request.reply(&reply)
}
