use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_UNIT_ID;

/// Four byte tag identifying this engine control unit on the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnitId(pub [u8; 4]);

impl UnitId {
    pub const fn new(tag: [u8; 4]) -> Self {
        UnitId(tag)
    }
}

impl Default for UnitId {
    fn default() -> Self {
        UnitId(DEFAULT_UNIT_ID)
    }
}

/// Heartbeat broadcast by the unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    pub unit_id: UnitId,
    /// Time since boot [ms]
    pub timestamp_ms: u64,
}

/// Time synchronisation exchange.
///
/// The host sends its own clock in `timestamp_ms` and the unit answers with
/// the same message, filling in its clock and the estimated difference.
/// The optional fields are encoded with an explicit presence tag, so an
/// absent field is distinguishable from a zero one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeReference {
    pub unit_id: UnitId,
    /// Host clock when the request was sent [ms]
    pub timestamp_ms: u64,
    /// Unit clock when the reply was produced [ms]
    pub system_time: Option<u64>,
    /// Estimated host minus unit clock [ms]
    pub timediff: Option<i64>,
}

impl TimeReference {
    /// A bare request as sent by the host, with no response fields set.
    pub const fn request(unit_id: UnitId, timestamp_ms: u64) -> Self {
        TimeReference {
            unit_id,
            timestamp_ms,
            system_time: None,
            timediff: None,
        }
    }
}
