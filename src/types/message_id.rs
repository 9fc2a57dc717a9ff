use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

/// Identifier carried by every frame, selecting schema and handler.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    TryFromPrimitive,
    IntoPrimitive,
    Serialize,
    Deserialize,
)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MessageId {
    /// Periodic unit status, sent by the unit only
    Status = 0,
    TimeReference = 1,
    Command = 2,
    ParamRequest = 3,
    ParamSet = 4,
    LogRequest = 5,
    /// Parameter value report, sent by the unit only
    ParamValue = 6,
}

impl MessageId {
    pub const ALL: [MessageId; 7] = [
        MessageId::Status,
        MessageId::TimeReference,
        MessageId::Command,
        MessageId::ParamRequest,
        MessageId::ParamSet,
        MessageId::LogRequest,
        MessageId::ParamValue,
    ];

    /// Look up a raw identifier, returning `None` for values outside
    /// the known set (corrupted frame or version skew).
    pub fn from_raw(raw: u8) -> Option<MessageId> {
        MessageId::try_from(raw).ok()
    }
}
