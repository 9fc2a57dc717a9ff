use crate::comm::clock::Clock;
use crate::comm::scratch::{Outgoing, Scratch};
use crate::errors::CommError;
use crate::types::message_id::MessageId;
use crate::types::messages::{Status, UnitId};

/// Encode the heartbeat status, stamped with the current unit time.
pub fn broadcast<'s, const N: usize>(
    scratch: &'s mut Scratch<N>,
    unit_id: UnitId,
    clock: &impl Clock,
) -> Result<Outgoing<'s>, CommError> {
    let status = Status {
        unit_id,
        timestamp_ms: clock.now_ms(),
    };

    scratch.encode(MessageId::Status, &status)
}
