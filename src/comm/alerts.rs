use serde::{Deserialize, Serialize};

use crate::errors::CommError;

/// Where the communication task reports the conditions it recovers from.
///
/// Implementations must return quickly, they run inside the event loop.
pub trait AlertSink {
    fn raise(&mut self, error: &CommError);
}

/// Counts every raised condition by kind.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommStats {
    pub decode_failures: u32,
    pub encode_failures: u32,
    pub send_failures: u32,
    pub unhandled: u32,
}

impl CommStats {
    pub const fn new() -> Self {
        CommStats {
            decode_failures: 0,
            encode_failures: 0,
            send_failures: 0,
            unhandled: 0,
        }
    }

    /// Number of conditions with [`Severity::Alert`](crate::errors::Severity::Alert).
    pub const fn alerts(&self) -> u32 {
        self.decode_failures
            .saturating_add(self.encode_failures)
            .saturating_add(self.send_failures)
    }
}

impl AlertSink for CommStats {
    fn raise(&mut self, error: &CommError) {
        let counter = match error {
            CommError::Decode { .. } => &mut self.decode_failures,
            CommError::Encode { .. } => &mut self.encode_failures,
            CommError::Send { .. } => &mut self.send_failures,
            CommError::Unhandled { .. } => &mut self.unhandled,
        };
        *counter = counter.saturating_add(1);
    }
}
