use embassy_time::Duration;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_HEARTBEAT_MS, DEFAULT_UNIT_ID, MIN_HEARTBEAT_MS};
use crate::types::messages::UnitId;

/// Settings of the communication task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommConfig {
    /// Tag stamped into every outgoing status and time reference
    pub unit_id: UnitId,
    /// Period of the status heartbeat [ms]
    pub heartbeat_ms: u32,
}

crate::const_default!(CommConfig => {
    unit_id: UnitId::new(DEFAULT_UNIT_ID),
    heartbeat_ms: DEFAULT_HEARTBEAT_MS,
});

impl CommConfig {
    /// The heartbeat period, never shorter than [`MIN_HEARTBEAT_MS`].
    pub const fn heartbeat_period(&self) -> Duration {
        let ms = if self.heartbeat_ms < MIN_HEARTBEAT_MS {
            MIN_HEARTBEAT_MS
        } else {
            self.heartbeat_ms
        };
        Duration::from_millis(ms as u64)
    }

    /// Decode a configuration blob persisted with postcard, falling back to
    /// the defaults if there is none or it cannot be decoded.
    pub fn load_or_default(stored: Option<&[u8]>) -> Self {
        let Some(bytes) = stored else {
            trace!("[config] No stored comm config, using default");
            return Self::default();
        };

        match postcard::from_bytes::<CommConfig>(bytes) {
            Ok(config) => {
                trace!("[config] Loaded stored comm config");
                config
            }
            Err(_) => {
                warn!("[config] Stored comm config is invalid, using default");
                Self::default()
            }
        }
    }
}
