/// Capacity of the scratch buffer used for both decoding and encoding [bytes]
pub const SCRATCH_LEN: usize = 256;

/// Default period of the status heartbeat [ms]
pub const DEFAULT_HEARTBEAT_MS: u32 = 10_000;

/// Smallest accepted heartbeat period [ms]
pub const MIN_HEARTBEAT_MS: u32 = 10;

/// Unit identifier reported in outgoing messages unless configured otherwise
pub const DEFAULT_UNIT_ID: [u8; 4] = *b"eng2";

/// Number of frames each direction of an in-memory link can queue
pub const LINK_QUEUE_LEN: usize = 4;
