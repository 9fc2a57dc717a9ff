use embassy_time::Instant;

/// Source of the unit's monotonic time.
pub trait Clock {
    /// Milliseconds since boot
    fn now_ms(&self) -> u64;
}

/// The `embassy-time` system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}
