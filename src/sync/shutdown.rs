use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicBool, Ordering};

/// Latched request for a long-running task to stop.
///
/// Unlike a plain wake-up, the request is remembered, so a task that only
/// starts waiting after [`Shutdown::request`] was called still observes it.
/// Only a single task may wait on one instance at a time.
pub struct Shutdown<M: RawMutex = CriticalSectionRawMutex> {
    requested: AtomicBool,
    signal: Signal<M, ()>,
}

impl<M: RawMutex> Default for Shutdown<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex> Shutdown<M> {
    pub const fn new() -> Self {
        Self {
            requested: AtomicBool::new(false),
            signal: Signal::new(),
        }
    }

    /// Ask the task to stop. Calling this more than once has no further effect.
    pub fn request(&self) {
        self.requested.store(true, Ordering::Release);
        self.signal.signal(());
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }

    /// Resolves once a stop has been requested.
    pub async fn wait(&self) {
        while !self.is_requested() {
            self.signal.wait().await;
        }
    }
}
