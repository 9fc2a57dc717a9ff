use embassy_time::{Duration, Instant, Timer};

/// A recurring wake-up source for the communication task.
pub trait Alarm {
    /// Resolves once the alarm is due. Must keep resolving immediately until
    /// the expiry is consumed with [`Alarm::take_due`].
    async fn fired(&mut self);

    /// Consume a pending expiry, returning whether there was one.
    fn take_due(&mut self) -> bool;
}

/// Fixed-period alarm driven by `embassy-time`.
///
/// Expiries missed while the task was busy are coalesced into one, and the
/// schedule restarts from the moment it was noticed.
#[derive(Debug, Clone)]
pub struct Periodic {
    period: Duration,
    next: Instant,
}

impl Periodic {
    /// Arm the alarm, first expiring one `period` from now.
    pub fn arm(period: Duration) -> Self {
        Periodic {
            period,
            next: Instant::now() + period,
        }
    }
}

impl Alarm for Periodic {
    async fn fired(&mut self) {
        Timer::at(self.next).await
    }

    fn take_due(&mut self) -> bool {
        let now = Instant::now();
        if now < self.next {
            return false;
        }

        self.next += self.period;
        if self.next <= now {
            self.next = now + self.period;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_due_before_period() {
        let mut alarm = Periodic::arm(Duration::from_secs(60));
        assert!(!alarm.take_due());
    }

    #[test]
    fn due_once_per_expiry() {
        let mut alarm = Periodic::arm(Duration::from_millis(10));
        futures_executor::block_on(alarm.fired());

        assert!(alarm.take_due());
        assert!(!alarm.take_due());
    }
}
