//! Trailing-edge debounce on tokio time

use tokio::time::{Duration, Instant};

/// Delay between the last slider change and its navigation
pub const SLIDER_DEBOUNCE: Duration = Duration::from_millis(300);

/// Fires once, `delay` after the most recent `touch`.
#[derive(Debug, Clone)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Restart the quiet period from `now`.
    pub fn touch(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Consume the pending deadline if it has passed.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for Debounce {
    fn default() -> Self {
        Self::new(SLIDER_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_after_quiet_period() {
        let start = Instant::now();
        let mut debounce = Debounce::default();
        debounce.touch(start);

        assert!(!debounce.fire(start + Duration::from_millis(299)));
        assert!(debounce.fire(start + Duration::from_millis(300)));
        assert!(!debounce.is_pending());
    }

    #[test]
    fn touch_restarts_timer() {
        let start = Instant::now();
        let mut debounce = Debounce::default();
        debounce.touch(start);
        debounce.touch(start + Duration::from_millis(200));

        assert!(!debounce.fire(start + Duration::from_millis(350)));
        assert!(debounce.fire(start + Duration::from_millis(500)));
    }

    #[test]
    fn cancel_drops_pending() {
        let start = Instant::now();
        let mut debounce = Debounce::default();
        debounce.touch(start);
        debounce.cancel();

        assert!(!debounce.fire(start + Duration::from_secs(1)));
    }
}
