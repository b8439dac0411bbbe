use std::time::{Duration, Instant};

/// A poll-driven debounce deadline. The host loop calls `poke` on every
/// triggering event and `fire` each tick; the deadline keeps sliding
/// forward until the events go quiet for `delay`.
///
/// Timers here are plain deadlines, not threads. The whole editor is
/// single-threaded and the host decides when to poll.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Debouncer {
            delay,
            deadline: None,
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Debouncer::new(Duration::from_millis(ms))
    }

    /// Reset the deadline to `now + delay`
    pub fn poke(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True when the quiet interval has elapsed; clears the deadline so the
    /// debounced action runs once per burst of events.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_after_quiet_interval() {
        let mut debounce = Debouncer::from_millis(100);
        let start = Instant::now();
        debounce.poke(start);
        assert!(!debounce.fire(start));
        assert!(!debounce.fire(start + Duration::from_millis(99)));
        assert!(debounce.fire(start + Duration::from_millis(100)));
        // One-shot per burst
        assert!(!debounce.fire(start + Duration::from_millis(200)));
    }

    #[test]
    fn poke_slides_the_deadline() {
        let mut debounce = Debouncer::from_millis(100);
        let start = Instant::now();
        debounce.poke(start);
        debounce.poke(start + Duration::from_millis(80));
        assert!(!debounce.fire(start + Duration::from_millis(150)));
        assert!(debounce.fire(start + Duration::from_millis(180)));
    }

    #[test]
    fn cancel_drops_pending_deadline() {
        let mut debounce = Debouncer::from_millis(50);
        let start = Instant::now();
        debounce.poke(start);
        debounce.cancel();
        assert!(!debounce.fire(start + Duration::from_millis(60)));
        assert!(!debounce.pending());
    }
}
