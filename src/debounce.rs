use std::time::{Duration, Instant};

/// Collapses a burst of resize events into a single rebuild trigger.
///
/// One persistent deadline is owned here: every `arm` replaces any pending
/// deadline, so only the last event of a burst fires once the quiet period
/// has fully elapsed.
#[derive(Debug)]
pub struct ResizeDebouncer {
    quiet: Duration,
    deadline: Option<Instant>,
}

impl ResizeDebouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            deadline: None,
        }
    }

    /// Arms (or re-arms) the deadline at `now + quiet period`.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet);
    }

    /// Returns true exactly once when the armed deadline has passed.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Next point in time worth polling at, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIET: Duration = Duration::from_millis(1000);

    #[test]
    fn does_not_fire_before_the_quiet_period() {
        let start = Instant::now();
        let mut debouncer = ResizeDebouncer::new(QUIET);
        debouncer.arm(start);
        assert!(!debouncer.fire(start + Duration::from_millis(999)));
        assert!(debouncer.is_armed());
    }

    #[test]
    fn fires_once_after_the_quiet_period() {
        let start = Instant::now();
        let mut debouncer = ResizeDebouncer::new(QUIET);
        debouncer.arm(start);
        assert!(debouncer.fire(start + QUIET));
        assert!(!debouncer.fire(start + QUIET));
        assert!(!debouncer.is_armed());
    }

    #[test]
    fn a_burst_of_events_fires_at_most_once() {
        let start = Instant::now();
        let mut debouncer = ResizeDebouncer::new(QUIET);
        let mut fired = 0;
        for i in 0..20 {
            debouncer.arm(start + Duration::from_millis(i * 50));
            if debouncer.fire(start + Duration::from_millis(i * 50 + 1)) {
                fired += 1;
            }
        }
        assert_eq!(fired, 0);
        // Quiet period measured from the last event of the burst.
        let last = start + Duration::from_millis(19 * 50);
        assert!(!debouncer.fire(last + QUIET - Duration::from_millis(1)));
        assert!(debouncer.fire(last + QUIET));
        assert_eq!(debouncer.deadline(), None);
    }

    #[test]
    fn unarmed_debouncer_never_fires() {
        let mut debouncer = ResizeDebouncer::new(QUIET);
        assert!(!debouncer.fire(Instant::now() + Duration::from_secs(60)));
    }
}
