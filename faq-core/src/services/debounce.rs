use std::time::{Duration, Instant};

/// Coalesces bursts of values: only the latest survives, and it is released
/// once no new value has arrived for `quiet`.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Debouncer {
            quiet,
            pending: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Replaces any pending value and restarts the quiet period.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let ready = match &self.pending {
            Some((_, at)) => now.saturating_duration_since(*at) >= self.quiet,
            None => false,
        };

        if ready {
            self.pending.take().map(|(v, _)| v)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIET: Duration = Duration::from_millis(200);

    #[test]
    fn releases_after_quiet_period() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(QUIET);
        d.push("m", t0);

        assert_eq!(d.poll(t0 + Duration::from_millis(100)), None);
        assert!(d.is_pending());
        assert_eq!(d.poll(t0 + QUIET), Some("m"));
        assert!(!d.is_pending());
        assert_eq!(d.poll(t0 + Duration::from_secs(5)), None);
    }

    #[test]
    fn rapid_pushes_coalesce_to_latest() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(QUIET);
        d.push("m", t0);
        d.push("mo", t0 + Duration::from_millis(50));
        d.push("mot", t0 + Duration::from_millis(150));

        // 200ms after the first push but only 50ms after the last one
        assert_eq!(d.poll(t0 + Duration::from_millis(200)), None);
        assert_eq!(d.poll(t0 + Duration::from_millis(350)), Some("mot"));
    }

    #[test]
    fn cancel_drops_pending_value() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(QUIET);
        d.push(1, t0);
        d.cancel();
        assert_eq!(d.poll(t0 + QUIET), None);
    }
}
