//! Debouncing of viewport resizes
//!
//! Re-rasterizing the page is expensive, so a burst of resize events is
//! collapsed into one: every resize restarts the delay and only the last
//! size is applied once the delay passes without another resize.
//!
//! The debouncer does not own a timer. The caller passes the current
//! [`Instant`] in and polls, which keeps it deterministic under test.

use std::time::{Duration, Instant};

use crate::layout::Size;

/// Collapses bursts of viewport resizes into a single re-render
#[derive(Debug, Clone)]
pub struct ResizeDebouncer {
    delay: Duration,
    pending: Option<(Size, Instant)>,
}

impl ResizeDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Record a resize, restarting the delay
    pub fn push(&mut self, size: Size, now: Instant) {
        self.pending = Some((size, now + self.delay));
    }

    /// The size to render if the delay has elapsed since the last resize
    pub fn poll(&mut self, now: Instant) -> Option<Size> {
        match self.pending {
            Some((size, deadline)) if now >= deadline => {
                self.pending = None;
                Some(size)
            }
            _ => None,
        }
    }

    /// Take the pending size regardless of the deadline
    pub fn flush(&mut self) -> Option<Size> {
        self.pending.take().map(|(size, _)| size)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending resize becomes due
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|(_, deadline)| deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(150);

    #[test]
    fn test_single_resize_fires_after_delay() {
        let start = Instant::now();
        let mut debouncer = ResizeDebouncer::new(DELAY);
        debouncer.push(Size::new(800.0, 600.0), start);

        assert_eq!(debouncer.poll(start + Duration::from_millis(100)), None);
        assert_eq!(
            debouncer.poll(start + Duration::from_millis(150)),
            Some(Size::new(800.0, 600.0))
        );
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_burst_collapses_to_last_size() {
        let start = Instant::now();
        let mut debouncer = ResizeDebouncer::new(DELAY);
        for step in 0..10u64 {
            let size = Size::new(800.0 + step as f64, 600.0);
            debouncer.push(size, start + Duration::from_millis(step * 50));
            assert_eq!(debouncer.poll(start + Duration::from_millis(step * 50 + 10)), None);
        }

        let last = start + Duration::from_millis(9 * 50);
        assert_eq!(debouncer.poll(last + DELAY), Some(Size::new(809.0, 600.0)));
        assert_eq!(debouncer.poll(last + DELAY * 2), None);
    }

    #[test]
    fn test_flush_ignores_deadline() {
        let start = Instant::now();
        let mut debouncer = ResizeDebouncer::new(DELAY);
        debouncer.push(Size::new(1.0, 2.0), start);
        assert_eq!(debouncer.deadline(), Some(start + DELAY));
        assert_eq!(debouncer.flush(), Some(Size::new(1.0, 2.0)));
        assert_eq!(debouncer.flush(), None);
    }
}
