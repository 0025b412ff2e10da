use std::time::Duration;

/// Recognizes two taps in quick succession.
///
/// Timestamps are supplied by the caller (time since session start) so the
/// detector stays deterministic.
#[derive(Debug, Clone)]
pub struct DoubleTapDetector {
    window: Duration,
    last_tap: Option<Duration>,
}

impl DoubleTapDetector {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_tap: None,
        }
    }

    /// Register a tap. Returns `true` when it completes a double tap.
    ///
    /// A completed double tap clears the history, so a third quick tap starts
    /// a new pair instead of confirming again.
    pub fn on_tap(&mut self, at: Duration) -> bool {
        let within_window = self
            .last_tap
            .and_then(|last| at.checked_sub(last))
            .is_some_and(|gap| gap < self.window);

        if within_window {
            self.last_tap = None;
            true
        } else {
            self.last_tap = Some(at);
            false
        }
    }

    pub fn reset(&mut self) {
        self.last_tap = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn two_quick_taps_confirm_once() {
        let mut taps = DoubleTapDetector::new(ms(300));
        assert!(!taps.on_tap(ms(1000)));
        assert!(taps.on_tap(ms(1200)));
    }

    #[test]
    fn slow_taps_never_combine() {
        let mut taps = DoubleTapDetector::new(ms(300));
        assert!(!taps.on_tap(ms(0)));
        assert!(!taps.on_tap(ms(300)));
        assert!(!taps.on_tap(ms(700)));
        assert!(!taps.on_tap(ms(1500)));
    }

    #[test]
    fn third_quick_tap_starts_new_pair() {
        let mut taps = DoubleTapDetector::new(ms(300));
        let confirmations = [0, 100, 200, 300]
            .into_iter()
            .filter(|&t| taps.on_tap(ms(t)))
            .count();
        assert_eq!(confirmations, 2);

        let mut taps = DoubleTapDetector::new(ms(300));
        let confirmations = [0, 100, 200]
            .into_iter()
            .filter(|&t| taps.on_tap(ms(t)))
            .count();
        assert_eq!(confirmations, 1);
    }

    #[test]
    fn slow_tap_then_quick_pair() {
        let mut taps = DoubleTapDetector::new(ms(300));
        assert!(!taps.on_tap(ms(0)));
        assert!(!taps.on_tap(ms(500)));
        assert!(taps.on_tap(ms(650)));
    }

    #[test]
    fn clock_going_backwards_is_a_fresh_tap() {
        let mut taps = DoubleTapDetector::new(ms(300));
        assert!(!taps.on_tap(ms(1000)));
        assert!(!taps.on_tap(ms(900)));
        assert!(taps.on_tap(ms(1000)));
    }
}
