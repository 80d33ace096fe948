use std::time::{Duration, Instant};

/// Lifecycle notifications produced by the animator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorEvent {
    Started,
    Ended,
}

/// Time-driven linear interpolator between two integer values, repeating
/// until canceled.
///
/// The animator keeps no timer of its own: the host event loop calls
/// [`ValueAnimator::tick`] with the current instant and renders whatever value
/// was computed last. Repeats restart from the start value (sawtooth), never
/// reverse.
#[derive(Debug, Clone)]
pub struct ValueAnimator {
    from: u16,
    to: u16,
    duration: Duration,
    started_at: Option<Instant>,
    value: u16,
}

impl ValueAnimator {
    pub fn new() -> Self {
        Self {
            from: 0,
            to: 0,
            duration: Duration::from_millis(300),
            started_at: None,
            value: 0,
        }
    }

    pub fn set_values(&mut self, from: u16, to: u16) {
        self.from = from;
        self.to = to;
    }

    /// Change the end value without restarting. Used when the owner is resized
    /// mid-animation.
    pub fn set_end(&mut self, to: u16) {
        self.to = to;
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    /// Last computed value
    pub fn value(&self) -> u16 {
        self.value
    }

    /// Start (or restart) the animation at `now`.
    pub fn start(&mut self, now: Instant) -> AnimatorEvent {
        self.started_at = Some(now);
        self.value = self.from;
        AnimatorEvent::Started
    }

    /// Stop the animation. Returns `Ended` only if it was running.
    pub fn cancel(&mut self) -> Option<AnimatorEvent> {
        self.started_at.take().map(|_| AnimatorEvent::Ended)
    }

    /// Advance to `now` and return the new value, `None` when the animation
    /// isn't running.
    pub fn tick(&mut self, now: Instant) -> Option<u16> {
        let started_at = self.started_at?;
        self.value = self.value_at(now.saturating_duration_since(started_at));
        Some(self.value)
    }

    /// Interpolated value `elapsed` after start.
    ///
    /// Cycles are half-open on the left, `(k*period, (k+1)*period]`, so the end
    /// value is produced exactly at every period boundary and the next instant
    /// restarts near the start value.
    pub fn value_at(&self, elapsed: Duration) -> u16 {
        let period = self.duration.as_millis().max(1);
        let t = elapsed.as_millis();

        let into_cycle = if t == 0 {
            0
        } else {
            match t % period {
                0 => period,
                r => r,
            }
        };

        let span = i64::from(self.to) - i64::from(self.from);
        let offset = span * into_cycle as i64 / period as i64;
        (i64::from(self.from) + offset).clamp(0, i64::from(u16::MAX)) as u16
    }
}

impl Default for ValueAnimator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn looping(to: u16) -> ValueAnimator {
        let mut animator = ValueAnimator::new();
        animator.set_values(0, to);
        animator.set_duration(Duration::from_millis(1000));
        animator
    }

    #[test]
    fn test_sawtooth_values() {
        let animator = looping(100);
        assert_eq!(animator.value_at(Duration::ZERO), 0);
        assert_eq!(animator.value_at(Duration::from_millis(250)), 25);
        assert_eq!(animator.value_at(Duration::from_millis(999)), 99);
        assert_eq!(animator.value_at(Duration::from_millis(1000)), 100);
        assert_eq!(animator.value_at(Duration::from_millis(1001)), 0);
        assert_eq!(animator.value_at(Duration::from_millis(1500)), 50);
        assert_eq!(animator.value_at(Duration::from_millis(2000)), 100);
    }

    #[test]
    fn test_tick_requires_start() {
        let mut animator = looping(100);
        assert_eq!(animator.tick(Instant::now()), None);

        let t0 = Instant::now();
        assert_eq!(animator.start(t0), AnimatorEvent::Started);
        assert_eq!(animator.tick(t0 + Duration::from_millis(400)), Some(40));
        assert_eq!(animator.value(), 40);
    }

    #[test]
    fn test_keeps_running_until_canceled() {
        let mut animator = looping(10);
        let t0 = Instant::now();
        animator.start(t0);
        for step in 1..=50u64 {
            let value = animator.tick(t0 + Duration::from_millis(step * 100)).unwrap();
            assert!(value <= 10);
        }
        assert_eq!(animator.cancel(), Some(AnimatorEvent::Ended));
    }

    #[test]
    fn test_cancel() {
        let mut animator = looping(100);
        assert_eq!(animator.cancel(), None);

        let t0 = Instant::now();
        animator.start(t0);
        assert_eq!(animator.cancel(), Some(AnimatorEvent::Ended));
        assert_eq!(animator.tick(t0 + Duration::from_millis(100)), None);
    }

    #[test]
    fn test_set_end_while_running() {
        let mut animator = looping(100);
        let t0 = Instant::now();
        animator.start(t0);
        animator.set_end(200);
        assert_eq!(animator.tick(t0 + Duration::from_millis(500)), Some(100));
    }
}
