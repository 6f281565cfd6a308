// Spin animation: interpolates the displayed rotation from the start angle to
// the target over the spin duration with an ease-out curve.

use std::time::{Duration, Instant};

use crate::protocol::SpinAnimationInfo;

#[derive(Debug, Clone)]
pub struct SpinAnimation {
    pub start_rotation: f64,
    pub target_rotation: f64,
    pub duration: Duration,
    pub started_at: Instant,
}

impl SpinAnimation {
    pub fn start(info: &SpinAnimationInfo, now: Instant) -> Self {
        SpinAnimation {
            start_rotation: info.start_rotation,
            target_rotation: info.target_rotation,
            duration: info.duration,
            started_at: now,
        }
    }

    /// Fraction of the duration elapsed, in `[0, 1]`.
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    pub fn rotation_after(&self, elapsed: Duration) -> f64 {
        let eased = ease_out_cubic(self.progress(elapsed));
        self.start_rotation + (self.target_rotation - self.start_rotation) * eased
    }

    pub fn rotation_at(&self, now: Instant) -> f64 {
        self.rotation_after(now.saturating_duration_since(self.started_at))
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started_at) >= self.duration
    }
}

/// Fast start, long deceleration.
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}
