//! Time-based interpolation for the lyric animations.
//!
//! A [`Tween`] is a start value, an end value, an optional delay and a
//! duration. It is evaluated against an `Instant` each frame; nothing is
//! scheduled.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    Linear,
    EaseInOut,
    /// Critically damped spring that settles within the tween's duration
    Spring,
}

impl Easing {
    /// Maps linear progress in [0, 1] to eased progress.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::Spring => {
                if t >= 1.0 {
                    return 1.0;
                }
                // omega chosen so the residual is below 0.1% at t = 1
                let omega = 9.2;
                let x = omega * t;
                1.0 - (1.0 + x) * (-x).exp()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    from: f32,
    to: f32,
    start: Instant,
    delay: Duration,
    duration: Duration,
    easing: Easing,
}

impl Tween {
    pub fn new(from: f32, to: f32, start: Instant, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            start,
            delay: Duration::ZERO,
            duration,
            easing,
        }
    }

    /// A tween already resting at `value`.
    pub fn settled(value: f32, now: Instant) -> Self {
        Self::new(value, value, now, Duration::ZERO, Easing::Linear)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Linear progress in [0, 1] at `now`, before easing.
    pub fn progress(&self, now: Instant) -> f32 {
        let begin = self.start + self.delay;
        if now <= begin {
            // A zero-length tween that has begun is complete
            return if self.duration.is_zero() && now == begin {
                1.0
            } else {
                0.0
            };
        }
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.duration_since(begin);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    pub fn value_at(&self, now: Instant) -> f32 {
        let t = self.easing.apply(self.progress(now));
        self.from + (self.to - self.from) * t
    }

    /// When a delayed tween that has not begun by `now` will begin.
    pub fn pending_start(&self, now: Instant) -> Option<Instant> {
        let begin = self.start + self.delay;
        (now < begin).then_some(begin)
    }

    /// Starts a new tween from wherever this one is at `now`.
    pub fn retarget(
        &self,
        to: f32,
        now: Instant,
        duration: Duration,
        easing: Easing,
    ) -> Self {
        Self::new(self.value_at(now), to, now, duration, easing)
    }
}
