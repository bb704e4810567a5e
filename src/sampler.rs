//! Fixed-period polling of the audio subsystem.

use std::time::{Duration, Instant};

use crate::sync::PlaybackSample;

/// What the lyric view needs from an audio backend.
pub trait Playback {
    fn play(&mut self);
    fn pause(&mut self);
    fn is_playing(&self) -> bool;
    /// Current position, or `None` when it cannot be read this tick
    fn position(&self) -> Option<Duration>;
    fn duration(&self) -> Option<Duration>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// `None` when the position or the duration is unavailable
    pub sample: Option<PlaybackSample>,
    pub playing: bool,
}

#[derive(Debug, Clone)]
pub struct ProgressSampler {
    interval: Duration,
    last: Option<Instant>,
}

impl ProgressSampler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.last
            .is_none_or(|last| now.saturating_duration_since(last) >= self.interval)
    }

    /// Samples the player if a period has elapsed since the last tick.
    pub fn poll(&mut self, player: &dyn Playback, now: Instant) -> Option<Tick> {
        if !self.is_due(now) {
            return None;
        }
        self.last = Some(now);
        Some(Self::sample(player))
    }

    pub fn sample(player: &dyn Playback) -> Tick {
        let playing = player.is_playing();
        let sample = match player.position() {
            Some(position) => PlaybackSample::from_position(position, player.duration()),
            None => {
                log::debug!("Position unavailable, skipping tick");
                None
            }
        };
        Tick { sample, playing }
    }
}
