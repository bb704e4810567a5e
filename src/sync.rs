//! Maps playback samples onto lyric lines.
//!
//! [`resolve`] is the plain rule: an exact `mm:ss` match, or the `00:00`
//! line while the progress fraction sits just above zero after a restart.
//! [`Resolver`] wraps it with two opt-in behaviors: a floor lookup that
//! tolerates ticks landing between table entries, and explicit rewind
//! detection from a falling fraction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::RESTART_WINDOW;
use crate::format::{format_timestamp, parse_timestamp};
use crate::lyrics::TimestampIndex;

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSample {
    pub formatted_time: String,
    /// Position over duration, clamped to [0, 1]
    pub fraction: f64,
}

impl PlaybackSample {
    pub fn new(formatted_time: impl Into<String>, fraction: f64) -> Self {
        Self {
            formatted_time: formatted_time.into(),
            fraction,
        }
    }

    /// Builds a sample, or `None` when the duration is unknown or zero.
    pub fn from_position(position: Duration, duration: Option<Duration>) -> Option<Self> {
        let duration = duration.filter(|d| !d.is_zero())?;
        let fraction = (position.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0);
        Some(Self::new(format_timestamp(position), fraction))
    }
}

/// Whether `fraction` falls in the window right after playback returns to zero.
pub fn in_restart_window(fraction: f64) -> bool {
    fraction > 0.0 && fraction <= RESTART_WINDOW
}

/// Resolves a sample to the line it selects, or `None` for no change.
pub fn resolve(sample: &PlaybackSample, table: &TimestampIndex) -> Option<usize> {
    if in_restart_window(sample.fraction) {
        return table.start();
    }
    table.get(&sample.formatted_time)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// Only exact timestamp matches change the line
    #[default]
    Exact,
    /// The latest timestamp not after the position selects the line
    Floor,
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncMode::Exact => write!(f, "exact"),
            SyncMode::Floor => write!(f, "floor"),
        }
    }
}

impl FromStr for SyncMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "exact" => Ok(SyncMode::Exact),
            "floor" => Ok(SyncMode::Floor),
            other => Err(format!("Unknown sync mode '{other}', expected 'exact' or 'floor'")),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Resolver {
    mode: SyncMode,
    detect_rewind: bool,
    previous_fraction: Option<f64>,
}

impl Resolver {
    pub fn new(mode: SyncMode, detect_rewind: bool) -> Self {
        Self {
            mode,
            detect_rewind,
            previous_fraction: None,
        }
    }

    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    pub fn resolve(&mut self, sample: &PlaybackSample, table: &TimestampIndex) -> Option<usize> {
        let rewound = self.detect_rewind
            && self
                .previous_fraction
                .is_some_and(|previous| sample.fraction < previous);
        self.previous_fraction = Some(sample.fraction);

        if rewound {
            log::debug!(
                "Rewind detected at {} ({:.4})",
                sample.formatted_time,
                sample.fraction
            );
            return floor_lookup(sample, table).or_else(|| table.start());
        }

        match self.mode {
            SyncMode::Exact => resolve(sample, table),
            SyncMode::Floor => {
                if in_restart_window(sample.fraction) {
                    return table.start();
                }
                floor_lookup(sample, table)
            }
        }
    }

    /// Forgets the previous fraction, e.g. after the song is reloaded.
    pub fn reset(&mut self) {
        self.previous_fraction = None;
    }
}

fn floor_lookup(sample: &PlaybackSample, table: &TimestampIndex) -> Option<usize> {
    parse_timestamp(&sample.formatted_time).and_then(|seconds| table.floor(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::LyricSheet;

    fn builtin() -> LyricSheet {
        LyricSheet::builtin().unwrap()
    }

    #[test]
    fn test_every_table_entry_resolves_to_its_index() {
        let sheet = builtin();
        for (seconds, index) in sheet.timestamps().iter() {
            let key = format_timestamp(Duration::from_secs(seconds));
            let sample = PlaybackSample::new(key, 0.5);
            assert_eq!(resolve(&sample, sheet.timestamps()), Some(index));
        }
    }

    #[test]
    fn test_absent_timestamps_resolve_to_no_change() {
        let sheet = builtin();
        for key in ["00:05", "00:08", "01:07", "01:44", "09:59"] {
            let sample = PlaybackSample::new(key, 0.5);
            assert_eq!(resolve(&sample, sheet.timestamps()), None, "key {key}");
        }
    }

    #[test]
    fn test_restart_window_forces_first_line() {
        let sheet = builtin();
        for fraction in [0.0001, 0.0002, RESTART_WINDOW] {
            let sample = PlaybackSample::new("00:45", fraction);
            assert_eq!(resolve(&sample, sheet.timestamps()), Some(0));
        }
        let sample = PlaybackSample::new("00:07", 0.0001);
        assert_eq!(resolve(&sample, sheet.timestamps()), Some(0));
    }

    #[test]
    fn test_restart_window_bounds() {
        assert!(!in_restart_window(0.0));
        assert!(in_restart_window(0.0003));
        assert!(!in_restart_window(0.00031));
        assert!(!in_restart_window(1.0));
    }

    #[test]
    fn test_restart_window_without_start_entry() {
        let sheet = LyricSheet::from_tables(
            "t",
            "a",
            vec!["a".into(), "b".into()],
            vec![("00:03".to_string(), 0), ("00:45".to_string(), 1)],
            &[1, 1],
            &[1.0, 1.0],
        )
        .unwrap();
        let sample = PlaybackSample::new("00:45", 0.0001);
        assert_eq!(resolve(&sample, sheet.timestamps()), None);
    }

    #[test]
    fn test_sample_from_position() {
        let sample =
            PlaybackSample::from_position(Duration::from_millis(7400), Some(Duration::from_secs(74)))
                .unwrap();
        assert_eq!(sample.formatted_time, "00:07");
        assert!((sample.fraction - 0.1).abs() < 1e-9);

        assert!(PlaybackSample::from_position(Duration::from_secs(1), None).is_none());
        assert!(
            PlaybackSample::from_position(Duration::from_secs(1), Some(Duration::ZERO)).is_none()
        );

        let past_end =
            PlaybackSample::from_position(Duration::from_secs(80), Some(Duration::from_secs(74)))
                .unwrap();
        assert_eq!(past_end.fraction, 1.0);
    }

    #[test]
    fn test_exact_resolver_matches_function() {
        let sheet = builtin();
        let mut resolver = Resolver::new(SyncMode::Exact, false);
        assert_eq!(
            resolver.resolve(&PlaybackSample::new("00:07", 0.07), sheet.timestamps()),
            Some(1)
        );
        assert_eq!(
            resolver.resolve(&PlaybackSample::new("00:08", 0.08), sheet.timestamps()),
            None
        );
    }

    #[test]
    fn test_floor_resolver_fills_gaps() {
        let sheet = builtin();
        let mut resolver = Resolver::new(SyncMode::Floor, false);
        assert_eq!(
            resolver.resolve(&PlaybackSample::new("00:05", 0.05), sheet.timestamps()),
            Some(0)
        );
        assert_eq!(
            resolver.resolve(&PlaybackSample::new("01:07", 0.6), sheet.timestamps()),
            Some(24)
        );
        assert_eq!(
            resolver.resolve(&PlaybackSample::new("00:45", 0.0001), sheet.timestamps()),
            Some(0)
        );
    }

    #[test]
    fn test_floor_resolver_before_first_entry() {
        let sheet = LyricSheet::from_tables(
            "t",
            "a",
            vec!["a".into(), "b".into()],
            vec![("00:03".to_string(), 0), ("00:09".to_string(), 1)],
            &[1, 1],
            &[1.0, 1.0],
        )
        .unwrap();
        let mut resolver = Resolver::new(SyncMode::Floor, false);
        assert_eq!(
            resolver.resolve(&PlaybackSample::new("00:02", 0.02), sheet.timestamps()),
            None
        );
        assert_eq!(
            resolver.resolve(&PlaybackSample::new("--:--", 0.5), sheet.timestamps()),
            None
        );
        assert_eq!(
            resolver.resolve(&PlaybackSample::new("00:09", 0.09), sheet.timestamps()),
            Some(1)
        );
    }

    #[test]
    fn test_rewind_detection_resyncs() {
        let sheet = builtin();
        let mut resolver = Resolver::new(SyncMode::Exact, true);
        assert_eq!(
            resolver.resolve(&PlaybackSample::new("01:10", 0.7), sheet.timestamps()),
            Some(27)
        );
        // Jumped back to a gap between entries
        assert_eq!(
            resolver.resolve(&PlaybackSample::new("00:16", 0.15), sheet.timestamps()),
            Some(2)
        );
        // Moving forward again uses the exact rule
        assert_eq!(
            resolver.resolve(&PlaybackSample::new("00:17", 0.16), sheet.timestamps()),
            None
        );
    }

    #[test]
    fn test_rewind_ignored_when_disabled() {
        let sheet = builtin();
        let mut resolver = Resolver::new(SyncMode::Exact, false);
        resolver.resolve(&PlaybackSample::new("01:10", 0.7), sheet.timestamps());
        assert_eq!(
            resolver.resolve(&PlaybackSample::new("00:16", 0.15), sheet.timestamps()),
            None
        );
    }

    #[test]
    fn test_reset_forgets_previous_fraction() {
        let sheet = builtin();
        let mut resolver = Resolver::new(SyncMode::Exact, true);
        resolver.resolve(&PlaybackSample::new("01:10", 0.7), sheet.timestamps());
        resolver.reset();
        assert_eq!(
            resolver.resolve(&PlaybackSample::new("00:16", 0.15), sheet.timestamps()),
            None
        );
    }

    #[test]
    fn test_sync_mode_parsing() {
        assert_eq!("exact".parse::<SyncMode>(), Ok(SyncMode::Exact));
        assert_eq!("FLOOR".parse::<SyncMode>(), Ok(SyncMode::Floor));
        assert!("nearest".parse::<SyncMode>().is_err());
        assert_eq!(SyncMode::Floor.to_string(), "floor");
    }
}
