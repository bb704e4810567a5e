//! Project-wide constants used across multiple modules.
//!
//! Timing and animation tuning lives here so the sync core, the animators
//! and the terminal surface agree on the same numbers.

use std::time::Duration;

/// Default period of the progress sampler
pub const DEFAULT_TICK: Duration = Duration::from_millis(100);

/// Upper bound of the fraction window treated as "just restarted"
pub const RESTART_WINDOW: f64 = 0.0003;

/// Timestamp key the restart heuristic resolves to
pub const START_TIMESTAMP: &str = "00:00";

/// Line indices that shake while active
pub const SHAKE_LINES: &[usize] = &[18, 31];

/// Delay between activation and the start of the shake
pub const SHAKE_DELAY: Duration = Duration::from_millis(200);

/// Full oscillations performed over a shaking line's duration
pub const SHAKE_CYCLES: f32 = 16.0;

/// Horizontal shake amplitude in terminal columns
pub const SHAKE_AMPLITUDE: f32 = 2.0;

/// Line indices that glow while active
pub const GLOW_LINES: &[usize] = &[7, 10];

/// Glow radius reached at the end of the wipe
pub const GLOW_RADIUS: f32 = 8.0;

/// Per-line delay of the scroll cascade
pub const SCROLL_STAGGER: Duration = Duration::from_millis(100);

/// Settle time of the spring used for scrolling
pub const SCROLL_SETTLE: Duration = Duration::from_millis(550);

/// Default height of one wrapped lyric row, in terminal rows
pub const DEFAULT_ROW_HEIGHT: f32 = 1.0;

/// Default blank space between two lyric lines, in terminal rows
pub const DEFAULT_LINE_GAP: f32 = 1.0;

/// Viewport mask stops as (position, opacity) pairs, top to bottom
pub const FADE_STOPS: &[(f32, f32)] = &[(0.0, 0.0), (0.01, 1.0), (0.65, 1.0), (1.0, 0.0)];

/// Default name of the bundled audio asset
pub const DEFAULT_AUDIO_FILE: &str = "Dreaming.mp3";

/// Extensions accepted for lyric sheet files
pub const SHEET_EXTENSIONS: &[&str] = &["toml", "json"];

/// Redraw period of the terminal surface
pub const FRAME_INTERVAL: Duration = Duration::from_millis(33);
