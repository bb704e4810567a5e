//! Lyric sheet: the ordered lines of a song and its lookup tables.
//!
//! A sheet is built once from three parallel tables (row counts, animation
//! durations and the `mm:ss` → line index map) and is immutable afterwards.
//! Every invariant the animators rely on is checked while building, so an
//! inconsistent table is rejected at startup rather than surfacing as an
//! out-of-bounds access mid-song.
//!
//! Sheets can also be read from TOML or JSON files shaped like
//! [`SheetFile`], which is what `lyricsync sheet export` writes.

pub mod builtin;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::constants::START_TIMESTAMP;
use crate::error::{LyricsError, Result, SheetIssue};
use crate::format::{format_timestamp, parse_timestamp};

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub index: usize,
    pub text: String,
    /// Rows the line occupies once wrapped
    pub line_count: u32,
    pub animation_duration: Duration,
}

/// Exact `mm:ss` lookup plus an ordered view for range lookups.
#[derive(Debug, Clone, Default)]
pub struct TimestampIndex {
    by_key: HashMap<String, usize>,
    ordered: Vec<(u64, usize)>,
}

impl TimestampIndex {
    fn build<I>(entries: I, line_len: usize) -> std::result::Result<Self, SheetIssue>
    where
        I: IntoIterator<Item = (String, usize)>,
    {
        let mut by_key = HashMap::new();
        let mut ordered = Vec::new();

        for (key, index) in entries {
            let seconds = parse_timestamp(&key)
                .filter(|secs| format_timestamp(Duration::from_secs(*secs)) == key)
                .ok_or_else(|| SheetIssue::MalformedTimestamp(key.clone()))?;
            if index >= line_len {
                return Err(SheetIssue::IndexOutOfRange {
                    key,
                    index,
                    len: line_len,
                });
            }
            if by_key.contains_key(&key) {
                return Err(SheetIssue::DuplicateTimestamp(key));
            }
            ordered.push((seconds, index));
            by_key.insert(key, index);
        }

        ordered.sort_by_key(|(seconds, _)| *seconds);
        Ok(Self { by_key, ordered })
    }

    /// Exact match on a formatted timestamp.
    pub fn get(&self, key: &str) -> Option<usize> {
        self.by_key.get(key).copied()
    }

    /// Index of the line keyed at `00:00`, if the sheet has one.
    pub fn start(&self) -> Option<usize> {
        self.get(START_TIMESTAMP)
    }

    /// Line keyed at the latest timestamp not after `seconds`.
    pub fn floor(&self, seconds: u64) -> Option<usize> {
        let upper = self.ordered.partition_point(|(at, _)| *at <= seconds);
        upper.checked_sub(1).map(|i| self.ordered[i].1)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Entries in playback order as `(seconds, line index)`.
    pub fn iter(&self) -> impl Iterator<Item = (u64, usize)> + '_ {
        self.ordered.iter().copied()
    }
}

#[derive(Debug, Clone)]
pub struct LyricSheet {
    title: String,
    artist: String,
    lines: Vec<Line>,
    timestamps: TimestampIndex,
}

impl LyricSheet {
    /// Builds a sheet from the line texts and the three parallel tables.
    pub fn from_tables<I>(
        title: impl Into<String>,
        artist: impl Into<String>,
        texts: Vec<String>,
        timestamps: I,
        line_counts: &[u32],
        durations: &[f64],
    ) -> std::result::Result<Self, SheetIssue>
    where
        I: IntoIterator<Item = (String, usize)>,
    {
        let len = texts.len();
        if len == 0 {
            return Err(SheetIssue::Empty);
        }
        if line_counts.len() != len {
            return Err(SheetIssue::LengthMismatch {
                table: "line count",
                expected: len,
                found: line_counts.len(),
            });
        }
        if durations.len() != len {
            return Err(SheetIssue::LengthMismatch {
                table: "animation duration",
                expected: len,
                found: durations.len(),
            });
        }

        let mut lines = Vec::with_capacity(len);
        for (index, text) in texts.into_iter().enumerate() {
            let line_count = line_counts[index];
            if line_count == 0 {
                return Err(SheetIssue::ZeroRows(index));
            }
            let seconds = durations[index];
            let animation_duration = Duration::try_from_secs_f64(seconds)
                .map_err(|_| SheetIssue::InvalidDuration { index, seconds })?;
            lines.push(Line {
                index,
                text,
                line_count,
                animation_duration,
            });
        }

        let timestamps = TimestampIndex::build(timestamps, len)?;
        if timestamps.start().is_none() {
            log::warn!("lyric sheet has no {START_TIMESTAMP} entry; restarts will not re-sync");
        }

        Ok(Self {
            title: title.into(),
            artist: artist.into(),
            lines,
            timestamps,
        })
    }

    /// The sheet compiled into the binary.
    pub fn builtin() -> Result<Self> {
        let sheet = Self::from_tables(
            builtin::TITLE,
            builtin::ARTIST,
            builtin::LINES.iter().map(|s| s.to_string()).collect(),
            builtin::TIMESTAMPS
                .iter()
                .map(|(key, index)| (key.to_string(), *index)),
            builtin::LINE_COUNTS,
            builtin::ANIMATION_SECONDS,
        )?;
        Ok(sheet)
    }

    /// Loads a sheet file, choosing the parser by extension.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(LyricsError::AssetMissing(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        let file: SheetFile = match ext.as_str() {
            "json" => serde_json::from_str(&contents)?,
            _ => toml::from_str(&contents)?,
        };
        log::info!("Loaded lyric sheet from {}", path.display());
        file.into_sheet()
    }

    /// Loads `path` when given, otherwise the bundled sheet.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::builtin(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn timestamps(&self) -> &TimestampIndex {
        &self.timestamps
    }

    /// Height of line `index` including the gap below it.
    pub fn line_height(&self, index: usize, row_height: f32, gap: f32) -> f32 {
        self.lines
            .get(index)
            .map(|line| line.line_count as f32 * row_height + gap)
            .unwrap_or(0.0)
    }

    /// Distance from the top of the stack to the top of line `index`.
    pub fn line_top(&self, index: usize, row_height: f32, gap: f32) -> f32 {
        (0..index.min(self.lines.len()))
            .map(|i| self.line_height(i, row_height, gap))
            .sum()
    }

    /// How far the stack scrolls up once line `index` is active.
    pub fn scroll_extent(&self, index: usize, row_height: f32, gap: f32) -> f32 {
        self.line_top(index, row_height, gap) + self.line_height(index, row_height, gap)
    }

    pub fn to_file(&self) -> SheetFile {
        SheetFile {
            title: self.title.clone(),
            artist: self.artist.clone(),
            lines: self
                .lines
                .iter()
                .map(|line| LineEntry {
                    text: line.text.clone(),
                    rows: line.line_count,
                    duration: line.animation_duration.as_secs_f64(),
                })
                .collect(),
            timestamps: self
                .timestamps
                .iter()
                .map(|(secs, index)| (format_timestamp(Duration::from_secs(secs)), index))
                .collect(),
        }
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(&self.to_file())?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_file())
            .map_err(|e| LyricsError::SheetSerialize(e.to_string()))
    }
}

/// On-disk form of a lyric sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetFile {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    pub lines: Vec<LineEntry>,
    pub timestamps: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineEntry {
    pub text: String,
    #[serde(default = "default_rows")]
    pub rows: u32,
    #[serde(default)]
    pub duration: f64,
}

fn default_rows() -> u32 {
    1
}

impl SheetFile {
    pub fn into_sheet(self) -> Result<LyricSheet> {
        let (texts, (rows, durations)): (Vec<_>, (Vec<_>, Vec<_>)) = self
            .lines
            .into_iter()
            .map(|entry| (entry.text, (entry.rows, entry.duration)))
            .unzip();
        let sheet = LyricSheet::from_tables(
            self.title,
            self.artist,
            texts,
            self.timestamps,
            &rows,
            &durations,
        )?;
        Ok(sheet)
    }
}
