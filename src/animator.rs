//! Per-line animation state and the stage that dispatches resolved lines.
//!
//! Each [`LineAnimator`] is either `Dormant` or `Active`. The [`Stage`]
//! owns one animator per lyric line and the [`Resolver`]; every sample it
//! receives is resolved once, and a newly selected line is pushed to all
//! animators in a single pass. The old line goes dormant in the same pass
//! the new one activates, so no render ever sees two active lines.

use std::time::{Duration, Instant};

use crate::constants::{
    DEFAULT_LINE_GAP, DEFAULT_ROW_HEIGHT, GLOW_LINES, GLOW_RADIUS, SCROLL_SETTLE, SCROLL_STAGGER,
    SHAKE_AMPLITUDE, SHAKE_CYCLES, SHAKE_DELAY, SHAKE_LINES,
};
use crate::lyrics::{Line, LyricSheet};
use crate::sync::{PlaybackSample, Resolver};
use crate::tween::{Easing, Tween};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineState {
    Dormant,
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Activated,
    Deactivated,
}

/// Snapshot of a line's animated values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    pub phase: f32,
    pub offset: f32,
    pub shaking: bool,
}

/// Everything the renderer needs to draw one line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineVisual {
    pub index: usize,
    pub active: bool,
    /// Wipe progress in [0, 1]
    pub phase: f32,
    /// Vertical offset of the line, in rows
    pub offset: f32,
    /// Horizontal shake offset, in columns
    pub shake_x: f32,
    pub blurred: bool,
    pub glow: f32,
}

#[derive(Debug, Clone)]
pub struct LineAnimator {
    index: usize,
    duration: Duration,
    shakes: bool,
    glows: bool,
    state: LineState,
    phase: Tween,
    offset: Tween,
    shake: Option<Tween>,
}

impl LineAnimator {
    pub fn new(line: &Line, now: Instant) -> Self {
        Self {
            index: line.index,
            duration: line.animation_duration,
            shakes: SHAKE_LINES.contains(&line.index),
            glows: GLOW_LINES.contains(&line.index),
            state: LineState::Dormant,
            phase: Tween::settled(0.0, now),
            offset: Tween::settled(0.0, now),
            shake: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state(&self) -> LineState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == LineState::Active
    }

    /// Reacts to `active` becoming the current line.
    ///
    /// The offset always retargets to `scroll_target`; lines below the
    /// active one start later, one stagger step per line, unless an earlier
    /// step is already due to start sooner. Re-selecting the line that is
    /// already active changes nothing.
    pub fn on_resolved(
        &mut self,
        active: usize,
        scroll_target: f32,
        now: Instant,
    ) -> Option<Transition> {
        if active == self.index && self.is_active() {
            return None;
        }

        // A cascade step that has not begun keeps its start time
        let requested = now + SCROLL_STAGGER * self.index.saturating_sub(active) as u32;
        let begin = self
            .offset
            .pending_start(now)
            .map_or(requested, |pending| pending.min(requested));
        self.offset = self
            .offset
            .retarget(scroll_target, now, SCROLL_SETTLE, Easing::Spring)
            .with_delay(begin.saturating_duration_since(now));

        match (self.state, active == self.index) {
            (LineState::Dormant, true) => {
                self.state = LineState::Active;
                self.phase = Tween::new(0.0, 1.0, now, self.duration, Easing::EaseInOut);
                self.shake = self.shakes.then(|| {
                    Tween::new(0.0, SHAKE_CYCLES, now, self.duration, Easing::Linear)
                        .with_delay(SHAKE_DELAY)
                });
                Some(Transition::Activated)
            }
            (LineState::Active, false) => {
                self.state = LineState::Dormant;
                self.phase = Tween::settled(0.0, now);
                self.shake = None;
                Some(Transition::Deactivated)
            }
            _ => None,
        }
    }

    pub fn animation_state(&self, now: Instant) -> AnimationState {
        AnimationState {
            phase: self.phase.value_at(now),
            offset: self.offset.value_at(now),
            shaking: self.shake.is_some_and(|shake| shake.progress(now) > 0.0),
        }
    }

    pub fn visual(&self, now: Instant) -> LineVisual {
        let state = self.animation_state(now);
        let active = self.is_active();
        let shake_x = self
            .shake
            .map(|shake| {
                let cycles = shake.value_at(now);
                (cycles * std::f32::consts::TAU).sin() * SHAKE_AMPLITUDE
            })
            .unwrap_or(0.0);

        LineVisual {
            index: self.index,
            active,
            phase: state.phase,
            offset: state.offset,
            shake_x,
            blurred: !active,
            glow: if active && self.glows {
                state.phase * GLOW_RADIUS
            } else {
                0.0
            },
        }
    }
}

/// Vertical geometry of the lyric stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageLayout {
    pub row_height: f32,
    pub line_gap: f32,
}

impl Default for StageLayout {
    fn default() -> Self {
        Self {
            row_height: DEFAULT_ROW_HEIGHT,
            line_gap: DEFAULT_LINE_GAP,
        }
    }
}

pub struct Stage {
    sheet: LyricSheet,
    resolver: Resolver,
    layout: StageLayout,
    animators: Vec<LineAnimator>,
    active: Option<usize>,
}

impl Stage {
    pub fn new(sheet: LyricSheet, resolver: Resolver, layout: StageLayout, now: Instant) -> Self {
        let animators = sheet
            .lines()
            .iter()
            .map(|line| LineAnimator::new(line, now))
            .collect();
        Self {
            sheet,
            resolver,
            layout,
            animators,
            active: None,
        }
    }

    pub fn sheet(&self) -> &LyricSheet {
        &self.sheet
    }

    pub fn layout(&self) -> StageLayout {
        self.layout
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn animators(&self) -> &[LineAnimator] {
        &self.animators
    }

    /// Resolves a sample and dispatches it; returns the newly active line.
    pub fn on_sample(&mut self, sample: &PlaybackSample, now: Instant) -> Option<usize> {
        let resolved = self.resolver.resolve(sample, self.sheet.timestamps())?;
        self.activate(resolved, now).then_some(resolved)
    }

    /// Makes `index` the active line. Returns false when nothing changed.
    pub fn activate(&mut self, index: usize, now: Instant) -> bool {
        if self.active == Some(index) {
            return false;
        }
        if index >= self.animators.len() {
            log::warn!("Ignoring out-of-range line {index}");
            return false;
        }

        let target = -self
            .sheet
            .scroll_extent(index, self.layout.row_height, self.layout.line_gap);
        for animator in &mut self.animators {
            if let Some(transition) = animator.on_resolved(index, target, now) {
                log::debug!("Line {} {:?}", animator.index(), transition);
            }
        }
        self.active = Some(index);
        debug_assert!(self.animators.iter().filter(|a| a.is_active()).count() <= 1);
        true
    }

    /// Forgets rewind history, e.g. after the song is reloaded.
    pub fn reset_sync(&mut self) {
        self.resolver.reset();
    }

    pub fn visuals(&self, now: Instant) -> Vec<LineVisual> {
        self.animators.iter().map(|a| a.visual(now)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::SyncMode;

    fn two_line_stage(now: Instant) -> Stage {
        let sheet = LyricSheet::from_tables(
            "t",
            "a",
            vec![
                String::new(),
                "Freedom of mind, I'm faster than the speed of sound".to_string(),
            ],
            vec![("00:00".to_string(), 0), ("00:07".to_string(), 1)],
            &[1, 3],
            &[0.0, 7.0],
        )
        .unwrap();
        Stage::new(
            sheet,
            Resolver::new(SyncMode::Exact, false),
            StageLayout::default(),
            now,
        )
    }

    fn builtin_stage(now: Instant) -> Stage {
        Stage::new(
            LyricSheet::builtin().unwrap(),
            Resolver::default(),
            StageLayout::default(),
            now,
        )
    }

    fn active_count(stage: &Stage) -> usize {
        stage.animators().iter().filter(|a| a.is_active()).count()
    }

    #[test]
    fn test_all_lines_start_dormant() {
        let now = Instant::now();
        let stage = two_line_stage(now);
        assert_eq!(stage.active(), None);
        assert!(stage
            .animators()
            .iter()
            .all(|a| a.state() == LineState::Dormant));
        for visual in stage.visuals(now) {
            assert!(visual.blurred);
            assert_eq!(visual.phase, 0.0);
            assert_eq!(visual.offset, 0.0);
        }
    }

    #[test]
    fn test_freedom_scenario() {
        let start = Instant::now();
        let mut stage = two_line_stage(start);

        assert_eq!(
            stage.on_sample(&PlaybackSample::new("00:00", 0.0), start),
            Some(0)
        );
        assert!(stage.animators()[0].is_active());

        let at = start + Duration::from_secs(7);
        assert_eq!(stage.on_sample(&PlaybackSample::new("00:07", 0.07), at), Some(1));
        assert_eq!(stage.animators()[0].state(), LineState::Dormant);
        assert_eq!(stage.animators()[1].state(), LineState::Active);

        let line = &stage.animators()[1];
        assert_eq!(line.animation_state(at).phase, 0.0);
        let halfway = line.animation_state(at + Duration::from_millis(3500)).phase;
        assert!((halfway - 0.5).abs() < 1e-4);
        assert_eq!(line.animation_state(at + Duration::from_secs(7)).phase, 1.0);
    }

    #[test]
    fn test_restart_scenario() {
        let start = Instant::now();
        let mut stage = builtin_stage(start);
        stage.activate(9, start);

        let resolved = stage.on_sample(&PlaybackSample::new("00:45", 0.0001), start);
        assert_eq!(resolved, Some(0));
        assert!(stage.animators()[0].is_active());
        assert!(!stage.animators()[9].is_active());
    }

    #[test]
    fn test_missed_sync_changes_nothing() {
        let start = Instant::now();
        let mut stage = builtin_stage(start);
        stage.on_sample(&PlaybackSample::new("00:00", 0.0), start);
        let later = start + Duration::from_millis(300);
        let before: Vec<_> = stage
            .animators()
            .iter()
            .map(|a| (a.state(), a.animation_state(later)))
            .collect();

        assert_eq!(
            stage.on_sample(&PlaybackSample::new("00:05", 0.05), later),
            None
        );

        let after: Vec<_> = stage
            .animators()
            .iter()
            .map(|a| (a.state(), a.animation_state(later)))
            .collect();
        assert_eq!(before, after);
        assert_eq!(stage.active(), Some(0));
    }

    #[test]
    fn test_same_line_twice_does_not_restart_phase() {
        let start = Instant::now();
        let mut stage = builtin_stage(start);
        stage.on_sample(&PlaybackSample::new("00:07", 0.07), start);

        let later = start + Duration::from_millis(700);
        let phase_before = stage.animators()[1].animation_state(later).phase;
        assert!(phase_before > 0.0);

        assert_eq!(
            stage.on_sample(&PlaybackSample::new("00:07", 0.072), later),
            None
        );
        assert_eq!(stage.animators()[1].animation_state(later).phase, phase_before);
    }

    #[test]
    fn test_at_most_one_active_line() {
        let start = Instant::now();
        let mut stage = builtin_stage(start);
        let sheet = LyricSheet::builtin().unwrap();

        for (step, (seconds, _)) in sheet.timestamps().iter().enumerate() {
            let key = crate::format::format_timestamp(Duration::from_secs(seconds));
            let now = start + Duration::from_secs(seconds);
            stage.on_sample(&PlaybackSample::new(key, 0.01 * step as f64), now);
            assert_eq!(active_count(&stage), 1);
        }
        assert_eq!(stage.active(), Some(42));
    }

    #[test]
    fn test_scroll_targets_follow_active_line() {
        let start = Instant::now();
        let mut stage = two_line_stage(start);
        stage.activate(1, start);

        // rows 1 and 3 with a gap of 1 after each line
        let settled = start + Duration::from_secs(2);
        for animator in stage.animators() {
            assert!((animator.animation_state(settled).offset - -6.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_scroll_cascade_delays_lower_lines() {
        let start = Instant::now();
        let mut stage = builtin_stage(start);
        stage.activate(0, start);

        let early = start + Duration::from_millis(150);
        let top = stage.animators()[0].animation_state(early).offset;
        let fifth = stage.animators()[5].animation_state(early).offset;
        assert!(top < 0.0);
        assert_eq!(fifth, 0.0);
    }

    #[test]
    fn test_cascade_keeps_moving_through_fast_lines() {
        let start = Instant::now();
        let mut stage = builtin_stage(start);
        stage.activate(11, start);

        let run = start + Duration::from_secs(10);
        assert_eq!(stage.animators()[28].animation_state(run).offset, -31.0);

        // 00:54 to 01:06 changes line every second
        let mut before_last = 0.0;
        for (step, line) in (12..=24).enumerate() {
            let at = run + Duration::from_secs(step as u64);
            before_last = stage.animators()[28].animation_state(at).offset;
            stage.activate(line, at);
        }

        // Rows above line 24 sum to 57 with the gaps
        assert!(before_last < -50.0, "line 28 lagged at {before_last}");
        let settled = run + Duration::from_secs(15);
        let offset = stage.animators()[28].animation_state(settled).offset;
        assert!((offset + 57.0).abs() < 1e-3);
    }

    #[test]
    fn test_shake_only_on_marked_lines() {
        let start = Instant::now();
        let mut stage = builtin_stage(start);

        stage.activate(17, start);
        let shaking_at = start + Duration::from_millis(500);
        assert!(!stage.animators()[17].animation_state(shaking_at).shaking);

        stage.activate(18, start);
        let line = &stage.animators()[18];
        assert!(!line.animation_state(start + Duration::from_millis(100)).shaking);
        assert!(line.animation_state(shaking_at).shaking);
        assert!(line.visual(start + Duration::from_secs(5)).shake_x.abs() < 1e-3);

        stage.activate(19, shaking_at);
        assert!(!stage.animators()[18].animation_state(shaking_at).shaking);
    }

    #[test]
    fn test_glow_only_on_marked_lines() {
        let start = Instant::now();
        let mut stage = builtin_stage(start);
        stage.activate(7, start);
        let done = start + Duration::from_secs(3);
        assert!((stage.animators()[7].visual(done).glow - GLOW_RADIUS).abs() < 1e-4);

        stage.activate(8, done);
        let later = done + Duration::from_secs(5);
        assert_eq!(stage.animators()[8].visual(later).glow, 0.0);
        assert_eq!(stage.animators()[7].visual(later).glow, 0.0);
    }

    #[test]
    fn test_out_of_range_activation_is_ignored() {
        let start = Instant::now();
        let mut stage = two_line_stage(start);
        assert!(!stage.activate(5, start));
        assert_eq!(stage.active(), None);
    }
}
