//! Main application state and control flow for the lyric player.
//!
//! This module is the coordinator of the terminal player: it owns the audio
//! transport and the lyric [`Stage`], runs the progress sampler on the
//! frame loop, forwards every sample to the stage, and handles the few keys
//! the player understands.

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::info;
use lyricsync::animator::Stage;
use lyricsync::config::Config;
use lyricsync::constants::FRAME_INTERVAL;
use lyricsync::format::format_timestamp;
use lyricsync::lyrics::LyricSheet;
use lyricsync::sampler::ProgressSampler;
use lyricsync::sync::PlaybackSample;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{error::Error, io, path::Path, time::Instant};

use super::audio::{AudioEngine, Transport};
use super::ui;

pub struct App<T: Transport> {
    pub should_quit: bool,
    pub is_playing: bool,
    pub player: T,
    pub stage: Stage,
    sampler: ProgressSampler,
    pub sample: Option<PlaybackSample>,
    pub loop_playback: bool,
}

impl<T: Transport> App<T> {
    pub fn new(player: T, stage: Stage, sampler: ProgressSampler, loop_playback: bool) -> Self {
        Self {
            should_quit: false,
            is_playing: false,
            player,
            stage,
            sampler,
            sample: None,
            loop_playback,
        }
    }

    pub fn play(&mut self) {
        if self.player.has_finished() {
            self.restart();
        }
        self.player.play();
        self.is_playing = true;
    }

    pub fn toggle_playback(&mut self) {
        if self.is_playing {
            self.player.pause();
            self.is_playing = false;
        } else {
            self.play();
        }
    }

    fn restart(&mut self) {
        match self.player.restart() {
            Ok(()) => self.stage.reset_sync(),
            Err(e) => log::error!("Could not restart playback: {e}"),
        }
    }

    /// One pass of the frame loop: loop handling, then a sampler tick if due.
    pub fn update(&mut self, now: Instant) {
        if self.loop_playback && self.is_playing && self.player.has_finished() {
            info!("Song finished, looping");
            self.restart();
        }

        let Some(tick) = self.sampler.poll(&self.player, now) else {
            return;
        };
        if !tick.playing {
            self.is_playing = false;
        }
        if let Some(sample) = tick.sample {
            if let Some(line) = self.stage.on_sample(&sample, now) {
                log::debug!("{} -> line {line}", sample.formatted_time);
            }
            self.sample = Some(sample);
        }
    }

    /// Formatted total length, once the player knows it.
    pub fn total_time(&self) -> Option<String> {
        self.player.duration().map(format_timestamp)
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_playback(),
            _ => {}
        }
    }
}

/// Flags and paths resolved from the config file and the command line.
pub struct PlayerOptions {
    pub audio_file: String,
    pub sheet_file: Option<String>,
    pub config: Config,
}

pub fn run(options: PlayerOptions) -> Result<(), Box<dyn Error>> {
    init_logging(&options.config.log_file)?;
    info!("Starting lyricsync");

    // Everything that can fail at startup happens before the terminal is taken over
    let sheet = LyricSheet::load_or_builtin(options.sheet_file.as_deref().map(Path::new))?;
    let engine = AudioEngine::open(Path::new(&options.audio_file))?;
    info!(
        "Playing {} - {} from {}",
        sheet.artist(),
        sheet.title(),
        engine.path().display()
    );

    let config = &options.config;
    let resolver = config.resolver();
    let sampler = ProgressSampler::new(config.tick_interval());
    info!(
        "Sampling every {:?} with {} lookup",
        sampler.interval(),
        resolver.mode()
    );
    let stage = Stage::new(sheet, resolver, config.layout(), Instant::now());
    let mut app = App::new(engine, stage, sampler, config.loop_playback);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    app.play();
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &res {
        log::error!("Player stopped: {e}");
    }
    info!("Exiting lyricsync");
    res
}

fn run_app<B: ratatui::backend::Backend, T: Transport>(
    terminal: &mut Terminal<B>,
    app: &mut App<T>,
) -> Result<(), Box<dyn Error>> {
    loop {
        let now = Instant::now();
        app.update(now);
        terminal.draw(|f| ui::draw(f, app, now))?;

        if event::poll(FRAME_INTERVAL)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key.code);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn init_logging(log_file: &str) -> Result<(), Box<dyn Error>> {
    use simplelog::{CombinedLogger, LevelFilter, WriteLogger};
    use std::fs::File;

    CombinedLogger::init(vec![WriteLogger::new(
        LevelFilter::Debug,
        simplelog::Config::default(),
        File::create(log_file)?,
    )])?;

    Ok(())
}
