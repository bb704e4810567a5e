//! Audio playback engine for the bundled song.
//!
//! A thin wrapper over a rodio output stream and sink. The song is decoded
//! by rodio; playback position comes from the sink, and the total duration
//! from the decoder (or from a counting pass when the container does not
//! declare it).

use lyricsync::error::{LyricsError, Result};
use lyricsync::sampler::Playback;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Transport operations beyond what the sampler reads.
pub trait Transport: Playback {
    /// Reloads the song and starts it from the beginning.
    fn restart(&mut self) -> Result<()>;
    /// The song has played to its end.
    fn has_finished(&self) -> bool;
}

pub struct AudioEngine {
    stream: OutputStream,
    sink: Sink,
    path: PathBuf,
    duration: Option<Duration>,
}

impl AudioEngine {
    /// Opens the output device and queues `path`, paused.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(LyricsError::AssetMissing(path.to_path_buf()));
        }

        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| LyricsError::Output(e.to_string()))?;
        stream.log_on_drop(false);
        let sink = Sink::connect_new(stream.mixer());
        sink.pause();

        let mut engine = Self {
            stream,
            sink,
            path: path.to_path_buf(),
            duration: None,
        };
        engine.queue()?;
        if engine.duration.is_none() {
            engine.duration = engine.measure_duration()?;
        }

        log::info!(
            "Loaded {} ({:?})",
            engine.path.display(),
            engine.duration
        );
        Ok(engine)
    }

    fn decode(&self) -> Result<Decoder<BufReader<File>>> {
        let file = File::open(&self.path)?;
        Decoder::new(BufReader::new(file)).map_err(|e| LyricsError::Decode {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    fn queue(&mut self) -> Result<()> {
        let source = self.decode()?;
        if let Some(duration) = source.total_duration() {
            self.duration = Some(duration);
        }
        self.sink.append(source);
        Ok(())
    }

    fn measure_duration(&self) -> Result<Option<Duration>> {
        log::warn!("Duration not declared, counting samples");
        let source = self.decode()?;
        let rate = source.sample_rate() as f64 * source.channels() as f64;
        if rate == 0.0 {
            return Ok(None);
        }
        let samples = source.count() as f64;
        Ok(Some(Duration::from_secs_f64(samples / rate)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Playback for AudioEngine {
    fn play(&mut self) {
        self.sink.play();
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn is_playing(&self) -> bool {
        !self.sink.is_paused() && !self.sink.empty()
    }

    fn position(&self) -> Option<Duration> {
        Some(self.sink.get_pos())
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }
}

impl Transport for AudioEngine {
    fn restart(&mut self) -> Result<()> {
        self.sink.stop();
        self.sink = Sink::connect_new(self.stream.mixer());
        self.queue()?;
        self.sink.play();
        log::info!("Restarted {}", self.path.display());
        Ok(())
    }

    fn has_finished(&self) -> bool {
        self.sink.empty()
    }
}
