use lyricsync::config::Config;
use lyricsync::sync::SyncMode;
use std::error::Error;

/// Command line overrides for a play session.
#[derive(Debug, Default)]
pub struct PlayArgs<'a> {
    pub audio: Option<&'a str>,
    pub sheet: Option<&'a str>,
    pub looping: bool,
    pub floor: bool,
    pub detect_rewind: bool,
}

pub fn apply_overrides(config: &mut Config, args: &PlayArgs) {
    if let Some(audio) = args.audio {
        config.audio_file = audio.to_string();
    }
    if let Some(sheet) = args.sheet {
        config.sheet_file = Some(sheet.to_string());
    }
    if args.looping {
        config.loop_playback = true;
    }
    if args.floor {
        config.sync_mode = SyncMode::Floor;
    }
    if args.detect_rewind {
        config.detect_rewind = true;
    }
}

pub fn handle_play(args: PlayArgs) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load()?;
    apply_overrides(&mut config, &args);

    #[cfg(feature = "player")]
    {
        crate::player::run(crate::player::PlayerOptions {
            audio_file: config.audio_file.clone(),
            sheet_file: config.sheet_file.clone(),
            config,
        })
    }

    #[cfg(not(feature = "player"))]
    {
        use owo_colors::OwoColorize;
        let _ = config;
        println!("{} {}", "🎵".cyan(), "Lyric Player".bold());
        println!();
        println!(
            "{} The player requires the 'player' feature to be enabled.",
            "Note:".yellow()
        );
        println!();
        println!("To enable it, build with:");
        println!("  {}", "cargo build --release --features player".cyan());

        Ok(())
    }
}
