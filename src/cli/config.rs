use lyricsync::config::Config;
use std::error::Error;

pub fn handle_config_view() -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;

    println!("Current lyricsync configuration:");
    println!("  audio_file: {}", config.audio_file);
    println!(
        "  sheet_file: {}",
        config.sheet_file.as_deref().unwrap_or("(bundled)")
    );
    println!("  tick_ms: {}", config.tick_ms);
    println!("  sync_mode: {}", config.sync_mode);
    println!("  detect_rewind: {}", config.detect_rewind);
    println!("  loop_playback: {}", config.loop_playback);
    println!("  row_height: {}", config.row_height);
    println!("  line_gap: {}", config.line_gap);
    println!("  log_file: {}", config.log_file);

    Ok(())
}

pub fn handle_config_set(key: &str, value: &str) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load()?;

    config.set_value(key, value)?;
    config.save()?;

    println!("Configuration updated: {key} = {value}");

    Ok(())
}
