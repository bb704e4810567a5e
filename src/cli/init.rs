use lyricsync::config::Config;
use std::error::Error;

pub fn handle_init() -> Result<(), Box<dyn Error>> {
    if Config::exists()? {
        return Err("lyricsync is already initialized. Use 'lyricsync config set <key> <value>' to change settings.".into());
    }

    let config = Config::new();
    config.save()?;

    println!("lyricsync initialized successfully!");
    println!(
        "Configuration saved to: {}",
        Config::config_path()?.display()
    );
    println!("Audio file: {}", config.audio_file);

    Ok(())
}
