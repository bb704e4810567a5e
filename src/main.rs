//! lyricsync - a terminal music player with time-synchronized lyrics.
//!
//! The player plays a single song and shows its lyric sheet as a scrolling
//! stack: the line being sung is wiped from left to right, the stack
//! cascades upward as lines change, and a couple of lines glow or shake.
//! Lines are selected by sampling the playback position every tick and
//! looking the `mm:ss` timestamp up in the sheet.
//!
//! Besides `play`, the binary can check, print and export lyric sheets and
//! manage the small TOML configuration file.

use clap::{CommandFactory, Parser, Subcommand, builder::PossibleValuesParser};
use clap_complete::{Generator, Shell, generate};
use std::error::Error;
use std::io;

mod cli;

#[cfg(feature = "player")]
mod player;

#[derive(Parser)]
#[command(name = "lyricsync")]
#[command(about = "Terminal music player with time-synchronized lyrics")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the song with animated lyrics
    Play {
        /// Audio file (defaults to the configured audio_file)
        audio: Option<String>,
        /// Lyric sheet file (TOML or JSON) instead of the bundled one
        #[arg(short, long)]
        sheet: Option<String>,
        /// Start over when the song ends
        #[arg(short, long = "loop")]
        looping: bool,
        /// Select the latest line at or before the position instead of exact matches
        #[arg(long)]
        floor: bool,
        /// Re-sync the lyrics when playback jumps backwards
        #[arg(long)]
        detect_rewind: bool,
    },
    /// Inspect or export lyric sheets
    Sheet {
        #[command(subcommand)]
        action: SheetAction,
    },
    /// Initialize lyricsync configuration
    Init,
    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Generate shell completions
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum SheetAction {
    /// Validate a lyric sheet (the bundled one when no file is given)
    Check { path: Option<String> },
    /// Print a lyric sheet with its timestamps
    Show { path: Option<String> },
    /// Write the bundled sheet as TOML (or JSON) for editing
    Export {
        /// Emit JSON instead of TOML
        #[arg(long)]
        json: bool,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// View current configuration
    View,
    /// Set a configuration value
    Set {
        /// Configuration key
        #[arg(value_parser = PossibleValuesParser::new(lyricsync::config::CONFIG_KEYS))]
        key: String,
        /// Configuration value
        value: String,
    },
}

fn print_completions<G: Generator>(generator: G, cmd: &mut clap::Command) {
    generate(
        generator,
        cmd,
        cmd.get_name().to_string(),
        &mut io::stdout(),
    );
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            audio,
            sheet,
            looping,
            floor,
            detect_rewind,
        } => {
            cli::play::handle_play(cli::play::PlayArgs {
                audio: audio.as_deref(),
                sheet: sheet.as_deref(),
                looping,
                floor,
                detect_rewind,
            })?;
        }
        Commands::Sheet { action } => match action {
            SheetAction::Check { path } => {
                cli::sheet::handle_check(path.as_deref())?;
            }
            SheetAction::Show { path } => {
                cli::sheet::handle_show(path.as_deref())?;
            }
            SheetAction::Export { json, output } => {
                cli::sheet::handle_export(json, output.as_deref())?;
            }
        },
        Commands::Init => {
            cli::init::handle_init()?;
        }
        Commands::Config { action } => match action {
            ConfigAction::View => {
                cli::config::handle_config_view()?;
            }
            ConfigAction::Set { key, value } => {
                cli::config::handle_config_set(&key, &value)?;
            }
        },
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            print_completions(shell, &mut cmd);
        }
    }

    Ok(())
}
