pub mod app;
pub mod audio;
pub mod ui;

use std::error::Error;

pub use app::PlayerOptions;

pub fn run(options: PlayerOptions) -> Result<(), Box<dyn Error>> {
    app::run(options)
}
