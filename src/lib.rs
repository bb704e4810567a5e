pub mod animator;
pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod lyrics;
pub mod sampler;
pub mod sync;
pub mod tween;
