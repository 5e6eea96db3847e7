mod files;
mod preview;

pub use files::DirectorySink;
pub use preview::PreviewBackground;

use anyhow::Result;
use std::path::PathBuf;

/// Trait for result destinations
pub trait ResultSink {
    /// Persist one model's output; returns where it landed
    fn write_output(&mut self, model: &str, bytes: &[u8]) -> Result<PathBuf>;
}
