use super::SelectionSet;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// User-chosen input image, immutable once loaded
#[derive(Debug, Clone)]
pub struct InputImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl InputImage {
    /// Read an image file and decode its pixel dimensions
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read input image {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "input".to_string());
        Self::from_bytes(file_name, bytes)
    }

    pub fn from_bytes(file_name: String, bytes: Vec<u8>) -> Result<Self> {
        let decoded = image::load_from_memory(&bytes).context("Failed to decode input image")?;
        Ok(Self {
            file_name,
            width: decoded.width(),
            height: decoded.height(),
            bytes,
        })
    }

    /// Width over height, used only for presentation
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Per-run state: the current input image plus outputs keyed by model.
///
/// Each submission gets a generation number; a result tagged with an older
/// generation is dropped instead of recorded, so a resubmission can never
/// collide with a stale in-flight result.
#[derive(Debug, Default)]
pub struct Session {
    image: Option<Arc<InputImage>>,
    outputs: HashMap<String, Vec<u8>>,
    generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the input image, releasing every output from earlier runs
    pub fn set_image(&mut self, image: InputImage) {
        self.image = Some(Arc::new(image));
        self.outputs.clear();
    }

    pub fn image(&self) -> Option<Arc<InputImage>> {
        self.image.clone()
    }

    /// Missing image or empty selection is a precondition, not an error
    pub fn can_submit(&self, selection: &SelectionSet) -> bool {
        self.image.is_some() && !selection.is_empty()
    }

    /// Start a new submission: clears outputs and returns the new generation
    pub fn begin_submission(&mut self) -> u64 {
        self.generation += 1;
        self.outputs.clear();
        self.generation
    }

    /// Record one model's output. Returns false when the result belongs to a
    /// stale generation and was dropped.
    pub fn record_output(&mut self, generation: u64, model: &str, bytes: Vec<u8>) -> bool {
        if generation != self.generation {
            tracing::debug!(
                "Dropping stale output for {} (generation {}, current {})",
                model,
                generation,
                self.generation
            );
            return false;
        }
        self.outputs.insert(model.to_string(), bytes);
        true
    }

    pub fn output(&self, model: &str) -> Option<&[u8]> {
        self.outputs.get(model).map(|b| b.as_slice())
    }

    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }
}
