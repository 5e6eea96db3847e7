use super::preview::{self, PreviewBackground};
use super::ResultSink;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Writes each output (and an optional preview) into a directory
pub struct DirectorySink {
    dir: PathBuf,
    preview: Option<PreviewBackground>,
}

impl DirectorySink {
    pub fn new<P: AsRef<Path>>(dir: P, preview: Option<PreviewBackground>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
        Ok(Self { dir, preview })
    }
}

impl ResultSink for DirectorySink {
    fn write_output(&mut self, model: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.dir.join(format!("no-bg-{}.png", model));
        fs::write(&path, bytes)
            .with_context(|| format!("Failed to write output for {} to {}", model, path.display()))?;

        // The file above is the untouched result; the preview is cosmetic
        if let Some(background) = self.preview {
            if background != PreviewBackground::Transparent {
                let preview_path = self.dir.join(format!("preview-{}.png", model));
                preview::composite(bytes, background)
                    .with_context(|| format!("Failed to build preview for {}", model))?
                    .save(&preview_path)
                    .with_context(|| {
                        format!("Failed to write preview to {}", preview_path.display())
                    })?;
            }
        }

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_png() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([0, 255, 0, 255]));
        let mut buf = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn writes_output_bytes_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path(), None).unwrap();

        let path = sink.write_output("rembg", b"RAW OUTPUT").unwrap();

        assert_eq!(path, dir.path().join("no-bg-rembg.png"));
        assert_eq!(fs::read(&path).unwrap(), b"RAW OUTPUT");
    }

    #[test]
    fn writes_preview_next_to_output() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink =
            DirectorySink::new(dir.path(), Some(PreviewBackground::Checkerboard)).unwrap();

        let bytes = tiny_png();
        sink.write_output("bria", &bytes).unwrap();

        // Output bytes untouched, preview written alongside
        assert_eq!(fs::read(dir.path().join("no-bg-bria.png")).unwrap(), bytes);
        assert!(dir.path().join("preview-bria.png").exists());
    }

    #[test]
    fn transparent_preview_writes_no_extra_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink =
            DirectorySink::new(dir.path(), Some(PreviewBackground::Transparent)).unwrap();

        sink.write_output("rembg", &tiny_png()).unwrap();

        assert!(!dir.path().join("preview-rembg.png").exists());
    }

    #[test]
    fn creates_missing_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("results/run-1");

        let mut sink = DirectorySink::new(&nested, None).unwrap();
        sink.write_output("rembg", b"X").unwrap();

        assert!(nested.join("no-bg-rembg.png").exists());
    }
}
