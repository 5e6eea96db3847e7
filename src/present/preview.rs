use anyhow::{Context, Result};
use clap::ValueEnum;
use image::{Rgba, RgbaImage};

/// Cosmetic backdrop for preview renders; never alters the output bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PreviewBackground {
    Checkerboard,
    White,
    Black,
    Transparent,
}

const CHECKER_TILE: u32 = 16;
const CHECKER_LIGHT: Rgba<u8> = Rgba([204, 204, 204, 255]);
const CHECKER_DARK: Rgba<u8> = Rgba([153, 153, 153, 255]);

/// Composite a processed image over the chosen backdrop.
///
/// The backdrop matches the output's own dimensions, so the preview keeps
/// the input's aspect ratio. Transparent returns the decoded image as is.
pub fn composite(output_bytes: &[u8], background: PreviewBackground) -> Result<RgbaImage> {
    let foreground = image::load_from_memory(output_bytes)
        .context("Failed to decode model output")?
        .to_rgba8();

    let (width, height) = foreground.dimensions();
    let mut canvas = match background {
        PreviewBackground::Transparent => return Ok(foreground),
        PreviewBackground::White => {
            RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]))
        }
        PreviewBackground::Black => RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255])),
        PreviewBackground::Checkerboard => RgbaImage::from_fn(width, height, |x, y| {
            if ((x / CHECKER_TILE) + (y / CHECKER_TILE)) % 2 == 0 {
                CHECKER_LIGHT
            } else {
                CHECKER_DARK
            }
        }),
    };

    // Straight alpha blend of the output over the backdrop
    for (x, y, pixel) in foreground.enumerate_pixels() {
        let alpha = pixel[3] as f32 / 255.0;
        let base = canvas.get_pixel(x, y);
        canvas.put_pixel(
            x,
            y,
            Rgba([
                blend(pixel[0], base[0], alpha),
                blend(pixel[1], base[1], alpha),
                blend(pixel[2], base[2], alpha),
                255,
            ]),
        );
    }

    Ok(canvas)
}

fn blend(fg: u8, bg: u8, alpha: f32) -> u8 {
    (fg as f32 * alpha + bg as f32 * (1.0 - alpha)).clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_with_alpha(alpha: u8) -> Vec<u8> {
        let img = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, alpha]));
        let mut buf = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn transparent_leaves_pixels_untouched() {
        let out = composite(&png_with_alpha(128), PreviewBackground::Transparent).unwrap();
        assert_eq!(*out.get_pixel(0, 0), Rgba([255, 0, 0, 128]));
    }

    #[test]
    fn fully_transparent_pixel_shows_white_backdrop() {
        let out = composite(&png_with_alpha(0), PreviewBackground::White).unwrap();
        assert_eq!(*out.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn opaque_pixel_hides_the_backdrop() {
        let out = composite(&png_with_alpha(255), PreviewBackground::Black).unwrap();
        assert_eq!(*out.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn checkerboard_alternates_tiles() {
        // Large transparent image so neighboring tiles are visible
        let img = RgbaImage::from_pixel(64, 64, Rgba([0, 0, 0, 0]));
        let mut buf = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();

        let out = composite(&buf.into_inner(), PreviewBackground::Checkerboard).unwrap();
        assert_eq!(*out.get_pixel(0, 0), CHECKER_LIGHT);
        assert_eq!(*out.get_pixel(CHECKER_TILE, 0), CHECKER_DARK);
        assert_eq!(*out.get_pixel(CHECKER_TILE, CHECKER_TILE), CHECKER_LIGHT);
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        assert!(composite(b"not a png", PreviewBackground::White).is_err());
    }
}
