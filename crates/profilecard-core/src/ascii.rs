//! Raster image to ASCII art conversion
//!
//! Feeds the art block of [`crate::svg::SvgBuilder`].

use crate::error::CoreError;
use image::imageops::FilterType;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Character ramp from dark to bright
pub const ASCII_RAMP: &[u8] = b" .:-=+*#%@";

/// Default unsharp mask sigma
pub const DEFAULT_SHARPEN: f32 = 3.0;

/// Conversion settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsciiOptions {
    /// Output width in characters
    pub width: u32,
    /// Output height in lines
    pub height: u32,
    /// Luminance multiplier applied before mapping
    pub brightness: f32,
    /// Unsharp mask sigma, applied before resizing. `0.0` disables it.
    pub sharpen: f32,
}

impl Default for AsciiOptions {
    fn default() -> Self {
        Self {
            width: 80,
            height: 34,
            brightness: 1.5,
            sharpen: DEFAULT_SHARPEN,
        }
    }
}

impl AsciiOptions {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.width == 0 || self.height == 0 {
            return Err(CoreError::InvalidConfig {
                message: format!("ascii size must be non-zero, got {}x{}", self.width, self.height),
            });
        }
        if !self.brightness.is_finite() || self.brightness < 0.0 {
            return Err(CoreError::InvalidConfig {
                message: format!("ascii brightness must be >= 0, got {}", self.brightness),
            });
        }
        if !self.sharpen.is_finite() || self.sharpen < 0.0 {
            return Err(CoreError::InvalidConfig {
                message: format!("ascii sharpen sigma must be >= 0, got {}", self.sharpen),
            });
        }
        Ok(())
    }
}

/// Load the image at `path` and convert it
pub fn image_to_ascii(path: &Path, options: &AsciiOptions) -> Result<String, CoreError> {
    options.validate()?;

    let image = image::open(path).map_err(|source| CoreError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "Loaded image for ASCII conversion"
    );

    Ok(render_ascii(&image, options))
}

/// Convert an in-memory image. `options` are assumed valid.
pub fn render_ascii(image: &DynamicImage, options: &AsciiOptions) -> String {
    let mut gray = image.grayscale();
    if options.sharpen > 0.0 {
        gray = gray.unsharpen(options.sharpen, 0);
    }
    let luma = gray
        .resize_exact(options.width, options.height, FilterType::Triangle)
        .to_luma8();

    let mut lines = Vec::with_capacity(options.height as usize);
    for y in 0..luma.height() {
        let line: String = (0..luma.width())
            .map(|x| ramp_char(luma.get_pixel(x, y).0[0], options.brightness))
            .collect();
        lines.push(line);
    }
    lines.join("\n")
}

fn ramp_char(luminance: u8, brightness: f32) -> char {
    let value = (luminance as f32 * brightness).clamp(0.0, 255.0);
    let index = (value as usize * (ASCII_RAMP.len() - 1)) / 255;
    ASCII_RAMP[index] as char
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};
    use tempfile::TempDir;

    fn options(width: u32, height: u32, brightness: f32) -> AsciiOptions {
        AsciiOptions {
            width,
            height,
            brightness,
            sharpen: 0.0,
        }
    }

    fn save_gray(
        dir: &TempDir,
        name: &str,
        width: u32,
        height: u32,
        value: u8,
    ) -> std::path::PathBuf {
        let path = dir.path().join(name);
        GrayImage::from_pixel(width, height, Luma([value]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_ramp_endpoints() {
        assert_eq!(ramp_char(0, 1.0), ' ');
        assert_eq!(ramp_char(255, 1.0), '@');
        // Brightness saturates
        assert_eq!(ramp_char(200, 3.0), '@');
    }

    #[test]
    fn test_brightness_shifts_ramp() {
        assert_eq!(ramp_char(100, 1.0), '-');
        assert_eq!(ramp_char(100, 1.5), '+');
    }

    #[test]
    fn test_output_dimensions() {
        let dir = TempDir::new().unwrap();
        let path = save_gray(&dir, "white.png", 8, 8, 255);

        let art = image_to_ascii(&path, &options(4, 2, 1.0)).unwrap();

        assert_eq!(art, "@@@@\n@@@@");
    }

    #[test]
    fn test_black_image_is_blank() {
        let dir = TempDir::new().unwrap();
        let path = save_gray(&dir, "black.png", 3, 3, 0);

        let art = image_to_ascii(&path, &options(3, 3, 1.5)).unwrap();

        assert_eq!(art.lines().count(), 3);
        assert!(art.lines().all(|l| l == "   "));
    }

    #[test]
    fn test_missing_image_is_error() {
        let dir = TempDir::new().unwrap();
        let err = image_to_ascii(&dir.path().join("nope.png"), &AsciiOptions::default())
            .unwrap_err();
        assert!(matches!(err, CoreError::Image { .. }));
    }

    #[test]
    fn test_invalid_options_rejected() {
        assert!(options(0, 10, 1.0).validate().is_err());
        assert!(options(10, 10, -1.0).validate().is_err());
        assert!(AsciiOptions::default().validate().is_ok());
        assert_eq!(AsciiOptions::default().width, 80);
        assert_eq!(AsciiOptions::default().height, 34);
    }

    #[test]
    fn test_sharpen_defaults_on_and_zero_disables() {
        assert_eq!(AsciiOptions::default().sharpen, DEFAULT_SHARPEN);
        let mut opts = options(2, 2, 1.0);
        assert!(opts.validate().is_ok());
        opts.sharpen = -1.0;
        assert!(opts.validate().is_err());

        // Uniform input stays uniform with the default sharpening
        let dir = TempDir::new().unwrap();
        let path = save_gray(&dir, "white.png", 6, 6, 255);
        let opts = AsciiOptions {
            width: 3,
            height: 2,
            ..AsciiOptions::default()
        };
        let art = image_to_ascii(&path, &opts).unwrap();
        assert_eq!(art, "@@@\n@@@");
    }
}
