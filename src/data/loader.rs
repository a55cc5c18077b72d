// ============================================================
// Layer 4 - Image Loader
// ============================================================
// Reads one image file from disk with the `image` crate.
//
// Any format the crate was built with (png, jpeg, bmp, gif)
// is accepted. The decoded picture is converted to RGB,
// resized to the model's input size and flattened into a
// channel-first f32 buffer scaled to [0, 1]:
//
//   HWC u8  [r, g, b, r, g, b, ...]
//       │
//       ▼
//   CHW f32 [r, r, ..., g, g, ..., b, b, ...] / 255
//
// Reference: image crate documentation
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use image::{imageops::FilterType, GenericImageView};
use std::path::{Path, PathBuf};

use crate::domain::image::Image;
use crate::domain::traits::ImageSource;

/// Loads a single image file from a fixed path.
/// Implements the ImageSource trait from Layer 3.
pub struct ImageFileLoader {
    path: PathBuf,
}

impl ImageFileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ImageSource for ImageFileLoader {
    fn load(&self, height: usize, width: usize) -> Result<Image> {
        let decoded = image::open(&self.path)
            .with_context(|| format!("Cannot read image '{}'", self.path.display()))?;

        tracing::debug!(
            "Decoded '{}' ({}x{}), resizing to {}x{}",
            self.path.display(),
            decoded.width(),
            decoded.height(),
            width,
            height,
        );

        let rgb = decoded
            .resize_exact(width as u32, height as u32, FilterType::Triangle)
            .to_rgb8();

        Ok(Image::new(hwc_to_chw(rgb.as_raw(), 3, height, width), 3, height, width))
    }
}

/// Reorder an interleaved u8 buffer into planar f32 in [0, 1].
pub(crate) fn hwc_to_chw(raw: &[u8], channels: usize, height: usize, width: usize) -> Vec<f32> {
    let plane = height * width;
    let mut out = vec![0.0f32; channels * plane];
    for (i, px) in raw.chunks_exact(channels).enumerate() {
        for (c, &v) in px.iter().enumerate() {
            out[c * plane + i] = v as f32 / 255.0;
        }
    }
    out
}
