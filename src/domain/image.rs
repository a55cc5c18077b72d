// ============================================================
// Layer 3 - Image Domain Type
// ============================================================
// A single decoded image held in memory.
//
// Pixels are stored channel-first ([C, H, W]) as f32 in [0, 1],
// which is the layout Burn's Conv2d expects once a batch
// dimension is put in front.
//
// Reference: Rust Book §5 (Structs and Methods)

use serde::{Deserialize, Serialize};

/// An in-memory image in channel-first layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    /// Flat pixel buffer, length = channels * height * width
    pub pixels:   Vec<f32>,
    pub channels: usize,
    pub height:   usize,
    pub width:    usize,
}

impl Image {
    /// Build an image from a channel-first buffer.
    /// The buffer length is not checked against the dimensions.
    pub fn new(pixels: Vec<f32>, channels: usize, height: usize, width: usize) -> Self {
        Self { pixels, channels, height, width }
    }

    /// Shape as [channels, height, width]
    pub fn shape(&self) -> [usize; 3] {
        [self.channels, self.height, self.width]
    }

    /// Number of scalar values the dimensions describe
    pub fn numel(&self) -> usize {
        self.channels * self.height * self.width
    }
}
