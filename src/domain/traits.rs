// ============================================================
// Layer 3 - Core Traits (Abstractions)
// ============================================================
// The application layer asks for "an image" without knowing
// whether it came from a file, memory or anywhere else.
//
// Implementations:
//   - ImageFileLoader -> decodes one image file from disk
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use crate::domain::image::Image;

// ─── ImageSource ──────────────────────────────────────────────────────────────
/// Any component that can produce the single training image.
pub trait ImageSource {
    /// Load the image, resized to `height x width` RGB.
    fn load(&self, height: usize, width: usize) -> Result<Image>;
}
