// ============================================================
// Layer 4 - Image Batchers
// ============================================================
// Implements Burn's Batcher trait for both loaders.
//
//   TrainingBatcher   Vec<Image>          -> ImageBatch
//   ValidationBatcher Vec<ValidationItem> -> Result<ImageBatch, SampleError>
//
// Training images carry no label of their own, so the
// training batcher pairs every image with the configured
// target class.
//
// Validation records are string fragments. Each one has to
// decode as image bytes and parse as a class index before
// it can become a tensor; the first record that does not is
// reported as a SampleError instead of a batch.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};
use image::imageops::FilterType;
use thiserror::Error;

use crate::data::dataset::ValidationItem;
use crate::data::loader::hwc_to_chw;
use crate::domain::image::Image;

// ─── ImageBatch ───────────────────────────────────────────────────────────────
/// A batch of images and class targets ready for the model.
#[derive(Debug, Clone)]
pub struct ImageBatch<B: Backend> {
    /// Shape: [batch_size, channels, height, width]
    pub images: Tensor<B, 4>,

    /// Shape: [batch_size], one class index per image
    pub targets: Tensor<B, 1, Int>,
}

impl<B: Backend> ImageBatch<B> {
    /// Stack channel-first images and their targets.
    fn from_images(images: &[Image], targets: &[i32], device: &B::Device) -> Self {
        let batch_size = images.len();
        let [c, h, w]  = images[0].shape();

        let flat: Vec<f32> = images
            .iter()
            .flat_map(|img| img.pixels.iter().copied())
            .collect();

        let images = Tensor::<B, 1>::from_floats(flat.as_slice(), device)
            .reshape([batch_size, c, h, w]);
        let targets = Tensor::<B, 1, Int>::from_ints(targets, device);

        Self { images, targets }
    }
}

// ─── SampleError ──────────────────────────────────────────────────────────────
/// Why a validation record could not be turned into tensors.
/// Clone is required: Burn's DataLoader clones batch outputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SampleError {
    /// The data fragment is not an encoded image
    #[error("validation record {index}: data {fragment:?} is not an image ({reason})")]
    NotAnImage { index: usize, fragment: String, reason: String },

    /// The label fragment is not a class index
    #[error("validation record {index}: label {fragment:?} is not a class index")]
    NotALabel { index: usize, fragment: String },
}

// ─── TrainingBatcher ──────────────────────────────────────────────────────────
#[derive(Clone, Debug)]
pub struct TrainingBatcher<B: Backend> {
    pub device:       B::Device,
    pub target_class: usize,
}

impl<B: Backend> TrainingBatcher<B> {
    pub fn new(device: B::Device, target_class: usize) -> Self {
        Self { device, target_class }
    }
}

impl<B: Backend> Batcher<Image, ImageBatch<B>> for TrainingBatcher<B> {
    fn batch(&self, items: Vec<Image>) -> ImageBatch<B> {
        let targets = vec![self.target_class as i32; items.len()];
        ImageBatch::from_images(&items, &targets, &self.device)
    }
}

// ─── ValidationBatcher ────────────────────────────────────────────────────────
#[derive(Clone, Debug)]
pub struct ValidationBatcher<B: Backend> {
    pub device: B::Device,
    pub height: usize,
    pub width:  usize,
}

impl<B: Backend> ValidationBatcher<B> {
    pub fn new(device: B::Device, height: usize, width: usize) -> Self {
        Self { device, height, width }
    }

    /// Decode one record into an image and its class index.
    fn decode(&self, item: &ValidationItem) -> Result<(Image, i32), SampleError> {
        let decoded = image::load_from_memory(item.data.as_bytes()).map_err(|e| {
            SampleError::NotAnImage {
                index:    item.index,
                fragment: item.data.clone(),
                reason:   e.to_string(),
            }
        })?;

        let label = item.label.trim().parse::<i32>().map_err(|_| SampleError::NotALabel {
            index:    item.index,
            fragment: item.label.clone(),
        })?;

        let rgb = decoded
            .resize_exact(self.width as u32, self.height as u32, FilterType::Triangle)
            .to_rgb8();
        let pixels = hwc_to_chw(rgb.as_raw(), 3, self.height, self.width);

        Ok((Image::new(pixels, 3, self.height, self.width), label))
    }
}

impl<B: Backend> Batcher<ValidationItem, Result<ImageBatch<B>, SampleError>>
    for ValidationBatcher<B>
{
    fn batch(&self, items: Vec<ValidationItem>) -> Result<ImageBatch<B>, SampleError> {
        let mut images  = Vec::with_capacity(items.len());
        let mut targets = Vec::with_capacity(items.len());

        for item in &items {
            let (image, label) = self.decode(item)?;
            images.push(image);
            targets.push(label);
        }

        Ok(ImageBatch::from_images(&images, &targets, &self.device))
    }
}
