// ============================================================
// Layer 4 - Data Pipeline
// ============================================================
// Everything between the image file on disk and the tensor
// batches the training loop consumes.
//
//   image file
//       │
//       ▼
//   ImageFileLoader   → decodes, resizes, channel-first f32
//       │
//       ▼
//   ImageDataset      → Burn Dataset of exactly one item
//   ValidationDataset → Burn Dataset over the data/labels fields
//       │
//       ▼
//   *Batcher          → stacks items into ImageBatch tensors
//       │
//       ▼
//   DataLoader        → feeds batches to the training loop
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Decodes the training image with the `image` crate
pub mod loader;

/// Implements Burn's Dataset trait for training and validation
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
