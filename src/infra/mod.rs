// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// Cross-cutting file output that the training loop calls
// into but does not own:
//
//   checkpoint.rs - model weights via Burn's CompactRecorder,
//                   plus the run config as JSON
//
//   scalars.rs    - named scalar series (train/loss,
//                   eval/accuracy) appended to a CSV log
//
// Reference: Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving
pub mod checkpoint;

/// Scalar series log writer
pub mod scalars;
