// ============================================================
// Layer 5 - ML / Model Layer (Burn)
// ============================================================
// Model, optimisation loop and the pieces the loop drives.
//
//   model.rs    - conv/pool x2 → flatten → linear x2 CNN
//   schedule.rs - piecewise-constant learning-rate schedule
//   metric.rs   - top-1 accuracy accumulator
//   trainer.rs  - epoch loop, checkpointing, validation pass
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)

/// CNN classifier architecture
pub mod model;

/// Piecewise learning-rate schedule
pub mod schedule;

/// Accuracy accumulator for validation
pub mod metric;

/// Training loop with checkpointing and validation
pub mod trainer;
