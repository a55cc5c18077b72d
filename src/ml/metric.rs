// ============================================================
// Layer 5 - Accuracy Accumulator
// ============================================================
// Collects top-1 hits across validation batches and reduces
// them to one number at the end:
//
//   reset()              → counters back to zero
//   update(logits, tgt)  → argmax per row, count matches
//   accumulate()         → correct / total (0.0 if empty)

use burn::prelude::*;

#[derive(Debug, Default, Clone)]
pub struct Accuracy {
    correct: usize,
    total:   usize,
}

impl Accuracy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.correct = 0;
        self.total   = 0;
    }

    /// logits: [batch, num_classes], targets: [batch]
    pub fn update<B: Backend>(&mut self, logits: Tensor<B, 2>, targets: Tensor<B, 1, Int>) {
        // argmax(1) returns [batch, 1]; flatten to [batch] before comparing
        let predicted = logits.argmax(1).flatten::<1>(0, 1);
        let batch     = targets.dims()[0];

        let hits: i64 = predicted
            .equal(targets)
            .int()
            .sum()
            .into_scalar()
            .elem::<i64>();

        self.correct += hits as usize;
        self.total   += batch;
    }

    pub fn accumulate(&self) -> f64 {
        if self.total > 0 {
            self.correct as f64 / self.total as f64
        } else {
            0.0
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_empty_accuracy_is_zero() {
        assert_eq!(Accuracy::new().accumulate(), 0.0);
    }

    #[test]
    fn test_counts_top1_hits_across_batches() {
        let device = Default::default();
        let mut acc = Accuracy::new();

        // Row maxima at classes 1 and 0
        let logits  = Tensor::<TestBackend, 2>::from_floats([[0.1, 0.9], [0.8, 0.2]], &device);
        let targets = Tensor::<TestBackend, 1, Int>::from_ints([1, 1], &device);
        acc.update(logits, targets);
        assert_eq!(acc.accumulate(), 0.5);

        let logits  = Tensor::<TestBackend, 2>::from_floats([[0.0, 1.0], [0.0, 1.0]], &device);
        let targets = Tensor::<TestBackend, 1, Int>::from_ints([1, 1], &device);
        acc.update(logits, targets);
        assert_eq!(acc.total(), 4);
        assert_eq!(acc.accumulate(), 0.75);
    }

    #[test]
    fn test_reset_clears_counters() {
        let device = Default::default();
        let mut acc = Accuracy::new();
        let logits  = Tensor::<TestBackend, 2>::from_floats([[0.0, 1.0]], &device);
        let targets = Tensor::<TestBackend, 1, Int>::from_ints([1], &device);
        acc.update(logits, targets);
        assert_eq!(acc.accumulate(), 1.0);

        acc.reset();
        assert_eq!(acc.total(), 0);
        assert_eq!(acc.accumulate(), 0.0);
    }
}
