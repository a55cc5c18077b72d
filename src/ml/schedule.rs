// ============================================================
// Layer 5 - Piecewise Learning-Rate Schedule
// ============================================================
// Holds the learning rate constant inside each interval and
// jumps to the next value once the step count reaches a
// boundary:
//
//   boundaries = [b0, b1]     values = [v0, v1, v2]
//
//   step  0 .. b0   → v0
//   step b0 .. b1   → v1
//   step b1 ..      → v2
//
// With no boundaries and a single value this is a constant
// schedule, which is the default for a training run.
//
// Implements Burn's LrScheduler so the schedule state could
// be stored alongside an optimiser record.

use burn::{
    lr_scheduler::LrScheduler,
    prelude::*,
    LearningRate,
};

#[derive(Config, Debug)]
pub struct PiecewiseDecayConfig {
    /// Step indices at which the next value takes over, strictly increasing
    pub boundaries: Vec<usize>,
    /// One more entry than `boundaries`
    pub values:     Vec<LearningRate>,
}

impl PiecewiseDecayConfig {
    /// A single-piece schedule that always returns `lr`.
    pub fn constant(lr: LearningRate) -> Self {
        Self::new(Vec::new(), vec![lr])
    }

    pub fn init(&self) -> Result<PiecewiseDecay, String> {
        if self.values.len() != self.boundaries.len() + 1 {
            return Err(format!(
                "Piecewise schedule needs {} values for {} boundaries, got {}",
                self.boundaries.len() + 1,
                self.boundaries.len(),
                self.values.len(),
            ));
        }
        if self.boundaries.windows(2).any(|w| w[0] >= w[1]) {
            return Err("Piecewise schedule boundaries must be strictly increasing".into());
        }

        Ok(PiecewiseDecay {
            boundaries: self.boundaries.clone(),
            values:     self.values.clone(),
            iter_idx:   -1,
        })
    }
}

#[derive(Clone, Debug)]
pub struct PiecewiseDecay {
    boundaries: Vec<usize>,
    values:     Vec<LearningRate>,
    // Index of the last step taken, -1 before the first one.
    iter_idx:   i32,
}

impl PiecewiseDecay {
    /// Learning rate for the step most recently taken (or the first one).
    pub fn current(&self) -> LearningRate {
        self.value_at(self.iter_idx.max(0) as usize)
    }

    fn value_at(&self, step: usize) -> LearningRate {
        let piece = self.boundaries.iter().take_while(|&&b| b <= step).count();
        self.values[piece]
    }
}

impl LrScheduler for PiecewiseDecay {
    type Record<B: Backend> = i32;

    fn step(&mut self) -> LearningRate {
        self.iter_idx += 1;
        self.value_at(self.iter_idx as usize)
    }

    fn to_record<B: Backend>(&self) -> Self::Record<B> {
        self.iter_idx
    }

    fn load_record<B: Backend>(mut self, record: Self::Record<B>) -> Self {
        self.iter_idx = record;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_schedule() {
        let mut sched = PiecewiseDecayConfig::constant(1e-3).init().unwrap();
        for _ in 0..5 {
            assert_eq!(sched.step(), 1e-3);
        }
    }

    #[test]
    fn test_values_switch_at_boundaries() {
        let mut sched = PiecewiseDecayConfig::new(vec![2, 4], vec![0.1, 0.01, 0.001])
            .init()
            .unwrap();
        let lrs: Vec<f64> = (0..6).map(|_| sched.step()).collect();
        assert_eq!(lrs, vec![0.1, 0.1, 0.01, 0.01, 0.001, 0.001]);
        assert_eq!(sched.current(), 0.001);
    }

    #[test]
    fn test_current_before_first_step() {
        let sched = PiecewiseDecayConfig::new(vec![1], vec![0.5, 0.25]).init().unwrap();
        assert_eq!(sched.current(), 0.5);
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        assert!(PiecewiseDecayConfig::new(vec![2], vec![0.1]).init().is_err());
        assert!(PiecewiseDecayConfig::new(vec![], vec![]).init().is_err());
    }

    #[test]
    fn test_unsorted_boundaries_rejected() {
        assert!(PiecewiseDecayConfig::new(vec![4, 2], vec![0.1, 0.01, 0.001])
            .init()
            .is_err());
    }
}
