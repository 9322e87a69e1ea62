use crate::algorithm::ClusterState;
use crate::config::ConvergenceMode;
use crate::distance::{mean_centroid_shift, signal_to_noise};

/// Decides when the clustering loop stops.
///
/// Each check records the scalar it based the decision on, readable through
/// [`ConvergenceStrategy::measure`] for reporting.
pub trait ConvergenceStrategy {
    /// Inspect the state after an update step. `true` stops the loop.
    fn should_stop(&mut self, state: &ClusterState<'_>) -> bool;

    /// Measure recorded by the last call to `should_stop`
    fn measure(&self) -> f64;

    /// The configuration mode this strategy implements
    fn mode(&self) -> ConvergenceMode;
}

impl ConvergenceMode {
    /// Build the strategy for this mode. `threshold` is ignored by the
    /// iteration limit.
    pub fn strategy(&self, max_iters: usize, threshold: f64) -> Box<dyn ConvergenceStrategy> {
        match self {
            ConvergenceMode::IterationLimit => Box::new(IterationLimit::new(max_iters)),
            ConvergenceMode::Stability => Box::new(Stability::new(threshold, max_iters)),
            ConvergenceMode::NoiseRatio => Box::new(NoiseRatio::new(threshold, max_iters)),
        }
    }
}

/// Stop after `max_iters` iterations
#[derive(Debug, Clone)]
pub struct IterationLimit {
    max_iters: usize,
    measure: f64,
}

impl IterationLimit {
    pub fn new(max_iters: usize) -> Self {
        Self {
            max_iters,
            measure: 0.0,
        }
    }
}

impl ConvergenceStrategy for IterationLimit {
    fn should_stop(&mut self, state: &ClusterState<'_>) -> bool {
        self.measure = state.iteration as f64;
        state.iteration >= self.max_iters
    }

    fn measure(&self) -> f64 {
        self.measure
    }

    fn mode(&self) -> ConvergenceMode {
        ConvergenceMode::IterationLimit
    }
}

/// Stop when the mean squared shift between matched centroids exceeds the
/// threshold, or at the iteration limit.
///
/// The comparison is `shift > threshold`: a large movement stops the run.
#[derive(Debug, Clone)]
pub struct Stability {
    threshold: f64,
    max_iters: usize,
    measure: f64,
}

impl Stability {
    pub fn new(threshold: f64, max_iters: usize) -> Self {
        Self {
            threshold,
            max_iters,
            measure: 0.0,
        }
    }
}

impl ConvergenceStrategy for Stability {
    fn should_stop(&mut self, state: &ClusterState<'_>) -> bool {
        // T2[i] is the update of T1[i]
        self.measure = mean_centroid_shift(state.before, state.after);
        self.measure > self.threshold || state.iteration >= self.max_iters
    }

    fn measure(&self) -> f64 {
        self.measure
    }

    fn mode(&self) -> ConvergenceMode {
        ConvergenceMode::Stability
    }
}

/// Stop when total signal over total noise against the updated centroids
/// exceeds the threshold, or at the iteration limit.
///
/// Zero total noise yields an infinite ratio and stops immediately.
#[derive(Debug, Clone)]
pub struct NoiseRatio {
    threshold: f64,
    max_iters: usize,
    measure: f64,
}

impl NoiseRatio {
    pub fn new(threshold: f64, max_iters: usize) -> Self {
        Self {
            threshold,
            max_iters,
            measure: 0.0,
        }
    }
}

impl ConvergenceStrategy for NoiseRatio {
    fn should_stop(&mut self, state: &ClusterState<'_>) -> bool {
        // `after` always holds k >= 1 centroids once the engine is iterating
        self.measure = signal_to_noise(state.samples, state.after).unwrap_or(f64::INFINITY);
        self.measure > self.threshold || state.iteration >= self.max_iters
    }

    fn measure(&self) -> f64 {
        self.measure
    }

    fn mode(&self) -> ConvergenceMode {
        ConvergenceMode::NoiseRatio
    }
}
