use crate::error::{QuantizeError, Result};
use std::fmt;
use std::str::FromStr;

/// How the starting centroids are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitMode {
    /// k samples taken from a random permutation of the population
    #[default]
    RandomSampling,
    /// k evenly spaced packed indices between the population min and max
    UniformSelection,
    /// k draws weighted by population density over packed-index bins
    StratifiedSampling,
}

impl InitMode {
    pub const ALL: [InitMode; 3] = [
        InitMode::RandomSampling,
        InitMode::UniformSelection,
        InitMode::StratifiedSampling,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            InitMode::RandomSampling => "random",
            InitMode::UniformSelection => "uniform",
            InitMode::StratifiedSampling => "stratified",
        }
    }
}

impl fmt::Display for InitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InitMode {
    type Err = QuantizeError;

    fn from_str(s: &str) -> Result<Self> {
        InitMode::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                QuantizeError::InvalidParameter(format!("unknown initialization mode '{}'", s))
            })
    }
}

/// How the engine decides to stop iterating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConvergenceMode {
    /// Stop after a fixed number of iterations
    #[default]
    IterationLimit,
    /// Stop on the mean squared centroid shift
    Stability,
    /// Stop on the signal-to-noise ratio of the reconstruction
    NoiseRatio,
}

impl ConvergenceMode {
    pub const ALL: [ConvergenceMode; 3] = [
        ConvergenceMode::IterationLimit,
        ConvergenceMode::Stability,
        ConvergenceMode::NoiseRatio,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ConvergenceMode::IterationLimit => "iterations",
            ConvergenceMode::Stability => "stability",
            ConvergenceMode::NoiseRatio => "noise",
        }
    }

    /// Whether `threshold` takes part in the stopping decision
    pub fn uses_threshold(&self) -> bool {
        !matches!(self, ConvergenceMode::IterationLimit)
    }
}

impl fmt::Display for ConvergenceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConvergenceMode {
    type Err = QuantizeError;

    fn from_str(s: &str) -> Result<Self> {
        ConvergenceMode::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                QuantizeError::InvalidParameter(format!("unknown convergence mode '{}'", s))
            })
    }
}

/// Configuration for a color quantization run
#[derive(Debug, Clone)]
pub struct QuantizeConfig {
    /// Number of colors in the output palette
    pub k: usize,

    /// Centroid initialization strategy
    pub init_mode: InitMode,

    /// Stopping strategy
    pub convergence_mode: ConvergenceMode,

    /// Maximum number of iterations. Every convergence mode honours it.
    pub max_iters: usize,

    /// Threshold for the stability and noise modes. Ignored by the
    /// iteration limit.
    pub threshold: f64,

    /// Random seed for the randomized initializations.
    /// `None` seeds from OS entropy, so runs are not reproducible.
    pub seed: Option<u64>,
}

impl Default for QuantizeConfig {
    fn default() -> Self {
        Self {
            k: 8,
            init_mode: InitMode::default(),
            convergence_mode: ConvergenceMode::default(),
            max_iters: 25,
            threshold: 0.0,
            seed: None,
        }
    }
}

impl QuantizeConfig {
    /// Create a new configuration with the specified number of colors
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Default::default()
        }
    }

    /// Set the initialization strategy
    pub fn with_init_mode(mut self, mode: InitMode) -> Self {
        self.init_mode = mode;
        self
    }

    /// Set the convergence strategy
    pub fn with_convergence_mode(mut self, mode: ConvergenceMode) -> Self {
        self.convergence_mode = mode;
        self
    }

    /// Set the maximum number of iterations
    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Set the stability / noise threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the parameters that do not depend on the image
    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(QuantizeError::InvalidK(
                "k must be greater than 0".to_string(),
            ));
        }

        if self.max_iters == 0 {
            return Err(QuantizeError::InvalidParameter(
                "max_iters must be greater than 0".to_string(),
            ));
        }

        if self.convergence_mode.uses_threshold() && self.threshold.is_nan() {
            return Err(QuantizeError::InvalidParameter(format!(
                "{} convergence needs a numeric threshold",
                self.convergence_mode
            )));
        }

        if self.init_mode == InitMode::UniformSelection && self.k < 2 {
            return Err(QuantizeError::IncompatibleInitialization {
                mode: self.init_mode.name(),
                k: self.k,
                reason: "uniform selection needs at least 2 centroids".to_string(),
            });
        }

        Ok(())
    }
}
