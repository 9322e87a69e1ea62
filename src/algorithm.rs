use crate::color::ColorSample;
use crate::config::QuantizeConfig;
use crate::convergence::ConvergenceStrategy;
use crate::distance::{find_nearest_centroids, repaint_indices};
use crate::error::{QuantizeError, Result};
use crate::grid::ImageSource;
use crate::init::InitializationStrategy;
use log::{debug, info};
use ndarray::{Array1, Array2};
use rand::RngCore;
use std::time::Instant;

/// Read-only view of the engine handed to convergence strategies
#[derive(Debug, Clone, Copy)]
pub struct ClusterState<'a> {
    /// Number of clusters
    pub k: usize,
    /// Every sample of the image, one per pixel
    pub samples: &'a [ColorSample],
    /// Centroids at the start of the current iteration (T1)
    pub before: &'a [ColorSample],
    /// Updated centroids (T2); position i is the update of `before[i]`
    pub after: &'a [ColorSample],
    /// Current iteration, starting at 1
    pub iteration: usize,
}

/// Lifecycle of a [`ClusteringEngine`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    Initialized,
    Iterating,
    Converged,
}

impl EngineState {
    pub fn name(&self) -> &'static str {
        match self {
            EngineState::Uninitialized => "uninitialized",
            EngineState::Initialized => "initialized",
            EngineState::Iterating => "iterating",
            EngineState::Converged => "converged",
        }
    }
}

/// One clustering run over one image.
///
/// Call [`run`](Self::run) (or [`initialize`](Self::initialize) followed by
/// repeated [`step`](Self::step)) and then [`reconstruct`](Self::reconstruct)
/// to obtain the filtered image.
pub struct ClusteringEngine<'a, I: ImageSource> {
    image: &'a I,
    k: usize,
    samples: Vec<ColorSample>,
    initializer: Box<dyn InitializationStrategy>,
    convergence: Box<dyn ConvergenceStrategy>,
    before: Vec<ColorSample>,
    after: Vec<ColorSample>,
    classification: Vec<Vec<usize>>,
    iteration: usize,
    measure: f64,
    state: EngineState,
}

impl<'a, I: ImageSource> ClusteringEngine<'a, I> {
    /// Validate the configuration against the image and derive the sample
    /// population.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration is invalid (see [`QuantizeConfig::validate`])
    /// - The image has no pixels
    /// - k exceeds the number of pixels
    pub fn new(config: &QuantizeConfig, image: &'a I) -> Result<Self> {
        config.validate()?;

        if image.is_empty() {
            return Err(QuantizeError::EmptyImage);
        }

        let samples = image.to_samples();
        if samples.len() < config.k {
            return Err(QuantizeError::InsufficientData(format!(
                "Number of samples ({}) is less than k ({})",
                samples.len(),
                config.k
            )));
        }

        Ok(Self {
            image,
            k: config.k,
            samples,
            initializer: config.init_mode.strategy(),
            convergence: config
                .convergence_mode
                .strategy(config.max_iters, config.threshold),
            before: Vec::new(),
            after: Vec::new(),
            classification: Vec::new(),
            iteration: 1,
            measure: 0.0,
            state: EngineState::Uninitialized,
        })
    }

    fn expect_state(&self, allowed: &[EngineState], expected: &'static str) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(QuantizeError::InvalidState {
                expected,
                found: self.state.name(),
            })
        }
    }

    /// Select the starting centroids
    pub fn initialize(&mut self, rng: &mut dyn RngCore) -> Result<()> {
        self.expect_state(&[EngineState::Uninitialized], "uninitialized")?;

        let centroids = self.initializer.select(&self.samples, self.k, rng)?;
        if centroids.len() != self.k {
            return Err(QuantizeError::IncompatibleInitialization {
                mode: self.initializer.mode().name(),
                k: self.k,
                reason: format!("strategy produced {} centroids", centroids.len()),
            });
        }

        self.before = centroids;
        self.state = EngineState::Initialized;
        Ok(())
    }

    /// Run one classify / update / check pass. Returns `true` once the
    /// convergence strategy stops the run.
    pub fn step(&mut self) -> Result<bool> {
        self.expect_state(
            &[EngineState::Initialized, EngineState::Iterating],
            "initialized or iterating",
        )?;
        self.state = EngineState::Iterating;
        let iter_start = Instant::now();

        let labels = self.classify()?;
        let empty_clusters = self.update(&labels);

        let stop = self.convergence.should_stop(&ClusterState {
            k: self.k,
            samples: &self.samples,
            before: &self.before,
            after: &self.after,
            iteration: self.iteration,
        });
        self.measure = self.convergence.measure();

        debug!(
            "  Iteration {}: measure = {:.6}, empty clusters = {}, time = {:.4}s",
            self.iteration,
            self.measure,
            empty_clusters,
            iter_start.elapsed().as_secs_f64()
        );

        // T1 := T2 whether or not the run stops
        self.before.clone_from(&self.after);

        if stop {
            self.state = EngineState::Converged;
            info!(
                "Converged after {} iterations ({} measure = {:.6})",
                self.iteration,
                self.convergence.mode(),
                self.measure
            );
        } else {
            self.iteration += 1;
        }

        Ok(stop)
    }

    /// Initialize if needed, then iterate until the convergence strategy
    /// stops. Every strategy carries an iteration limit, so the loop is
    /// bounded.
    pub fn run(&mut self, rng: &mut dyn RngCore) -> Result<()> {
        if self.state == EngineState::Uninitialized {
            info!(
                "Clustering {} samples into {} colors ({} init, {} convergence)",
                self.samples.len(),
                self.k,
                self.initializer.mode(),
                self.convergence.mode()
            );
            self.initialize(rng)?;
        }

        while !self.step()? {}
        Ok(())
    }

    /// Repaint every pixel of the source image with its nearest final
    /// centroid.
    pub fn reconstruct(&self) -> Result<I> {
        self.expect_state(&[EngineState::Converged], "converged")?;

        let pixels: Vec<u32> = (0..self.image.len())
            .map(|offset| self.image.color_at(offset))
            .collect();
        let painted = repaint_indices(&pixels, &self.before)?;

        I::from_indices(self.image.width(), self.image.height(), painted)
    }

    /// Assign every sample to its nearest T1 centroid and rebuild the
    /// classification. Returns the per-sample labels.
    fn classify(&mut self) -> Result<Vec<usize>> {
        let labels = find_nearest_centroids(&self.samples, &self.before)?;

        let mut groups = vec![Vec::new(); self.k];
        for (pos, &label) in labels.iter().enumerate() {
            groups[label].push(pos);
        }
        self.classification = groups;

        Ok(labels)
    }

    /// Build T2 from the group means, in T1 order. An empty group keeps its
    /// T1 centroid. Returns the number of empty groups.
    fn update(&mut self, labels: &[usize]) -> usize {
        let mut cluster_sums: Array2<f64> = Array2::zeros((self.k, 3));
        let mut cluster_counts: Array1<usize> = Array1::zeros(self.k);

        for (sample, &label) in self.samples.iter().zip(labels.iter()) {
            cluster_counts[label] += 1;
            for (j, value) in sample.channels().into_iter().enumerate() {
                cluster_sums[[label, j]] += value;
            }
        }

        let mut empty_clusters = 0;
        self.after = (0..self.k)
            .map(|i| {
                let count = cluster_counts[i];
                if count > 0 {
                    let n = count as f64;
                    ColorSample::from_channels(
                        cluster_sums[[i, 0]] / n,
                        cluster_sums[[i, 1]] / n,
                        cluster_sums[[i, 2]] / n,
                    )
                } else {
                    empty_clusters += 1;
                    self.before[i]
                }
            })
            .collect();

        empty_clusters
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Current iteration counter (starts at 1)
    pub fn iterations(&self) -> usize {
        self.iteration
    }

    /// Measure recorded by the last convergence check
    pub fn convergence_measure(&self) -> f64 {
        self.measure
    }

    /// Current centroids (T1). After convergence these are the final palette.
    pub fn centroids(&self) -> &[ColorSample] {
        &self.before
    }

    /// Centroids produced by the last update (T2)
    pub fn updated_centroids(&self) -> &[ColorSample] {
        &self.after
    }

    /// Sample positions per cluster from the last classify step. Group i
    /// belongs to the centroid that was at position i when classifying.
    pub fn classification(&self) -> &[Vec<usize>] {
        &self.classification
    }

    pub fn samples(&self) -> &[ColorSample] {
        &self.samples
    }

    pub fn k(&self) -> usize {
        self.k
    }
}
