use crate::algorithm::ClusteringEngine;
use crate::color::ColorSample;
use crate::config::{ConvergenceMode, InitMode, QuantizeConfig};
use crate::distance::repaint_indices;
use crate::error::{QuantizeError, Result};
use crate::grid::ImageSource;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Outcome of a training run
#[derive(Debug, Clone)]
pub struct ClusterReport {
    /// Final centroids, in initialization order
    pub palette: Vec<ColorSample>,
    /// Iteration counter when the run stopped
    pub iterations: usize,
    /// Measure recorded by the final convergence check
    pub convergence_measure: f64,
    pub init_mode: InitMode,
    pub convergence_mode: ConvergenceMode,
}

impl ClusterReport {
    /// Packed indices of the palette
    pub fn palette_indices(&self) -> Vec<u32> {
        self.palette.iter().map(|c| c.index()).collect()
    }
}

/// k-means color quantizer.
///
/// Mirrors the scikit-learn estimator shape: [`train`](Self::train) learns a
/// palette from one image, [`predict`](Self::predict) repaints any image with
/// it, [`fit_predict`](Self::fit_predict) does both on the same image.
///
/// # Example
///
/// ```
/// use colorkmeans_rs::{ColorKMeans, InitMode, PixelGrid, QuantizeConfig};
///
/// let image = PixelGrid::new(2, 2, vec![0xFFFF_0000, 0xFFFF_0000, 0xFF00_FF00, 0xFF00_FF00]).unwrap();
/// let config = QuantizeConfig::new(2)
///     .with_init_mode(InitMode::UniformSelection)
///     .with_max_iters(5);
///
/// let mut kmeans = ColorKMeans::with_config(config);
/// let filtered = kmeans.fit_predict(&image).unwrap();
/// assert_eq!(filtered, image);
/// ```
pub struct ColorKMeans {
    config: QuantizeConfig,
    rng: ChaCha8Rng,
    report: Option<ClusterReport>,
}

impl ColorKMeans {
    /// Create a quantizer with `k` colors and default settings.
    pub fn new(k: usize) -> Self {
        Self::with_config(QuantizeConfig::new(k))
    }

    /// Create a quantizer with a custom configuration. The random source is
    /// seeded from `config.seed`, or from OS entropy when it is `None`.
    pub fn with_config(config: QuantizeConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            config,
            rng,
            report: None,
        }
    }

    /// Learn a palette from `image`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid for this image or the
    /// initialization strategy cannot produce k centroids. No palette is kept
    /// from a failed run.
    pub fn train<I: ImageSource>(&mut self, image: &I) -> Result<&ClusterReport> {
        self.report = None;

        let mut engine = ClusteringEngine::new(&self.config, image)?;
        engine.run(&mut self.rng)?;

        Ok(&*self.report.insert(ClusterReport {
            palette: engine.centroids().to_vec(),
            iterations: engine.iterations(),
            convergence_measure: engine.convergence_measure(),
            init_mode: self.config.init_mode,
            convergence_mode: self.config.convergence_mode,
        }))
    }

    /// Same as [`train`](Self::train), returning `&mut Self` for chaining.
    pub fn fit<I: ImageSource>(&mut self, image: &I) -> Result<&mut Self> {
        self.train(image)?;
        Ok(self)
    }

    /// Repaint every pixel of `image` with its nearest palette color.
    ///
    /// # Errors
    ///
    /// Returns [`QuantizeError::NotFitted`] before a successful `train`.
    pub fn predict<I: ImageSource>(&self, image: &I) -> Result<I> {
        let report = self.report.as_ref().ok_or(QuantizeError::NotFitted)?;
        if image.is_empty() {
            return Err(QuantizeError::EmptyImage);
        }

        let pixels: Vec<u32> = (0..image.len()).map(|offset| image.color_at(offset)).collect();
        let painted = repaint_indices(&pixels, &report.palette)?;
        I::from_indices(image.width(), image.height(), painted)
    }

    /// Train on `image` and repaint it.
    pub fn fit_predict<I: ImageSource>(&mut self, image: &I) -> Result<I> {
        self.train(image)?;
        self.predict(image)
    }

    /// Report of the last successful training run
    pub fn report(&self) -> Option<&ClusterReport> {
        self.report.as_ref()
    }

    /// Learned palette, if trained
    pub fn palette(&self) -> Option<&[ColorSample]> {
        self.report.as_ref().map(|r| r.palette.as_slice())
    }

    /// Get the number of colors.
    pub fn k(&self) -> usize {
        self.config.k
    }

    /// Get the configuration.
    pub fn config(&self) -> &QuantizeConfig {
        &self.config
    }
}
