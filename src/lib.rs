//! # colorkmeans-rs
//!
//! Color quantization of images with k-means clustering.
//!
//! Every pixel becomes a [`ColorSample`]; the engine clusters the samples into
//! `k` representative colors and repaints each pixel with its nearest
//! representative.
//!
//! ## Features
//!
//! - **Three initialization strategies**: random sampling, uniform selection
//!   over the packed color range, and density-weighted stratified sampling
//! - **Three convergence strategies**: iteration limit, centroid stability,
//!   and signal-to-noise ratio, each bounded by a maximum iteration count
//! - **Deterministic parallelism**: nearest-centroid lookups run on rayon but
//!   keep the serial tie-break order
//! - **Reproducible runs**: seed the random source through the configuration
//!
//! ## Example
//!
//! ```rust
//! use colorkmeans_rs::{ColorKMeans, PixelGrid, QuantizeConfig};
//!
//! let pixels: Vec<u32> = (0..64u32).map(|i| 0xFF00_0000 | (i * 4) << 16 | (255 - i * 4)).collect();
//! let image = PixelGrid::new(8, 8, pixels).unwrap();
//!
//! let mut kmeans = ColorKMeans::with_config(QuantizeConfig::new(4).with_seed(42));
//! let filtered = kmeans.fit_predict(&image).unwrap();
//! assert!(filtered.distinct_colors() <= 4);
//! ```
//!
//! ## Custom Configuration
//!
//! ```rust
//! use colorkmeans_rs::{ColorKMeans, ConvergenceMode, InitMode, PixelGrid, QuantizeConfig};
//!
//! let pixels: Vec<u32> = (0..256u32).map(|i| 0xFF00_0000 | i << 8 | i).collect();
//! let image = PixelGrid::new(16, 16, pixels).unwrap();
//!
//! let config = QuantizeConfig {
//!     k: 6,
//!     init_mode: InitMode::StratifiedSampling,
//!     convergence_mode: ConvergenceMode::NoiseRatio,
//!     max_iters: 40,
//!     threshold: 30.0,
//!     seed: Some(7),
//! };
//!
//! let mut kmeans = ColorKMeans::with_config(config);
//! let report = kmeans.train(&image).unwrap();
//! assert_eq!(report.palette.len(), 6);
//! assert!(report.iterations <= 40);
//! ```

mod algorithm;
mod color;
mod config;
mod convergence;
mod distance;
mod error;
mod grid;
mod init;
mod kmeans;

pub use algorithm::{ClusterState, ClusteringEngine, EngineState};
pub use color::{pack_channels, unpack_channel, ColorSample, OPAQUE_ALPHA};
pub use config::{ConvergenceMode, InitMode, QuantizeConfig};
pub use convergence::{ConvergenceStrategy, IterationLimit, NoiseRatio, Stability};
pub use error::{QuantizeError, Result};
pub use grid::{ImageSource, PixelGrid};
pub use init::{
    InitializationStrategy, RandomSampling, StratifiedSampling, UniformSelection,
    MAX_STRATUM_REDRAWS,
};
pub use kmeans::{ClusterReport, ColorKMeans};
