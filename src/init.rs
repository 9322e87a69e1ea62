use crate::color::ColorSample;
use crate::config::InitMode;
use crate::error::{QuantizeError, Result};
use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

/// Number of times a stratified draw is repeated after landing on an empty bin
pub const MAX_STRATUM_REDRAWS: usize = 8;

/// Produces the starting centroids of a clustering run.
pub trait InitializationStrategy {
    /// Select exactly `k` starting centroids from `population`.
    fn select(
        &self,
        population: &[ColorSample],
        k: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<ColorSample>>;

    /// The configuration mode this strategy implements
    fn mode(&self) -> InitMode;
}

impl InitMode {
    /// Build the strategy for this mode
    pub fn strategy(&self) -> Box<dyn InitializationStrategy> {
        match self {
            InitMode::RandomSampling => Box::new(RandomSampling),
            InitMode::UniformSelection => Box::new(UniformSelection),
            InitMode::StratifiedSampling => Box::new(StratifiedSampling),
        }
    }
}

fn check_population(population: &[ColorSample], k: usize) -> Result<()> {
    if k == 0 {
        return Err(QuantizeError::InvalidK(
            "k must be greater than 0".to_string(),
        ));
    }
    if population.is_empty() {
        return Err(QuantizeError::EmptyImage);
    }
    if population.len() < k {
        return Err(QuantizeError::InsufficientData(format!(
            "Number of samples ({}) is less than k ({})",
            population.len(),
            k
        )));
    }
    Ok(())
}

/// Minimum and maximum packed index over a non-empty population.
///
/// Indices compare as unsigned, alpha byte first, so fully transparent
/// pixels sort below every opaque one.
fn index_bounds(population: &[ColorSample]) -> (u32, u32) {
    population
        .iter()
        .fold((u32::MAX, u32::MIN), |(lo, hi), sample| {
            (lo.min(sample.index()), hi.max(sample.index()))
        })
}

/// Take the first k entries of a random permutation of the population
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSampling;

impl InitializationStrategy for RandomSampling {
    fn select(
        &self,
        population: &[ColorSample],
        k: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<ColorSample>> {
        check_population(population, k)?;

        let mut indices: Vec<usize> = (0..population.len()).collect();
        indices.shuffle(rng);
        indices.truncate(k);

        Ok(indices.into_iter().map(|i| population[i]).collect())
    }

    fn mode(&self) -> InitMode {
        InitMode::RandomSampling
    }
}

/// Evenly spaced synthetic colors across the packed-index range
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformSelection;

impl InitializationStrategy for UniformSelection {
    fn select(
        &self,
        population: &[ColorSample],
        k: usize,
        _rng: &mut dyn RngCore,
    ) -> Result<Vec<ColorSample>> {
        check_population(population, k)?;
        if k < 2 {
            return Err(QuantizeError::IncompatibleInitialization {
                mode: InitMode::UniformSelection.name(),
                k,
                reason: "uniform selection needs at least 2 centroids".to_string(),
            });
        }

        let (min, max) = index_bounds(population);
        let step = (max - min) as f64 / (k - 1) as f64;

        let mut selected = Vec::with_capacity(k);
        selected.push(ColorSample::from_index(min));
        for i in 1..k - 1 {
            let offset = (step * i as f64).round() as u32;
            selected.push(ColorSample::from_index(min + offset));
        }
        selected.push(ColorSample::from_index(max));

        Ok(selected)
    }

    fn mode(&self) -> InitMode {
        InitMode::UniformSelection
    }
}

/// Density-weighted draws over equal-width bins of the packed-index range
#[derive(Debug, Clone, Copy, Default)]
pub struct StratifiedSampling;

impl StratifiedSampling {
    /// Assign every sample position to one of `k` equal-width bins over
    /// `[min, max]`, scanning bins in increasing order and keeping the first
    /// bin whose closed interval contains the sample.
    pub fn bin_population(population: &[ColorSample], k: usize) -> Vec<Vec<usize>> {
        let mut bins = vec![Vec::new(); k];
        if population.is_empty() || k == 0 {
            return bins;
        }

        let (min, max) = index_bounds(population);
        let (min, max) = (min as f64, max as f64);
        let width = (max - min) / k as f64;

        // bounds[i] is shared by bin i-1 (as end) and bin i (as start), so
        // adjacent bins leave no gap
        let mut bounds: Vec<f64> = (0..=k).map(|i| min + width * i as f64).collect();
        bounds[k] = max;

        for (pos, sample) in population.iter().enumerate() {
            let bin = (0..k)
                .find(|&i| sample.in_range(bounds[i], bounds[i + 1]))
                .unwrap_or(k - 1);
            bins[bin].push(pos);
        }

        bins
    }

    /// Cumulative population fraction per bin
    pub fn cumulative_distribution(bins: &[Vec<usize>], total: usize) -> Vec<f64> {
        let mut acc = 0.0;
        bins.iter()
            .map(|bin| {
                acc += bin.len() as f64 / total as f64;
                acc
            })
            .collect()
    }

    /// First bin whose cumulative value reaches `draw`. Falls back to the
    /// last bin when rounding leaves `draw` above every entry.
    pub fn locate_stratum(distribution: &[f64], draw: f64) -> usize {
        distribution
            .iter()
            .position(|&cum| cum >= draw)
            .unwrap_or(distribution.len().saturating_sub(1))
    }

    /// Draw one member position, redrawing up to [`MAX_STRATUM_REDRAWS`] times
    /// when the located bin has no members.
    pub fn draw_member(
        bins: &[Vec<usize>],
        distribution: &[f64],
        rng: &mut dyn RngCore,
    ) -> Result<usize> {
        let attempts = MAX_STRATUM_REDRAWS + 1;
        let mut stratum = 0;
        for attempt in 0..attempts {
            let draw: f64 = rng.gen();
            stratum = Self::locate_stratum(distribution, draw);
            if let Some(&member) = bins[stratum].choose(rng) {
                return Ok(member);
            }
            warn!(
                "Stratified draw {:.6} hit empty bin {} (attempt {}/{})",
                draw,
                stratum,
                attempt + 1,
                attempts
            );
        }
        Err(QuantizeError::EmptyStratum { stratum, attempts })
    }
}

impl InitializationStrategy for StratifiedSampling {
    fn select(
        &self,
        population: &[ColorSample],
        k: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<ColorSample>> {
        check_population(population, k)?;

        let bins = Self::bin_population(population, k);
        let distribution = Self::cumulative_distribution(&bins, population.len());
        for (i, (bin, cum)) in bins.iter().zip(distribution.iter()).enumerate() {
            debug!("  Stratum {}: {} samples, cumulative {:.6}", i, bin.len(), cum);
        }

        (0..k)
            .map(|_| Self::draw_member(&bins, &distribution, rng).map(|pos| population[pos]))
            .collect()
    }

    fn mode(&self) -> InitMode {
        InitMode::StratifiedSampling
    }
}
