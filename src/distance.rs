use crate::color::ColorSample;
use crate::error::{QuantizeError, Result};
use rayon::prelude::*;

/// Below this many samples the serial scan beats spawning rayon tasks
const PARALLEL_THRESHOLD: usize = 4_096;

/// Find the nearest centroid for each sample.
///
/// Labels come back in sample order and each label follows the serial
/// first-occurrence tie-break of [`ColorSample::nearest_index`], whether the
/// lookups ran in parallel or not.
pub fn find_nearest_centroids(
    samples: &[ColorSample],
    centroids: &[ColorSample],
) -> Result<Vec<usize>> {
    if centroids.is_empty() {
        return Err(QuantizeError::EmptyCandidates);
    }

    if samples.len() < PARALLEL_THRESHOLD {
        return find_nearest_centroids_serial(samples, centroids);
    }

    samples
        .par_iter()
        .map(|sample| sample.nearest_index(centroids))
        .collect()
}

/// Find the nearest centroid for each sample (serial version for small inputs)
pub fn find_nearest_centroids_serial(
    samples: &[ColorSample],
    centroids: &[ColorSample],
) -> Result<Vec<usize>> {
    samples
        .iter()
        .map(|sample| sample.nearest_index(centroids))
        .collect()
}

/// Map every packed pixel index to the packed index of its nearest centroid
pub fn repaint_indices(pixels: &[u32], centroids: &[ColorSample]) -> Result<Vec<u32>> {
    if centroids.is_empty() {
        return Err(QuantizeError::EmptyCandidates);
    }

    let paint = |&color: &u32| -> Result<u32> {
        let sample = ColorSample::from_index(color);
        Ok(centroids[sample.nearest_index(centroids)?].index())
    };

    if pixels.len() < PARALLEL_THRESHOLD {
        pixels.iter().map(paint).collect()
    } else {
        pixels.par_iter().map(paint).collect()
    }
}

/// Mean squared distance between positionally matched centroids
pub fn mean_centroid_shift(before: &[ColorSample], after: &[ColorSample]) -> f64 {
    debug_assert_eq!(before.len(), after.len());
    if before.is_empty() {
        return 0.0;
    }

    let total: f64 = before
        .iter()
        .zip(after.iter())
        .map(|(a, b)| a.distance_squared(b))
        .sum();
    total / before.len() as f64
}

/// Ratio of total signal to total noise against the nearest centroid.
///
/// Returns `f64::INFINITY` when every sample sits exactly on a centroid.
pub fn signal_to_noise(samples: &[ColorSample], centroids: &[ColorSample]) -> Result<f64> {
    let mut signal = 0.0f64;
    let mut noise = 0.0f64;

    // serial so the sums are reproducible bit for bit
    for sample in samples {
        let nearest = sample.nearest(centroids)?;
        signal += sample.signal_magnitude();
        noise += sample.noise(nearest);
    }

    if noise == 0.0 {
        return Ok(f64::INFINITY);
    }
    Ok(signal / noise)
}
