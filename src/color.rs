use crate::error::{QuantizeError, Result};
use std::cmp::Ordering;

/// Alpha byte written into every index packed from channel values
pub const OPAQUE_ALPHA: u32 = 0xFF;

/// Pack three channels in `[0, 1]` into an opaque `0xAARRGGBB` index.
///
/// Each channel is scaled by 256, truncated toward zero and clamped to
/// `[0, 255]`. NaN channels pack to 0.
#[inline]
pub fn pack_channels(red: f64, green: f64, blue: f64) -> u32 {
    (OPAQUE_ALPHA << 24)
        | (quantize_channel(red) << 16)
        | (quantize_channel(green) << 8)
        | quantize_channel(blue)
}

/// Extract the byte at `shift` from a packed index as a channel in `[0, 1)`.
#[inline]
pub fn unpack_channel(index: u32, shift: u32) -> f64 {
    ((index >> shift) & 0xFF) as f64 / 256.0
}

#[inline]
fn quantize_channel(value: f64) -> u32 {
    // `as` saturates and maps NaN to 0
    ((value * 256.0) as i32).clamp(0, 255) as u32
}

/// An immutable RGB color point with its packed 32-bit index.
///
/// Ordering and equality look at the packed index only, so two samples whose
/// channels differ below the 1/256 quantization step compare equal. Use
/// [`ColorSample::distance_squared`] to compare actual colors.
#[derive(Debug, Clone, Copy)]
pub struct ColorSample {
    red: f64,
    green: f64,
    blue: f64,
    index: u32,
}

impl ColorSample {
    /// Build a sample from channel values; the index gets full opacity.
    pub fn from_channels(red: f64, green: f64, blue: f64) -> Self {
        Self {
            red,
            green,
            blue,
            index: pack_channels(red, green, blue),
        }
    }

    /// Build a sample from a packed index, keeping the index verbatim
    /// (including its alpha byte).
    pub fn from_index(index: u32) -> Self {
        Self {
            red: unpack_channel(index, 16),
            green: unpack_channel(index, 8),
            blue: unpack_channel(index, 0),
            index,
        }
    }

    pub fn red(&self) -> f64 {
        self.red
    }

    pub fn green(&self) -> f64 {
        self.green
    }

    pub fn blue(&self) -> f64 {
        self.blue
    }

    /// The alpha byte of the packed index.
    pub fn alpha(&self) -> u8 {
        (self.index >> 24) as u8
    }

    /// The packed `0xAARRGGBB` index.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Channels as an `[r, g, b]` array.
    pub fn channels(&self) -> [f64; 3] {
        [self.red, self.green, self.blue]
    }

    /// Sum of squared per-channel differences.
    #[inline]
    pub fn distance_squared(&self, other: &ColorSample) -> f64 {
        let dr = self.red - other.red;
        let dg = self.green - other.green;
        let db = self.blue - other.blue;
        dr * dr + dg * dg + db * db
    }

    /// Position of the closest candidate. Ties go to the first occurrence.
    pub fn nearest_index(&self, candidates: &[ColorSample]) -> Result<usize> {
        let (first, rest) = candidates
            .split_first()
            .ok_or(QuantizeError::EmptyCandidates)?;

        let mut best = 0;
        let mut best_dist = self.distance_squared(first);
        for (i, candidate) in rest.iter().enumerate() {
            let dist = self.distance_squared(candidate);
            // strict comparison keeps the earliest minimum
            if dist < best_dist {
                best_dist = dist;
                best = i + 1;
            }
        }
        Ok(best)
    }

    /// The closest candidate. Ties go to the first occurrence.
    pub fn nearest<'a>(&self, candidates: &'a [ColorSample]) -> Result<&'a ColorSample> {
        let idx = self.nearest_index(candidates)?;
        Ok(&candidates[idx])
    }

    /// Euclidean norm of the channels seen as a vector from black.
    pub fn signal_magnitude(&self) -> f64 {
        (self.red * self.red + self.green * self.green + self.blue * self.blue).sqrt()
    }

    /// Euclidean distance to `relative_to`.
    pub fn noise(&self, relative_to: &ColorSample) -> f64 {
        self.distance_squared(relative_to).sqrt()
    }

    /// Whether the packed index lies in `[low, high]`.
    pub fn in_range(&self, low: f64, high: f64) -> bool {
        let index = self.index as f64;
        index >= low && index <= high
    }
}

impl From<u32> for ColorSample {
    fn from(index: u32) -> Self {
        ColorSample::from_index(index)
    }
}

impl PartialEq for ColorSample {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for ColorSample {}

impl PartialOrd for ColorSample {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ColorSample {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index.cmp(&other.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const RED: u32 = 0xFFFF_0000;
    const GREEN: u32 = 0xFF00_FF00;

    #[test]
    fn test_pack_channels_layout() {
        assert_eq!(pack_channels(0.0, 0.0, 0.0), 0xFF00_0000);
        assert_eq!(pack_channels(1.0, 0.0, 0.0), RED);
        assert_eq!(pack_channels(0.0, 1.0, 0.0), GREEN);
        assert_eq!(pack_channels(0.5, 0.25, 0.125), 0xFF80_4020);
    }

    #[test]
    fn test_pack_channels_clamps() {
        assert_eq!(pack_channels(-3.0, 2.0, f64::NAN), 0xFF00_FF00);
    }

    #[test]
    fn test_from_index_unpacks_channels() {
        let sample = ColorSample::from_index(0x80FF_8000);
        assert_relative_eq!(sample.red(), 255.0 / 256.0);
        assert_relative_eq!(sample.green(), 0.5);
        assert_relative_eq!(sample.blue(), 0.0);
        assert_eq!(sample.alpha(), 0x80);
        assert_eq!(sample.index(), 0x80FF_8000);
    }

    #[test]
    fn test_from_u32_keeps_alpha() {
        let sample: ColorSample = 0x40_12_34_56u32.into();
        assert_eq!(sample.alpha(), 0x40);
        assert_relative_eq!(sample.green(), 0x34 as f64 / 256.0);
    }

    #[test]
    fn test_round_trip_is_idempotent_on_index() {
        let sample = ColorSample::from_channels(0.3, 0.61, 0.999);
        let back = ColorSample::from_index(sample.index());
        assert_eq!(
            ColorSample::from_channels(back.red(), back.green(), back.blue()).index(),
            sample.index()
        );
    }

    #[test]
    fn test_distance_squared() {
        let a = ColorSample::from_channels(0.0, 0.0, 0.0);
        let b = ColorSample::from_channels(1.0, 0.5, 0.0);
        assert_relative_eq!(a.distance_squared(&b), 1.25);
        assert_relative_eq!(b.distance_squared(&a), 1.25);
        assert_eq!(b.distance_squared(&b), 0.0);
    }

    #[test]
    fn test_nearest_prefers_first_on_ties() {
        let probe = ColorSample::from_channels(0.5, 0.5, 0.5);
        let candidates = [
            ColorSample::from_channels(0.0, 0.5, 0.5),
            ColorSample::from_channels(1.0, 0.5, 0.5),
            ColorSample::from_channels(0.0, 0.5, 0.5),
        ];
        assert_eq!(probe.nearest_index(&candidates).unwrap(), 0);
    }

    #[test]
    fn test_nearest_picks_minimum() {
        let probe = ColorSample::from_channels(0.9, 0.1, 0.1);
        let candidates = [
            ColorSample::from_index(GREEN),
            ColorSample::from_index(RED),
        ];
        assert_eq!(probe.nearest(&candidates).unwrap().index(), RED);
    }

    #[test]
    fn test_nearest_single_candidate() {
        let probe = ColorSample::from_channels(0.2, 0.4, 0.6);
        let only = [ColorSample::from_index(GREEN)];
        assert_eq!(probe.nearest(&only).unwrap().index(), GREEN);
    }

    #[test]
    fn test_nearest_empty_candidates() {
        let probe = ColorSample::from_index(RED);
        assert!(matches!(
            probe.nearest(&[]),
            Err(QuantizeError::EmptyCandidates)
        ));
    }

    #[test]
    fn test_signal_and_noise() {
        let a = ColorSample::from_channels(0.0, 0.6, 0.8);
        assert_relative_eq!(a.signal_magnitude(), 1.0, epsilon = 1e-12);
        let b = ColorSample::from_channels(0.0, 0.0, 0.8);
        assert_relative_eq!(a.noise(&b), 0.6, epsilon = 1e-12);
        assert_eq!(a.noise(&a), 0.0);
    }

    #[test]
    fn test_in_range_is_inclusive_on_index() {
        let sample = ColorSample::from_index(100);
        assert!(sample.in_range(100.0, 100.0));
        assert!(sample.in_range(50.0, 150.0));
        assert!(!sample.in_range(100.5, 200.0));
    }

    #[test]
    fn test_ordering_uses_index_only() {
        let a = ColorSample::from_channels(0.5, 0.0, 0.0);
        let b = ColorSample::from_channels(0.501, 0.0, 0.0);
        assert_eq!(a, b);
        assert!(ColorSample::from_index(GREEN) < ColorSample::from_index(RED));
    }
}
