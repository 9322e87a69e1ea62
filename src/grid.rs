//! Image collaborator: packed-color pixel grids and their conversion to and
//! from the `image` crate.

use crate::color::ColorSample;
use crate::error::{QuantizeError, Result};
use image::{Rgba, RgbaImage};
use std::collections::HashSet;
use std::path::Path;

/// Source of packed `0xAARRGGBB` pixels consumed by the clustering engine.
pub trait ImageSource: Sized {
    /// Number of columns
    fn width(&self) -> usize;

    /// Number of rows
    fn height(&self) -> usize;

    /// Packed color at row-major `offset = row * width + column`
    fn color_at(&self, offset: usize) -> u32;

    /// Build an image of the same kind from packed indices, used to write back
    /// the filtered result.
    fn from_indices(width: usize, height: usize, indices: Vec<u32>) -> Result<Self>;

    /// Number of pixels
    fn len(&self) -> usize {
        self.width() * self.height()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One sample per pixel in row-major order, not deduplicated.
    fn to_samples(&self) -> Vec<ColorSample> {
        (0..self.len())
            .map(|offset| ColorSample::from(self.color_at(offset)))
            .collect()
    }
}

/// Row-major grid of packed color indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl PixelGrid {
    /// Create a grid, checking that `pixels` holds exactly `width * height`
    /// entries and that neither dimension is zero.
    pub fn new(width: usize, height: usize, pixels: Vec<u32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(QuantizeError::InvalidDimensions(format!(
                "image dimensions must be positive, got {}x{}",
                width, height
            )));
        }

        let expected = width.checked_mul(height).ok_or_else(|| {
            QuantizeError::InvalidDimensions(format!("{}x{} overflows", width, height))
        })?;
        if pixels.len() != expected {
            return Err(QuantizeError::InvalidDimensions(format!(
                "Expected {} pixels for {}x{}, got {}",
                expected,
                width,
                height,
                pixels.len()
            )));
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Row-major offset of `(row, column)`
    #[inline]
    pub fn offset(&self, row: usize, column: usize) -> usize {
        row * self.width + column
    }

    /// Packed color at `(row, column)`
    pub fn color_at_cell(&self, row: usize, column: usize) -> u32 {
        self.pixels[self.offset(row, column)]
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Number of distinct packed colors in the image
    pub fn distinct_colors(&self) -> usize {
        self.pixels.iter().collect::<HashSet<_>>().len()
    }

    /// Convert from an 8-bit RGBA buffer
    pub fn from_rgba_image(img: &RgbaImage) -> Result<Self> {
        let pixels = img
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
            })
            .collect();
        Self::new(img.width() as usize, img.height() as usize, pixels)
    }

    /// Convert to an 8-bit RGBA buffer
    pub fn to_rgba_image(&self) -> Result<RgbaImage> {
        let width = u32::try_from(self.width)
            .map_err(|_| QuantizeError::InvalidDimensions(format!("width {} too large", self.width)))?;
        let height = u32::try_from(self.height).map_err(|_| {
            QuantizeError::InvalidDimensions(format!("height {} too large", self.height))
        })?;

        Ok(RgbaImage::from_fn(width, height, |x, y| {
            let c = self.color_at_cell(y as usize, x as usize);
            Rgba([(c >> 16) as u8, (c >> 8) as u8, c as u8, (c >> 24) as u8])
        }))
    }

    /// Decode an image file in any format enabled on the `image` crate
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let img = image::open(path)?;
        Self::from_rgba_image(&img.to_rgba8())
    }

    /// Encode to a file, the format following the extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_rgba_image()?.save(path)?;
        Ok(())
    }
}

impl ImageSource for PixelGrid {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn color_at(&self, offset: usize) -> u32 {
        self.pixels[offset]
    }

    fn from_indices(width: usize, height: usize, indices: Vec<u32>) -> Result<Self> {
        PixelGrid::new(width, height, indices)
    }

    fn len(&self) -> usize {
        self.pixels.len()
    }
}
