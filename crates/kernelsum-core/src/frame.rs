use std::path::PathBuf;

use ndarray::Array2;

use crate::error::{KernelSumError, Result};

/// A single detector image.
/// Pixel values are raw 16-bit intensities.
#[derive(Clone, Debug)]
pub struct Image {
    /// Pixel data, row-major, shape = (slow, fast)
    pub data: Array2<u16>,
    /// Position of this image within its dataset
    pub index: usize,
}

impl Image {
    pub fn new(data: Array2<u16>) -> Self {
        Self { data, index: 0 }
    }

    /// Wrap a flat row-major pixel buffer of length `fast * slow`.
    pub fn from_raw(fast: usize, slow: usize, pixels: Vec<u16>) -> Result<Self> {
        let actual = pixels.len();
        let data = Array2::from_shape_vec((slow, fast), pixels).map_err(|_| {
            KernelSumError::BufferSize {
                expected: fast * slow,
                actual,
            }
        })?;
        Ok(Self::new(data))
    }

    /// Width of a row in pixels.
    pub fn fast(&self) -> usize {
        self.data.ncols()
    }

    /// Number of rows.
    pub fn slow(&self) -> usize {
        self.data.nrows()
    }
}

/// Per-pixel validity map for a detector, shared by every frame of a dataset.
#[derive(Clone, Debug)]
pub struct Mask {
    /// `true` where the pixel may be trusted, shape = (slow, fast)
    pub valid: Array2<bool>,
}

impl Mask {
    pub fn all_valid(fast: usize, slow: usize) -> Self {
        Self {
            valid: Array2::from_elem((slow, fast), true),
        }
    }

    /// Build a mask from a detector pixel-mask bitmap, where a raw value of
    /// zero marks a good pixel and any set bit marks it as bad.
    pub fn from_pixel_mask(fast: usize, slow: usize, raw: &[u32]) -> Result<Self> {
        if raw.len() != fast * slow {
            return Err(KernelSumError::MaskSize {
                expected: fast * slow,
                actual: raw.len(),
            });
        }
        let flags: Vec<bool> = raw.iter().map(|&v| v == 0).collect();
        let valid = Array2::from_shape_vec((slow, fast), flags).map_err(|_| {
            KernelSumError::MaskSize {
                expected: fast * slow,
                actual: raw.len(),
            }
        })?;
        Ok(Self { valid })
    }

    pub fn fast(&self) -> usize {
        self.valid.ncols()
    }

    pub fn slow(&self) -> usize {
        self.valid.nrows()
    }

    pub fn is_valid(&self, x: usize, y: usize) -> bool {
        self.valid[[y, x]]
    }

    /// Number of pixels marked valid.
    pub fn valid_count(&self) -> usize {
        self.valid.iter().filter(|&&v| v).count()
    }

    /// The mask as a 0/1 image, suitable for box filtering.
    pub fn to_counts(&self) -> Array2<u16> {
        self.valid.mapv(u16::from)
    }
}

/// Metadata about an image source.
#[derive(Clone, Debug)]
pub struct SourceInfo {
    pub filename: Option<PathBuf>,
    pub kind: &'static str,
    pub total_frames: usize,
    pub fast: usize,
    pub slow: usize,
    pub bit_depth: u8,
}
