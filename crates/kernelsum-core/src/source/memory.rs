use crate::error::{KernelSumError, Result};
use crate::frame::{Image, Mask, SourceInfo};

use super::{check_frame_request, ImageSource};

/// Frames already held in memory.
#[derive(Clone, Debug)]
pub struct InMemorySource {
    frames: Vec<Image>,
    mask: Mask,
}

impl InMemorySource {
    /// All frames must share one shape; the mask defaults to all-valid.
    pub fn new(frames: Vec<Image>) -> Result<Self> {
        let first = frames.first().ok_or(KernelSumError::EmptyDataset)?;
        let (fast, slow) = (first.fast(), first.slow());
        if let Some(bad) = frames.iter().find(|f| f.fast() != fast || f.slow() != slow) {
            return Err(KernelSumError::DimensionMismatch {
                expected_fast: fast,
                expected_slow: slow,
                actual_fast: bad.fast(),
                actual_slow: bad.slow(),
            });
        }
        Ok(Self {
            mask: Mask::all_valid(fast, slow),
            frames,
        })
    }

    pub fn with_mask(mut self, mask: Mask) -> Result<Self> {
        let (fast, slow) = self.dimensions();
        if mask.fast() != fast || mask.slow() != slow {
            return Err(KernelSumError::MaskSize {
                expected: fast * slow,
                actual: mask.fast() * mask.slow(),
            });
        }
        self.mask = mask;
        Ok(self)
    }
}

impl ImageSource for InMemorySource {
    fn dimensions(&self) -> (usize, usize) {
        (self.frames[0].fast(), self.frames[0].slow())
    }

    fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn load_mask(&self) -> Result<Mask> {
        Ok(self.mask.clone())
    }

    fn load_frame(&self, index: usize, destination: &mut [u16]) -> Result<()> {
        check_frame_request(self, index, destination)?;
        for (dst, &src) in destination.iter_mut().zip(self.frames[index].data.iter()) {
            *dst = src;
        }
        Ok(())
    }

    fn info(&self) -> SourceInfo {
        let (fast, slow) = self.dimensions();
        SourceInfo {
            filename: None,
            kind: "memory",
            total_frames: self.frames.len(),
            fast,
            slow,
            bit_depth: 16,
        }
    }
}
