use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_BLOCK_SIZE, DEFAULT_CHANNEL_CAPACITY, DEFAULT_KERNEL_HEIGHT, DEFAULT_KERNEL_WIDTH,
};
use crate::error::{KernelSumError, Result};

/// Shape of the box kernel and of the streaming blocks that carry pixels to it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelParams {
    /// Half-width of the box (KW).
    pub kernel_width: usize,
    /// Half-height of the box (KH).
    pub kernel_height: usize,
    /// Pixels per streamed block (B). Must be a power of two greater than KW.
    pub block_size: usize,
    /// Blocks buffered between producer and consumer.
    pub channel_capacity: usize,
}

impl Default for KernelParams {
    fn default() -> Self {
        Self {
            kernel_width: DEFAULT_KERNEL_WIDTH,
            kernel_height: DEFAULT_KERNEL_HEIGHT,
            block_size: DEFAULT_BLOCK_SIZE,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl KernelParams {
    pub fn new(kernel_width: usize, kernel_height: usize, block_size: usize) -> Self {
        Self {
            kernel_width,
            kernel_height,
            block_size,
            ..Self::default()
        }
    }

    /// Check the constraints the rolling buffer relies on.
    pub fn validate(&self) -> Result<()> {
        if !self.block_size.is_power_of_two() {
            return Err(KernelSumError::InvalidKernel(format!(
                "block size {} is not a power of two",
                self.block_size
            )));
        }
        // The two-block rolling buffer only works if the kernel fits in one block.
        if self.kernel_width >= self.block_size {
            return Err(KernelSumError::InvalidKernel(format!(
                "kernel half-width {} must be smaller than block size {}",
                self.kernel_width, self.block_size
            )));
        }
        let widest_sum = (self.area() as u64).saturating_mul(u64::from(u16::MAX));
        if widest_sum > u64::from(u32::MAX) {
            return Err(KernelSumError::InvalidKernel(format!(
                "a {}x{} kernel over 16-bit pixels can sum past {}",
                self.full_width(),
                self.full_height(),
                u32::MAX
            )));
        }
        if self.channel_capacity == 0 {
            return Err(KernelSumError::InvalidKernel(
                "channel capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Total horizontal span, `2 * KW + 1`.
    pub fn full_width(&self) -> usize {
        self.kernel_width * 2 + 1
    }

    /// Total vertical span, `2 * KH + 1`. Also the depth of the row store.
    pub fn full_height(&self) -> usize {
        self.kernel_height * 2 + 1
    }

    /// Number of pixels under a full, unclipped kernel.
    pub fn area(&self) -> usize {
        self.full_width() * self.full_height()
    }
}
