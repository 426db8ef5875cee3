use std::ops::Range;

use ndarray::s;

use crate::error::{KernelSumError, Result};
use crate::frame::Image;
use crate::kernel::KernelParams;

/// `B` consecutive pixels from one image row, the unit moved through the channel.
pub type PixelBlock = Box<[u16]>;

/// How image rows are cut into fixed-size blocks.
///
/// Only `full_blocks * block_size` leading pixels of every row are streamed;
/// the trailing `remainder` pixels are dropped so the block count per row is
/// fixed for the lifetime of a dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockLayout {
    pub fast: usize,
    pub slow: usize,
    pub block_size: usize,
    pub full_blocks: usize,
    pub remainder: usize,
}

impl BlockLayout {
    pub fn new(fast: usize, slow: usize, block_size: usize) -> Self {
        let remainder = fast % block_size;
        Self {
            fast,
            slow,
            block_size,
            full_blocks: (fast - remainder) / block_size,
            remainder,
        }
    }

    /// Segment an image of `fast x slow` pixels for the given kernel, failing
    /// when the image cannot feed at least one horizontal sum per row.
    pub fn for_kernel(fast: usize, slow: usize, params: &KernelParams) -> Result<Self> {
        params.validate()?;
        if fast == 0 || slow == 0 {
            return Err(KernelSumError::InvalidDimensions { fast, slow });
        }
        let layout = Self::new(fast, slow, params.block_size);
        if layout.full_blocks < 2 {
            return Err(KernelSumError::InvalidKernel(format!(
                "row width {} holds {} block(s) of {}; at least 2 are needed",
                fast, layout.full_blocks, params.block_size
            )));
        }
        if slow < params.full_height() {
            return Err(KernelSumError::InvalidKernel(format!(
                "image has {} rows, fewer than the kernel height {}",
                slow,
                params.full_height()
            )));
        }
        Ok(layout)
    }

    /// Pixels per row that enter the pipeline.
    pub fn processed_width(&self) -> usize {
        self.full_blocks * self.block_size
    }

    /// Total blocks sent for one frame.
    pub fn blocks_per_frame(&self) -> usize {
        self.full_blocks * self.slow
    }

    /// Pixel columns of block `block` within a row.
    pub fn block_columns(&self, block: usize) -> Range<usize> {
        let start = block * self.block_size;
        start..start + self.block_size
    }

    /// Columns the streaming path produces sums for. The last block of each
    /// row only supplies right-hand neighbors and is never summed itself.
    pub fn covered_columns(&self) -> Range<usize> {
        0..(self.full_blocks - 1) * self.block_size
    }

    /// Copy block `block` of row `y` out of an image.
    pub fn extract(&self, image: &Image, y: usize, block: usize) -> PixelBlock {
        let cols = self.block_columns(block);
        image
            .data
            .slice(s![y, cols])
            .iter()
            .copied()
            .collect::<Vec<_>>()
            .into_boxed_slice()
    }
}

/// Element-wise wrapping sum of two block-shaped running totals.
pub fn add_blocks(left: &[u32], right: &[u32], out: &mut [u32]) {
    for ((o, &l), &r) in out.iter_mut().zip(left).zip(right) {
        *o = l.wrapping_add(r);
    }
}

/// Element-wise wrapping difference of two block-shaped running totals.
pub fn sub_blocks(left: &[u32], right: &[u32], out: &mut [u32]) {
    for ((o, &l), &r) in out.iter_mut().zip(left).zip(right) {
        *o = l.wrapping_sub(r);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn exact_division_has_no_remainder() {
        let layout = BlockLayout::new(64, 8, 16);
        assert_eq!(layout.full_blocks, 4);
        assert_eq!(layout.remainder, 0);
        assert_eq!(layout.processed_width(), 64);
        assert_eq!(layout.covered_columns(), 0..48);
    }

    #[test]
    fn remainder_is_dropped() {
        let layout = BlockLayout::new(4148, 4362, 16);
        assert_eq!(layout.full_blocks, 259);
        assert_eq!(layout.remainder, 4);
        assert_eq!(layout.processed_width(), 4144);
        assert_eq!(layout.blocks_per_frame(), 259 * 4362);
    }

    #[test]
    fn single_block_rows_are_rejected() {
        let params = KernelParams::new(1, 1, 4);
        assert!(BlockLayout::for_kernel(7, 8, &params).is_err());
        assert!(BlockLayout::for_kernel(8, 8, &params).is_ok());
    }

    #[test]
    fn too_few_rows_are_rejected() {
        let params = KernelParams::new(1, 3, 4);
        assert!(BlockLayout::for_kernel(8, 6, &params).is_err());
        assert!(BlockLayout::for_kernel(8, 7, &params).is_ok());
    }

    #[test]
    fn extract_copies_the_right_pixels() {
        let data = Array2::from_shape_fn((2, 8), |(r, c)| (r * 8 + c) as u16);
        let image = Image::new(data);
        let layout = BlockLayout::new(8, 2, 4);
        assert_eq!(&*layout.extract(&image, 1, 1), &[12, 13, 14, 15]);
        assert_eq!(&*layout.extract(&image, 0, 0), &[0, 1, 2, 3]);
    }

    #[test]
    fn wrapping_difference_recovers_window() {
        let older = [u32::MAX - 1, 5];
        let newer = [3, 9];
        let mut out = [0u32; 2];
        sub_blocks(&newer, &older, &mut out);
        assert_eq!(out, [5, 4]);
    }
}
