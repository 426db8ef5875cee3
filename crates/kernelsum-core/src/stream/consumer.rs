use ndarray::{s, Array2};
use tracing::trace;

use crate::error::Result;
use crate::kernel::KernelParams;

use super::block::BlockLayout;
use super::channel::BlockReceiver;
use super::rolling::RollingBuffer;
use super::row_store::RowAccumulator;

/// Per-frame state of the consuming side of the pipeline.
pub struct Consumer {
    layout: BlockLayout,
    kernel_height: usize,
    rolling: RollingBuffer,
    rows: RowAccumulator,
    row_sums: Vec<u32>,
    kernel_sum: Vec<u32>,
}

impl Consumer {
    pub fn new(layout: BlockLayout, params: &KernelParams) -> Self {
        Self {
            layout,
            kernel_height: params.kernel_height,
            rolling: RollingBuffer::new(layout.block_size, params.kernel_width),
            rows: RowAccumulator::new(params.kernel_height, layout.full_blocks, layout.block_size),
            row_sums: vec![0; layout.block_size],
            kernel_sum: vec![0; layout.block_size],
        }
    }

    /// Bytes of working memory held between blocks.
    pub fn working_bytes(&self) -> usize {
        let u32_cells = self.rows.working_cells() + self.row_sums.len() + self.kernel_sum.len();
        self.rolling.len() * std::mem::size_of::<u16>() + u32_cells * std::mem::size_of::<u32>()
    }

    /// Image row whose box sum is complete once row `y` has been folded in,
    /// if that row has a full kernel footprint.
    fn ready_row(&self, y: usize) -> Option<usize> {
        let kh = self.kernel_height;
        // The window ending at y is centered on y - KH; it only spans real rows
        // once the center is at least KH rows into the image.
        (y >= 2 * kh).then(|| y - kh)
    }

    /// Drain one frame's worth of blocks and write finished sums into `out`.
    pub fn run(&mut self, rx: &mut BlockReceiver, out: &mut Array2<u32>) -> Result<()> {
        self.rows.reset();
        let last_block = self.layout.full_blocks - 1;

        for y in 0..self.layout.slow {
            self.rolling.reset();
            self.rolling.load_block0(&rx.receive()?);

            for block in 0..last_block {
                self.rolling.load_block1(&rx.receive()?);
                self.rolling.sum_block0(&mut self.row_sums);
                self.rows
                    .accumulate(y, block, &self.row_sums, &mut self.kernel_sum);

                if let Some(row) = self.ready_row(y) {
                    let cols = self.layout.block_columns(block);
                    out.slice_mut(s![row, cols])
                        .iter_mut()
                        .zip(&self.kernel_sum)
                        .for_each(|(dst, &v)| *dst = v);
                }
            }
        }
        trace!(blocks = rx.received(), "Consumer finished");
        Ok(())
    }
}
