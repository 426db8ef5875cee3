//! Streaming box sum: a producer cuts each image row into blocks and pushes
//! them through a bounded channel; a consumer sums them horizontally with a
//! rolling buffer and vertically with a circular store of running row sums.

pub mod block;
pub mod channel;
pub mod consumer;
pub mod producer;
pub mod rolling;
pub mod row_store;

use std::ops::Range;

use ndarray::Array2;
use tracing::debug;

use crate::compute::ExecutionContext;
use crate::error::{KernelSumError, Result};
use crate::frame::Image;
use crate::kernel::KernelParams;

use block::BlockLayout;
use channel::pixel_channel;
use consumer::Consumer;
use producer::run_producer;

/// Box sums produced by the streaming pipeline for one frame.
#[derive(Clone, Debug)]
pub struct StreamOutput {
    /// Sums, shape = (slow, fast). Pixels outside `rows` x `cols` are zero.
    pub sums: Array2<u32>,
    /// Rows with a complete vertical footprint.
    pub rows: Range<usize>,
    /// Columns a horizontal sum was computed for.
    pub cols: Range<usize>,
}

impl StreamOutput {
    /// Whether the streaming pipeline wrote a value for `(x, y)`.
    pub fn is_covered(&self, x: usize, y: usize) -> bool {
        self.rows.contains(&y) && self.cols.contains(&x)
    }

    /// The sum at `(x, y)`, if the pipeline produced one.
    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        self.is_covered(x, y).then(|| self.sums[[y, x]])
    }
}

/// Streaming box-sum pipeline for images of one fixed shape.
#[derive(Clone, Debug)]
pub struct StreamingPipeline {
    layout: BlockLayout,
    params: KernelParams,
}

impl StreamingPipeline {
    pub fn new(fast: usize, slow: usize, params: &KernelParams) -> Result<Self> {
        let layout = BlockLayout::for_kernel(fast, slow, params)?;
        debug!(
            block_size = layout.block_size,
            full_blocks = layout.full_blocks,
            remainder = layout.remainder,
            aux_bytes = auxiliary_bytes(&layout, params),
            "Streaming pipeline ready"
        );
        Ok(Self {
            layout,
            params: params.clone(),
        })
    }

    pub fn layout(&self) -> &BlockLayout {
        &self.layout
    }

    pub fn params(&self) -> &KernelParams {
        &self.params
    }

    /// Rows the pipeline produces sums for.
    pub fn covered_rows(&self) -> Range<usize> {
        let kh = self.params.kernel_height;
        kh..self.layout.slow - kh
    }

    /// Run producer and consumer for one frame on `context`.
    pub fn run(&self, image: &Image, context: &dyn ExecutionContext) -> Result<StreamOutput> {
        if image.fast() != self.layout.fast || image.slow() != self.layout.slow {
            return Err(KernelSumError::DimensionMismatch {
                expected_fast: self.layout.fast,
                expected_slow: self.layout.slow,
                actual_fast: image.fast(),
                actual_slow: image.slow(),
            });
        }

        let mut sums = Array2::<u32>::zeros((self.layout.slow, self.layout.fast));
        let (mut tx, mut rx) = pixel_channel(self.params.channel_capacity);
        let mut consumer = Consumer::new(self.layout, &self.params);
        let layout = &self.layout;

        {
            let out = &mut sums;
            context.run_pair(
                Box::new(move || run_producer(image, layout, &mut tx).map(|_| ())),
                Box::new(move || consumer.run(&mut rx, out)),
            )?;
        }

        Ok(StreamOutput {
            sums,
            rows: self.covered_rows(),
            cols: self.layout.covered_columns(),
        })
    }
}

/// Working memory of the streaming path in bytes: the consumer's rolling
/// buffer and row store plus a full channel. Does not depend on image height.
pub fn auxiliary_bytes(layout: &BlockLayout, params: &KernelParams) -> usize {
    let rolling = (layout.block_size * 2 + params.kernel_width) * std::mem::size_of::<u16>();
    let store = params.full_height() * layout.full_blocks * layout.block_size;
    let scratch = 3 * layout.block_size;
    let channel = params.channel_capacity * layout.block_size * std::mem::size_of::<u16>();
    rolling + (store + scratch) * std::mem::size_of::<u32>() + channel
}
