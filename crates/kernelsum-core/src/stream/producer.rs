use tracing::trace;

use crate::error::Result;
use crate::frame::Image;

use super::block::BlockLayout;
use super::channel::BlockSender;

/// Feed every full block of `image` into the channel, row-major and
/// block-ascending. Returns the number of blocks sent.
pub fn run_producer(image: &Image, layout: &BlockLayout, tx: &mut BlockSender) -> Result<usize> {
    for y in 0..layout.slow {
        for block in 0..layout.full_blocks {
            tx.send(layout.extract(image, y, block))?;
        }
    }
    trace!(blocks = tx.sent(), "Producer finished");
    Ok(tx.sent())
}
