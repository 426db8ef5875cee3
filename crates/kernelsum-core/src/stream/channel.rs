use std::sync::mpsc::{sync_channel, Receiver, SyncSender};

use crate::error::{KernelSumError, Result};

use super::block::PixelBlock;

/// Create a bounded single-producer single-consumer block channel.
///
/// `send` blocks while `capacity` blocks are queued; `receive` blocks while
/// the queue is empty. Blocks arrive in exactly the order they were sent.
pub fn pixel_channel(capacity: usize) -> (BlockSender, BlockReceiver) {
    let (tx, rx) = sync_channel(capacity);
    (BlockSender { tx, sent: 0 }, BlockReceiver { rx, received: 0 })
}

/// Producer end of a [`pixel_channel`].
pub struct BlockSender {
    tx: SyncSender<PixelBlock>,
    sent: usize,
}

impl BlockSender {
    pub fn send(&mut self, block: PixelBlock) -> Result<()> {
        self.tx
            .send(block)
            .map_err(|_| KernelSumError::ChannelClosed("consumer stopped receiving"))?;
        self.sent += 1;
        Ok(())
    }

    /// Blocks accepted so far.
    pub fn sent(&self) -> usize {
        self.sent
    }
}

/// Consumer end of a [`pixel_channel`].
pub struct BlockReceiver {
    rx: Receiver<PixelBlock>,
    received: usize,
}

impl BlockReceiver {
    pub fn receive(&mut self) -> Result<PixelBlock> {
        let block = self
            .rx
            .recv()
            .map_err(|_| KernelSumError::ChannelClosed("producer finished early"))?;
        self.received += 1;
        Ok(block)
    }

    /// Blocks delivered so far.
    pub fn received(&self) -> usize {
        self.received
    }
}
