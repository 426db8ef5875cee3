/// Working buffer for the horizontal pass over one row.
///
/// Laid out as `| lookback (KW) | block 0 (B) | block 1 (B) |`. Once block 1
/// has arrived every pixel of block 0 has its full horizontal neighborhood
/// in view: the tail of the previous block on the left and the head of the
/// next block on the right.
#[derive(Clone, Debug)]
pub struct RollingBuffer {
    pixels: Vec<u16>,
    block_size: usize,
    kernel_width: usize,
}

impl RollingBuffer {
    pub fn new(block_size: usize, kernel_width: usize) -> Self {
        Self {
            pixels: vec![0; block_size * 2 + kernel_width],
            block_size,
            kernel_width,
        }
    }

    /// Zero the buffer at the start of a row so the first block sees no
    /// left-hand neighbors.
    pub fn reset(&mut self) {
        self.pixels.fill(0);
    }

    pub fn load_block0(&mut self, block: &[u16]) {
        let start = self.kernel_width;
        self.pixels[start..start + self.block_size].copy_from_slice(block);
    }

    pub fn load_block1(&mut self, block: &[u16]) {
        let start = self.kernel_width + self.block_size;
        self.pixels[start..start + self.block_size].copy_from_slice(block);
    }

    /// Sum `2 * KW + 1` pixels around every position of block 0 into `out`,
    /// then shift left by one block so block 1 becomes the new block 0.
    pub fn sum_block0(&mut self, out: &mut [u32]) {
        let kw = self.kernel_width;
        for (center, slot) in out.iter_mut().enumerate().take(self.block_size) {
            // buffer[KW + center + i] for i in -KW..=KW
            *slot = self.pixels[center..=center + 2 * kw]
                .iter()
                .map(|&p| u32::from(p))
                .sum();
        }
        self.pixels.copy_within(self.block_size.., 0);
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}
