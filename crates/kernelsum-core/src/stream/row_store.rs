use super::block::{add_blocks, sub_blocks};

/// Circular store of running row totals, `2 * KH + 1` rows deep.
///
/// Slot `y % depth` holds, for every block, the cumulative sum of horizontal
/// sums of all rows up to `y`. The vertical box sum over the last `depth`
/// rows is then one addition (append the new row) and one subtraction (drop
/// the total that is about to be overwritten).
#[derive(Clone, Debug)]
pub struct RowAccumulator {
    totals: Vec<u32>,
    depth: usize,
    full_blocks: usize,
    block_size: usize,
    scratch: Vec<u32>,
}

impl RowAccumulator {
    pub fn new(kernel_height: usize, full_blocks: usize, block_size: usize) -> Self {
        let depth = kernel_height * 2 + 1;
        Self {
            totals: vec![0; depth * full_blocks * block_size],
            depth,
            full_blocks,
            block_size,
            scratch: vec![0; block_size],
        }
    }

    /// Depth of the circular store.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of `u32` cells held, independent of image height.
    pub fn cells(&self) -> usize {
        self.totals.len()
    }

    /// `u32` cells including the per-block scratch row.
    pub fn working_cells(&self) -> usize {
        self.totals.len() + self.scratch.len()
    }

    pub fn reset(&mut self) {
        self.totals.fill(0);
    }

    fn cell(&self, slot: usize, block: usize) -> std::ops::Range<usize> {
        let start = (slot * self.full_blocks + block) * self.block_size;
        start..start + self.block_size
    }

    /// Fold the horizontal sums of row `y`, block `block` into the store and
    /// write the vertical window sum for rows `y - 2KH ..= y` into `out`.
    pub fn accumulate(&mut self, y: usize, block: usize, row_sums: &[u32], out: &mut [u32]) {
        let prev_slot = (y + self.depth - 1) % self.depth;
        let oldest_slot = y % self.depth;
        let prev = self.cell(prev_slot, block);
        let oldest = self.cell(oldest_slot, block);

        add_blocks(row_sums, &self.totals[prev], &mut self.scratch);
        sub_blocks(&self.scratch, &self.totals[oldest.clone()], out);
        self.totals[oldest].copy_from_slice(&self.scratch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_sum_spans_depth_rows() {
        // KH = 1: windows of three rows.
        let mut store = RowAccumulator::new(1, 1, 2);
        let mut out = [0u32; 2];
        let rows = [[1u32, 10], [2, 20], [3, 30], [4, 40], [5, 50]];
        let mut windows = Vec::new();
        for (y, row) in rows.iter().enumerate() {
            store.accumulate(y, 0, row, &mut out);
            windows.push(out);
        }
        assert_eq!(windows[0], [1, 10]);
        assert_eq!(windows[1], [3, 30]);
        assert_eq!(windows[2], [6, 60]);
        assert_eq!(windows[3], [9, 90]);
        assert_eq!(windows[4], [12, 120]);
    }

    #[test]
    fn blocks_are_independent() {
        let mut store = RowAccumulator::new(0, 2, 1);
        let mut out = [0u32; 1];
        store.accumulate(0, 0, &[7], &mut out);
        assert_eq!(out, [7]);
        store.accumulate(0, 1, &[3], &mut out);
        assert_eq!(out, [3]);
        store.accumulate(1, 0, &[1], &mut out);
        assert_eq!(out, [1]);
    }

    #[test]
    fn memory_depends_on_width_not_height() {
        let store = RowAccumulator::new(3, 259, 16);
        assert_eq!(store.depth(), 7);
        assert_eq!(store.cells(), 7 * 259 * 16);
    }
}
