//! Whole-image box sums used to check the streaming pipeline.
//!
//! Both algorithms clip the kernel to the image, so border pixels get the sum
//! of a smaller window rather than no value at all. Sums beyond `u32::MAX`
//! saturate.

pub mod naive;
pub mod sat;

pub use naive::naive_kernel_sum;
pub use sat::{sat_kernel_sum, SummedAreaTable};

use ndarray::Array2;
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// Build a `(slow, fast)` array row by row, in parallel for large images.
pub(crate) fn collect_rows<F>(slow: usize, fast: usize, row_fn: F) -> Array2<u32>
where
    F: Fn(usize) -> Vec<u32> + Sync + Send,
{
    let rows: Vec<Vec<u32>> = if slow * fast >= PARALLEL_PIXEL_THRESHOLD {
        (0..slow).into_par_iter().map(&row_fn).collect()
    } else {
        (0..slow).map(&row_fn).collect()
    };
    let mut out = Array2::<u32>::zeros((slow, fast));
    for (y, row) in rows.into_iter().enumerate() {
        for (x, v) in row.into_iter().enumerate() {
            out[[y, x]] = v;
        }
    }
    out
}

/// Inclusive window `[center - half, center + half]` clipped to `0..len`.
pub(crate) fn clipped_window(center: usize, half: usize, len: usize) -> (usize, usize) {
    (center.saturating_sub(half), (center + half + 1).min(len))
}
