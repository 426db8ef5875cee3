use crate::mask::MaskFilter;
use crate::stream::StreamOutput;

/// A pixel whose neighborhood is brighter than the detection threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StrongPixel {
    pub x: usize,
    pub y: usize,
    pub kernel_sum: u32,
}

/// Scan the covered region of a streaming result for strong pixels.
///
/// A pixel qualifies when its box sum reaches `threshold` and every pixel in
/// its neighborhood is valid. Results are in row-major order.
pub fn find_strong_pixels(
    output: &StreamOutput,
    mask: &MaskFilter,
    threshold: u32,
) -> Vec<StrongPixel> {
    let mut found = Vec::new();
    for y in output.rows.clone() {
        for x in output.cols.clone() {
            let kernel_sum = output.sums[[y, x]];
            if kernel_sum >= threshold && !mask.has_invalid_neighbor(x, y) {
                found.push(StrongPixel { x, y, kernel_sum });
            }
        }
    }
    found
}
