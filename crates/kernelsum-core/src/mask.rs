use ndarray::Array2;

use crate::frame::Mask;
use crate::kernel::KernelParams;
use crate::reference::sat_kernel_sum;

/// A detector mask box-filtered with the analysis kernel.
///
/// Each pixel holds the number of valid pixels in its (clipped) neighborhood.
/// Anything below the full kernel area means the neighborhood touches an
/// invalid pixel or the image edge.
#[derive(Clone, Debug)]
pub struct MaskFilter {
    counts: Array2<u32>,
    full_area: u32,
}

impl MaskFilter {
    pub fn new(mask: &Mask, params: &KernelParams) -> Self {
        Self {
            counts: sat_kernel_sum(&mask.to_counts(), params),
            full_area: params.area() as u32,
        }
    }

    /// Valid pixels in the neighborhood of `(x, y)`.
    pub fn valid_neighbors(&self, x: usize, y: usize) -> u32 {
        self.counts[[y, x]]
    }

    pub fn has_invalid_neighbor(&self, x: usize, y: usize) -> bool {
        self.counts[[y, x]] < self.full_area
    }

    /// Pixels whose neighborhood is fully valid.
    pub fn clean_count(&self) -> usize {
        self.counts.iter().filter(|&&c| c >= self.full_area).count()
    }

    pub fn counts(&self) -> &Array2<u32> {
        &self.counts
    }
}
