use ndarray::Array2;

use crate::kernel::KernelParams;

use super::{clipped_window, collect_rows};

/// Inclusive 2D prefix sums: `table[[y, x]]` is the sum of every pixel at or
/// above row `y` and at or left of column `x`.
#[derive(Clone, Debug)]
pub struct SummedAreaTable {
    table: Array2<u64>,
}

impl SummedAreaTable {
    /// Row-wise prefix sums followed by a column-wise pass.
    pub fn new(image: &Array2<u16>) -> Self {
        let (slow, fast) = image.dim();
        let mut table = Array2::<u64>::zeros((slow, fast));
        for y in 0..slow {
            let mut running = 0u64;
            for x in 0..fast {
                running += u64::from(image[[y, x]]);
                table[[y, x]] = running;
            }
        }
        for y in 1..slow {
            for x in 0..fast {
                table[[y, x]] += table[[y - 1, x]];
            }
        }
        Self { table }
    }

    pub fn dim(&self) -> (usize, usize) {
        self.table.dim()
    }

    /// Prefix value with one-past-the-edge coordinates; anything above or
    /// left of the image contributes zero.
    fn prefix(&self, x_end: usize, y_end: usize) -> u64 {
        if x_end == 0 || y_end == 0 {
            0
        } else {
            self.table[[y_end - 1, x_end - 1]]
        }
    }

    /// Sum over the half-open rectangle `[x0, x1) x [y0, y1)`.
    pub fn rect_sum(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> u64 {
        self.prefix(x1, y1) + self.prefix(x0, y0) - self.prefix(x0, y1) - self.prefix(x1, y0)
    }

    /// Box sum centered on `(x, y)` with the window clipped to the image.
    pub fn kernel_sum(&self, x: usize, y: usize, params: &KernelParams) -> u64 {
        let (slow, fast) = self.dim();
        let (x0, x1) = clipped_window(x, params.kernel_width, fast);
        let (y0, y1) = clipped_window(y, params.kernel_height, slow);
        self.rect_sum(x0, y0, x1, y1)
    }
}

/// Box sum of every pixel via a summed-area table, O(image) regardless of
/// kernel size.
pub fn sat_kernel_sum(image: &Array2<u16>, params: &KernelParams) -> Array2<u32> {
    let sat = SummedAreaTable::new(image);
    let (slow, fast) = image.dim();
    collect_rows(slow, fast, |y| {
        (0..fast)
            .map(|x| u32::try_from(sat.kernel_sum(x, y, params)).unwrap_or(u32::MAX))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_hand_computed() {
        let image = Array2::from_shape_vec((2, 3), vec![1u16, 2, 3, 4, 5, 6]).unwrap();
        let sat = SummedAreaTable::new(&image);
        assert_eq!(sat.table, Array2::from_shape_vec((2, 3), vec![1u64, 3, 6, 5, 12, 21]).unwrap());
        // Right two columns.
        assert_eq!(sat.rect_sum(1, 0, 3, 2), 2 + 3 + 5 + 6);
        // Top row.
        assert_eq!(sat.rect_sum(0, 0, 3, 1), 1 + 2 + 3);
    }

    #[test]
    fn clipped_corner() {
        let image = Array2::<u16>::ones((8, 8));
        let sat = SummedAreaTable::new(&image);
        let params = KernelParams::new(1, 1, 4);
        assert_eq!(sat.kernel_sum(0, 0, &params), 4);
        assert_eq!(sat.kernel_sum(3, 3, &params), 9);
        assert_eq!(sat.kernel_sum(7, 3, &params), 6);
    }

    #[test]
    fn whole_image_total_does_not_overflow() {
        let image = Array2::from_elem((300, 300), u16::MAX);
        let sat = SummedAreaTable::new(&image);
        assert_eq!(sat.rect_sum(0, 0, 300, 300), 300 * 300 * u16::MAX as u64);
    }

    #[test]
    fn oversized_window_saturates() {
        // Every window covers all 66000 pixels, past what u32 can hold.
        let image = Array2::from_elem((220, 300), u16::MAX);
        let params = KernelParams::new(300, 300, 512);
        let sums = sat_kernel_sum(&image, &params);
        assert!(sums.iter().all(|&s| s == u32::MAX));
    }
}
