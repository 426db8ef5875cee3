use ndarray::Array2;

use crate::kernel::KernelParams;

use super::{clipped_window, collect_rows};

/// Direct summation: every output pixel re-reads its whole (clipped) window.
pub fn naive_kernel_sum(image: &Array2<u16>, params: &KernelParams) -> Array2<u32> {
    let (slow, fast) = image.dim();
    collect_rows(slow, fast, |y| {
        let (y0, y1) = clipped_window(y, params.kernel_height, slow);
        (0..fast)
            .map(|x| {
                let (x0, x1) = clipped_window(x, params.kernel_width, fast);
                let mut sum = 0u64;
                for row in y0..y1 {
                    for col in x0..x1 {
                        sum += u64::from(image[[row, col]]);
                    }
                }
                u32::try_from(sum).unwrap_or(u32::MAX)
            })
            .collect()
    })
}
