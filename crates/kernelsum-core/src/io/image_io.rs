use std::path::Path;

use image::{ImageBuffer, ImageFormat, Luma};
use ndarray::Array2;

use crate::error::Result;

/// Save box sums as 16-bit grayscale, saturating at `u16::MAX`.
/// The format follows the file extension (PNG, otherwise TIFF).
pub fn save_sums(sums: &Array2<u32>, path: &Path) -> Result<()> {
    let (h, w) = sums.dim();

    let mut pixels: Vec<u16> = Vec::with_capacity(h * w);
    for row in 0..h {
        for col in 0..w {
            pixels.push(sums[[row, col]].min(u32::from(u16::MAX)) as u16);
        }
    }

    let img = ImageBuffer::<Luma<u16>, Vec<u16>>::from_raw(w as u32, h as u32, pixels)
        .ok_or_else(|| std::io::Error::other("sum buffer does not match its dimensions"))?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("png") => img.save_with_format(path, ImageFormat::Png)?,
        _ => img.save_with_format(path, ImageFormat::Tiff)?,
    }
    Ok(())
}

/// Read a detector pixel mask stored as a grayscale image.
///
/// Returns `(fast, slow, raw)` where a raw value of zero marks a good pixel.
pub fn load_pixel_mask(path: &Path) -> Result<(usize, usize, Vec<u32>)> {
    let img = image::open(path)?.into_luma16();
    let (w, h) = img.dimensions();
    let raw = img.pixels().map(|p| u32::from(p.0[0])).collect();
    Ok((w as usize, h as usize, raw))
}
