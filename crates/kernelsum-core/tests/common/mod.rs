use kernelsum_core::frame::Image;
use kernelsum_core::source::ser::SER_HEADER_SIZE;
use ndarray::Array2;

/// Image of `fast x slow` pixels all set to `value`.
pub fn constant_image(fast: usize, slow: usize, value: u16) -> Image {
    Image::new(Array2::from_elem((slow, fast), value))
}

/// Deterministic pseudo-random image covering the full 16-bit range.
pub fn noise_image(fast: usize, slow: usize, seed: u64) -> Image {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let data = Array2::from_shape_fn((slow, fast), |_| {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 48) as u16
    });
    Image::new(data)
}

/// Image whose pixel value encodes its position, handy for spotting
/// misplaced blocks.
pub fn gradient_image(fast: usize, slow: usize) -> Image {
    Image::new(Array2::from_shape_fn((slow, fast), |(y, x)| {
        (y * 97 + x * 13) as u16
    }))
}

/// Build a SER file header for mono 16-bit little-endian frames.
pub fn build_ser_header(width: u32, height: u32, num_frames: usize) -> Vec<u8> {
    let mut buf = Vec::with_capacity(SER_HEADER_SIZE);

    buf.extend_from_slice(b"LUCAM-RECORDER");
    // LuID
    buf.extend_from_slice(&0i32.to_le_bytes());
    // ColorID: mono
    buf.extend_from_slice(&0i32.to_le_bytes());
    // LittleEndian
    buf.extend_from_slice(&0i32.to_le_bytes());
    buf.extend_from_slice(&(width as i32).to_le_bytes());
    buf.extend_from_slice(&(height as i32).to_le_bytes());
    // PixelDepth
    buf.extend_from_slice(&16i32.to_le_bytes());
    buf.extend_from_slice(&(num_frames as i32).to_le_bytes());
    // Observer, Instrument, Telescope
    buf.extend_from_slice(&[0u8; 120]);
    // DateTime, DateTimeUTC
    buf.extend_from_slice(&[0u8; 16]);

    assert_eq!(buf.len(), SER_HEADER_SIZE);
    buf
}

/// Complete 16-bit SER file holding `frames`.
pub fn build_ser(frames: &[Image]) -> Vec<u8> {
    let (fast, slow) = (frames[0].fast(), frames[0].slow());
    let mut buf = build_ser_header(fast as u32, slow as u32, frames.len());
    for frame in frames {
        for &px in frame.data.iter() {
            buf.extend_from_slice(&px.to_le_bytes());
        }
    }
    buf
}

/// Write bytes to a temporary file that lives as long as the handle.
pub fn write_temp(data: &[u8]) -> tempfile::NamedTempFile {
    use std::io::Write;
    let mut f = tempfile::NamedTempFile::new().expect("create temp file");
    f.write_all(data).expect("write data");
    f.flush().expect("flush");
    f
}
