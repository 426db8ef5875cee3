//! Where frames come from. The pipeline only needs dimensions, a frame
//! count, a per-dataset mask and the ability to fill a caller-owned buffer.

pub mod memory;
pub mod sample;
pub mod ser;

pub use memory::InMemorySource;
pub use sample::SampleSource;
pub use ser::SerSource;

use crate::error::{KernelSumError, Result};
use crate::frame::{Mask, SourceInfo};

pub trait ImageSource: Send {
    /// `(fast, slow)`: row width and row count.
    fn dimensions(&self) -> (usize, usize);

    fn frame_count(&self) -> usize;

    /// Validity mask shared by every frame.
    fn load_mask(&self) -> Result<Mask>;

    /// Fill `destination` (`fast * slow` pixels, row-major) with frame `index`.
    fn load_frame(&self, index: usize, destination: &mut [u16]) -> Result<()>;

    fn info(&self) -> SourceInfo;
}

/// Common argument checks for [`ImageSource::load_frame`].
pub(crate) fn check_frame_request(
    source: &dyn ImageSource,
    index: usize,
    destination: &[u16],
) -> Result<()> {
    let total = source.frame_count();
    if index >= total {
        return Err(KernelSumError::FrameIndexOutOfRange { index, total });
    }
    let (fast, slow) = source.dimensions();
    if destination.len() != fast * slow {
        return Err(KernelSumError::BufferSize {
            expected: fast * slow,
            actual: destination.len(),
        });
    }
    Ok(())
}
