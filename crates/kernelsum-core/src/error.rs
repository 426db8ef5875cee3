use thiserror::Error;

#[derive(Error, Debug)]
pub enum KernelSumError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid SER file: {0}")]
    InvalidSer(String),

    #[error("Invalid image dimensions: {fast}x{slow}")]
    InvalidDimensions { fast: usize, slow: usize },

    #[error("Image is {actual_fast}x{actual_slow} but {expected_fast}x{expected_slow} was configured")]
    DimensionMismatch {
        expected_fast: usize,
        expected_slow: usize,
        actual_fast: usize,
        actual_slow: usize,
    },

    #[error("Invalid kernel configuration: {0}")]
    InvalidKernel(String),

    #[error("Frame index {index} out of range (total: {total})")]
    FrameIndexOutOfRange { index: usize, total: usize },

    #[error("Buffer holds {actual} pixels, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("Mask has {actual} pixels, expected {expected}")]
    MaskSize { expected: usize, actual: usize },

    #[error("Pixel channel closed: {0}")]
    ChannelClosed(&'static str),

    #[error("Asked for device ({requested}) that is higher than the number of devices ({available})")]
    ContextIndexOutOfRange { requested: usize, available: usize },

    #[error("No execution context matched the selection")]
    NoMatchingContext,

    #[error("Execution context error: {0}")]
    Context(String),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Empty dataset")]
    EmptyDataset,
}

pub type Result<T> = std::result::Result<T, KernelSumError>;
