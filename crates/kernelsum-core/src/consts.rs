/// Default one-direction width of the kernel. Total span is `2 * KW + 1`.
pub const DEFAULT_KERNEL_WIDTH: usize = 3;

/// Default one-direction height of the kernel. Total span is `2 * KH + 1`.
pub const DEFAULT_KERNEL_HEIGHT: usize = 3;

/// Default number of pixels moved through the channel at once.
pub const DEFAULT_BLOCK_SIZE: usize = 16;

/// Default number of blocks the producer may run ahead of the consumer.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 5;

/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Images at or below this pixel count are also checked against the naive
/// reference during validation.
pub const DEFAULT_NAIVE_PIXEL_LIMIT: usize = 262_144;

/// Cap on the number of mismatching pixels recorded per frame.
pub const DEFAULT_MAX_REPORTED_MISMATCHES: usize = 16;

/// Worker threads in the rayon execution context: one producer, one consumer.
pub const RAYON_CONTEXT_THREADS: usize = 2;
