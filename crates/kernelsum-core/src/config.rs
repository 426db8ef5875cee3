use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_MAX_REPORTED_MISMATCHES, DEFAULT_NAIVE_PIXEL_LIMIT};
use crate::kernel::KernelParams;

/// Everything needed to process a dataset, loadable from TOML.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Dataset to read. The built-in sample source is used when absent.
    pub input: Option<PathBuf>,
    /// Companion pixel-mask image for the dataset.
    pub mask: Option<PathBuf>,
    /// Index into the list of execution contexts.
    pub device: usize,
    /// Box-sum level at or above which a pixel is reported as strong.
    pub strong_threshold: Option<u32>,
    /// `[fast, slow]` the dataset is required to have.
    pub expected_dimensions: Option<[usize; 2]>,
    /// Directory to write per-frame sum images into.
    pub output_dir: Option<PathBuf>,
    /// Stop after this many frames.
    pub max_frames: Option<usize>,
    pub kernel: KernelParams,
    pub validation: ValidationConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Cross-check every frame against the summed-area-table reference.
    pub enabled: bool,
    /// Also run the naive reference for images up to this many pixels.
    pub naive_pixel_limit: usize,
    /// Mismatching pixels kept per frame for reporting.
    pub max_reported: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            naive_pixel_limit: DEFAULT_NAIVE_PIXEL_LIMIT,
            max_reported: DEFAULT_MAX_REPORTED_MISMATCHES,
        }
    }
}
