use std::sync::Arc;
use std::time::{Duration, Instant};

use ndarray::Array3;
use tracing::{debug, info, warn};

use crate::compute::{select_context, ExecutionContext};
use crate::config::RunConfig;
use crate::detector::ModuleLayout;
use crate::error::{KernelSumError, Result};
use crate::frame::{Image, Mask, SourceInfo};
use crate::io::image_io::save_sums;
use crate::mask::MaskFilter;
use crate::reference::{naive_kernel_sum, sat_kernel_sum};
use crate::source::ImageSource;
use crate::stream::block::BlockLayout;
use crate::stream::{StreamOutput, StreamingPipeline};
use crate::strong::{find_strong_pixels, StrongPixel};
use crate::validate::{compare_interior, count_differences, ReferenceKind, ValidationReport};

/// Everything produced for one frame.
#[derive(Clone, Debug)]
pub struct FrameReport {
    pub image: Image,
    pub output: StreamOutput,
    pub strong: Vec<StrongPixel>,
    pub validation: Vec<ValidationReport>,
    pub elapsed: Duration,
}

impl FrameReport {
    pub fn index(&self) -> usize {
        self.image.index
    }

    /// True when every reference the frame was checked against agreed.
    pub fn validated(&self) -> bool {
        self.validation.iter().all(ValidationReport::passed)
    }
}

/// Totals over a run of frames.
#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    pub frames: usize,
    pub strong_pixels: usize,
    pub failed_validations: usize,
    pub elapsed: Duration,
}

/// An open dataset: the source, its mask and everything derived from them
/// once, plus the context frames are processed on.
pub struct Session {
    source: Box<dyn ImageSource>,
    config: RunConfig,
    context: Arc<dyn ExecutionContext>,
    pipeline: StreamingPipeline,
    mask: Mask,
    mask_filter: MaskFilter,
    modules: Option<ModuleLayout>,
    module_valid: Option<Vec<usize>>,
}

impl Session {
    /// Open a dataset, selecting the execution context from `config.device`.
    pub fn open(source: Box<dyn ImageSource>, config: RunConfig) -> Result<Self> {
        let context = select_context(config.device)?;
        Self::with_context(source, config, context)
    }

    pub fn with_context(
        source: Box<dyn ImageSource>,
        config: RunConfig,
        context: Arc<dyn ExecutionContext>,
    ) -> Result<Self> {
        let (fast, slow) = source.dimensions();
        if let Some([expected_fast, expected_slow]) = config.expected_dimensions {
            if (expected_fast, expected_slow) != (fast, slow) {
                return Err(KernelSumError::DimensionMismatch {
                    expected_fast,
                    expected_slow,
                    actual_fast: fast,
                    actual_slow: slow,
                });
            }
        }
        if source.frame_count() == 0 {
            return Err(KernelSumError::EmptyDataset);
        }

        let pipeline = StreamingPipeline::new(fast, slow, &config.kernel)?;
        let layout = pipeline.layout();
        if layout.remainder > 0 {
            warn!(
                remainder = layout.remainder,
                full_blocks = layout.full_blocks,
                "Row width is not a multiple of the block size; trailing pixels are not processed"
            );
        }

        let mask = source.load_mask()?;
        if (mask.fast(), mask.slow()) != (fast, slow) {
            return Err(KernelSumError::MaskSize {
                expected: fast * slow,
                actual: mask.fast() * mask.slow(),
            });
        }
        let mask_filter = MaskFilter::new(&mask, &config.kernel);
        let modules = ModuleLayout::detect(fast, slow);
        let module_valid = modules.map(|m| valid_per_module(&m, &mask));
        if let Some(ref counts) = module_valid {
            let full = modules.map_or(0, |m| m.module_fast * m.module_slow);
            let damaged = counts.iter().filter(|&&n| n < full).count();
            debug!(damaged, "Modules with invalid pixels");
        }

        info!(
            fast,
            slow,
            frames = source.frame_count(),
            valid_pixels = mask.valid_count(),
            modules = modules.map(|m| m.module_count()),
            device = context.name(),
            "Dataset opened"
        );

        Ok(Self {
            source,
            config,
            context,
            pipeline,
            mask,
            mask_filter,
            modules,
            module_valid,
        })
    }

    pub fn info(&self) -> SourceInfo {
        self.source.info()
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn layout(&self) -> &BlockLayout {
        self.pipeline.layout()
    }

    pub fn context_name(&self) -> &str {
        self.context.name()
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    pub fn mask_filter(&self) -> &MaskFilter {
        &self.mask_filter
    }

    /// Module geometry, when the image size matches a known detector.
    pub fn module_layout(&self) -> Option<&ModuleLayout> {
        self.modules.as_ref()
    }

    /// Valid pixels in each module, numbered row-major across the detector.
    pub fn module_valid_pixels(&self) -> Option<&[usize]> {
        self.module_valid.as_deref()
    }

    /// Cut a frame into its modules, `[module, row, column]`, dropping the
    /// gap pixels between them.
    pub fn module_frames(&self, image: &Image) -> Option<Array3<u16>> {
        self.modules.map(|m| m.extract_modules(&image.data))
    }

    /// Frames that [`Session::process_all`] will visit.
    pub fn frame_count(&self) -> usize {
        let total = self.source.frame_count();
        self.config.max_frames.map_or(total, |n| n.min(total))
    }

    /// Read one frame from the source.
    pub fn load_image(&self, index: usize) -> Result<Image> {
        let (fast, slow) = self.source.dimensions();
        let mut pixels = vec![0u16; fast * slow];
        self.source.load_frame(index, &mut pixels)?;
        let mut image = Image::from_raw(fast, slow, pixels)?;
        image.index = index;
        Ok(image)
    }

    /// Stream one frame, then detect strong pixels and cross-check it.
    pub fn process_frame(&self, index: usize) -> Result<FrameReport> {
        let image = self.load_image(index)?;

        let start = Instant::now();
        let output = self.pipeline.run(&image, self.context.as_ref())?;
        let elapsed = start.elapsed();
        debug!(frame = index, elapsed_ms = elapsed.as_secs_f64() * 1000.0, "Frame streamed");

        let strong = match self.config.strong_threshold {
            Some(threshold) => find_strong_pixels(&output, &self.mask_filter, threshold),
            None => Vec::new(),
        };

        let validation = if self.config.validation.enabled {
            self.validate(&image, &output)
        } else {
            Vec::new()
        };

        if let Some(ref dir) = self.config.output_dir {
            let path = dir.join(format!("sums_{index:05}.tiff"));
            save_sums(&output.sums, &path)?;
            debug!(path = %path.display(), "Saved sums");
        }

        Ok(FrameReport {
            image,
            output,
            strong,
            validation,
            elapsed,
        })
    }

    fn validate(&self, image: &Image, output: &StreamOutput) -> Vec<ValidationReport> {
        let params = &self.config.kernel;
        let max_reported = self.config.validation.max_reported;

        let sat = sat_kernel_sum(&image.data, params);
        let mut reports = vec![compare_interior(
            output,
            &sat,
            ReferenceKind::SummedAreaTable,
            params,
            max_reported,
        )];

        if image.data.len() <= self.config.validation.naive_pixel_limit {
            let naive = naive_kernel_sum(&image.data, params);
            let disagreements = count_differences(&sat, &naive);
            if disagreements > 0 {
                warn!(frame = image.index, disagreements, "SAT and naive references disagree");
            }
            reports.push(compare_interior(
                output,
                &naive,
                ReferenceKind::Naive,
                params,
                max_reported,
            ));
        }

        for report in reports.iter().filter(|r| !r.passed()) {
            warn!(
                frame = image.index,
                reference = %report.reference,
                mismatches = report.mismatch_count,
                checked = report.checked,
                "Streaming sums differ from reference in the interior"
            );
        }
        reports
    }

    /// Process frames in order, handing each report to `on_frame`.
    pub fn process_all<F>(&self, mut on_frame: F) -> Result<RunSummary>
    where
        F: FnMut(&FrameReport),
    {
        let start = Instant::now();
        let mut summary = RunSummary::default();
        for index in 0..self.frame_count() {
            let report = self.process_frame(index)?;
            summary.frames += 1;
            summary.strong_pixels += report.strong.len();
            if !report.validated() {
                summary.failed_validations += 1;
            }
            on_frame(&report);
        }
        summary.elapsed = start.elapsed();
        info!(
            frames = summary.frames,
            strong_pixels = summary.strong_pixels,
            failed_validations = summary.failed_validations,
            "Run complete"
        );
        Ok(summary)
    }
}

/// Open the dataset named by `config`, or the sample dataset when it names none.
pub fn open_source(config: &RunConfig) -> Result<Box<dyn ImageSource>> {
    use crate::source::{SampleSource, SerSource};

    match config.input.as_deref() {
        Some(path) => {
            let mut source = SerSource::open(path)?;
            if let Some(mask) = config.mask.as_deref() {
                source = source.with_mask_file(mask);
            }
            Ok(Box::new(source))
        }
        None => {
            info!("No dataset given; using sample data");
            Ok(Box::new(SampleSource::default()))
        }
    }
}

fn valid_per_module(layout: &ModuleLayout, mask: &Mask) -> Vec<usize> {
    layout
        .extract_modules(&mask.valid)
        .outer_iter()
        .map(|module| module.iter().filter(|&&valid| valid).count())
        .collect()
}
