use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use kernelsum_core::config::RunConfig;
use kernelsum_core::session::{open_source, FrameReport, Session};
use tracing::debug;

use crate::{grid, summary};

#[derive(Args)]
pub struct RunArgs {
    /// Input SER file (sample data when omitted)
    pub file: Option<PathBuf>,

    /// Pixel mask image (zero = valid)
    #[arg(long)]
    pub mask: Option<PathBuf>,

    /// Execution context index, see `kernelsum devices` [default: 0]
    #[arg(short, long)]
    pub device: Option<usize>,

    /// Run config file (TOML); flags given alongside it take precedence
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Kernel half-width (KW) [default: 3]
    #[arg(long)]
    pub kernel_width: Option<usize>,

    /// Kernel half-height (KH) [default: 3]
    #[arg(long)]
    pub kernel_height: Option<usize>,

    /// Pixels per streamed block, a power of two [default: 16]
    #[arg(long)]
    pub block_size: Option<usize>,

    /// Skip the reference cross-check
    #[arg(long)]
    pub no_validate: bool,

    /// Report pixels whose box sum reaches this level
    #[arg(long)]
    pub threshold: Option<u32>,

    /// Write per-frame sums into this directory
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Process at most this many frames
    #[arg(long)]
    pub frames: Option<usize>,

    /// Draw the top-left corner of the first frame and its sums
    #[arg(long)]
    pub show: bool,
}

pub fn run(args: &RunArgs) -> Result<()> {
    let mut config = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        toml::from_str::<RunConfig>(&contents).context("Invalid run config")?
    } else {
        RunConfig::default()
    };
    apply_args(&mut config, args);
    debug!(?config, "Run config");

    if let Some(ref dir) = config.output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let source = open_source(&config).context("Failed to open dataset")?;
    let session = Session::open(source, config.clone())?;

    summary::print_run_summary(&config, &session);

    let pb = ProgressBar::new(session.frame_count() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:20} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );

    let mut first: Option<FrameReport> = None;
    let totals = session.process_all(|report| {
        pb.set_message(format!("Frame {}", report.index()));
        pb.inc(1);
        if args.show && first.is_none() {
            first = Some(report.clone());
        }
    })?;
    pb.finish_with_message("Done");

    if let Some(ref report) = first {
        grid::print_corner(report);
    }
    summary::print_run_results(&totals);

    if totals.failed_validations > 0 {
        bail!(
            "{} frame(s) differ from the reference sums",
            totals.failed_validations
        );
    }
    Ok(())
}

/// Overlay the flags that were given on top of `config`.
fn apply_args(config: &mut RunConfig, args: &RunArgs) {
    if args.file.is_some() {
        config.input = args.file.clone();
    }
    if args.mask.is_some() {
        config.mask = args.mask.clone();
    }
    if let Some(device) = args.device {
        config.device = device;
    }
    if let Some(kw) = args.kernel_width {
        config.kernel.kernel_width = kw;
    }
    if let Some(kh) = args.kernel_height {
        config.kernel.kernel_height = kh;
    }
    if let Some(b) = args.block_size {
        config.kernel.block_size = b;
    }
    if args.no_validate {
        config.validation.enabled = false;
    }
    if args.threshold.is_some() {
        config.strong_threshold = args.threshold;
    }
    if args.output_dir.is_some() {
        config.output_dir = args.output_dir.clone();
    }
    if args.frames.is_some() {
        config.max_frames = args.frames;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use kernelsum_core::kernel::KernelParams;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        run: RunArgs,
    }

    fn parse(argv: &[&str]) -> RunArgs {
        Cli::try_parse_from(std::iter::once("kernelsum").chain(argv.iter().copied()))
            .unwrap()
            .run
    }

    #[test]
    fn no_flags_keep_config_values() {
        let mut config = RunConfig {
            device: 1,
            strong_threshold: Some(700),
            max_frames: Some(4),
            kernel: KernelParams::new(5, 2, 32),
            ..RunConfig::default()
        };
        apply_args(&mut config, &parse(&[]));
        assert_eq!(config.device, 1);
        assert_eq!(config.strong_threshold, Some(700));
        assert_eq!(config.max_frames, Some(4));
        assert_eq!(config.kernel, KernelParams::new(5, 2, 32));
        assert!(config.validation.enabled);
    }

    #[test]
    fn given_flags_override_config_file() {
        let mut config = RunConfig {
            device: 1,
            strong_threshold: Some(700),
            kernel: KernelParams::new(5, 2, 32),
            ..RunConfig::default()
        };
        let args = parse(&[
            "frames.ser",
            "-d",
            "0",
            "--threshold",
            "900",
            "--frames",
            "2",
            "--output-dir",
            "out",
            "--no-validate",
            "--kernel-height",
            "4",
        ]);
        apply_args(&mut config, &args);
        assert_eq!(config.input, Some(PathBuf::from("frames.ser")));
        assert_eq!(config.device, 0);
        assert_eq!(config.strong_threshold, Some(900));
        assert_eq!(config.max_frames, Some(2));
        assert_eq!(config.output_dir, Some(PathBuf::from("out")));
        assert!(!config.validation.enabled);
        assert_eq!(config.kernel, KernelParams::new(5, 4, 32));
    }

    #[test]
    fn flags_alone_build_on_defaults() {
        let mut config = RunConfig::default();
        apply_args(&mut config, &parse(&["--kernel-width", "1", "--block-size", "8"]));
        assert_eq!(config.kernel, KernelParams::new(1, 3, 8));
        assert_eq!(config.input, None);
    }
}
