use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use kernelsum_core::config::RunConfig;
use kernelsum_core::detector::ModuleLayout;
use kernelsum_core::kernel::KernelParams;
use kernelsum_core::session::open_source;
use kernelsum_core::stream::auxiliary_bytes;
use kernelsum_core::stream::block::BlockLayout;

#[derive(Args)]
pub struct InfoArgs {
    /// Input SER file (sample data when omitted)
    pub file: Option<PathBuf>,

    /// Pixel mask image (zero = valid)
    #[arg(long)]
    pub mask: Option<PathBuf>,

    /// Block size to report the layout for
    #[arg(long, default_value = "16")]
    pub block_size: usize,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let config = RunConfig {
        input: args.file.clone(),
        mask: args.mask.clone(),
        ..RunConfig::default()
    };
    let source = open_source(&config).context("Failed to open dataset")?;
    let info = source.info();
    let mask = source.load_mask().context("Failed to load pixel mask")?;

    match info.filename {
        Some(ref path) => println!("File:        {}", path.display()),
        None => println!("File:        (sample data)"),
    }
    println!("Source:      {}", info.kind);
    println!("Frames:      {}", info.total_frames);
    println!("Dimensions:  {}x{}", info.fast, info.slow);
    println!("Bit depth:   {}", info.bit_depth);
    println!(
        "Valid:       {} of {} pixels",
        mask.valid_count(),
        info.fast * info.slow
    );

    if let Some(modules) = ModuleLayout::detect(info.fast, info.slow) {
        println!(
            "Modules:     {} ({}x{} of {}x{})",
            modules.module_count(),
            modules.modules_fast,
            modules.modules_slow,
            modules.module_fast,
            modules.module_slow
        );
    }

    let params = KernelParams {
        block_size: args.block_size,
        ..KernelParams::default()
    };
    params.validate()?;
    let layout = BlockLayout::new(info.fast, info.slow, params.block_size);
    println!(
        "Blocks:      {} x {} px per row, {} px dropped",
        layout.full_blocks, layout.block_size, layout.remainder
    );
    if layout.full_blocks >= 2 {
        let kib = auxiliary_bytes(&layout, &params) as f64 / 1024.0;
        println!("Working set: {:.1} KiB", kib);
    }

    Ok(())
}
