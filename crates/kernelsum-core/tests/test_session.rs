#[allow(dead_code)]
mod common;

use kernelsum_core::compute::{available_contexts, create_context, ContextKind};
use kernelsum_core::config::RunConfig;
use kernelsum_core::detector::ModuleLayout;
use kernelsum_core::error::KernelSumError;
use kernelsum_core::frame::Mask;
use kernelsum_core::kernel::KernelParams;
use kernelsum_core::session::{open_source, Session};
use kernelsum_core::source::{ImageSource, InMemorySource, SampleSource};
use kernelsum_core::stream::StreamingPipeline;

fn sample_config() -> RunConfig {
    RunConfig {
        strong_threshold: Some(900),
        ..RunConfig::default()
    }
}

#[test]
fn test_sample_dataset_end_to_end() {
    let source = SampleSource::new(128, 96, 3);
    let spots: Vec<_> = (0..3).map(|i| source.spot_centers(i)).collect();
    let session = Session::open(Box::new(source), sample_config()).unwrap();

    assert_eq!(session.frame_count(), 3);
    assert!(session.module_layout().is_none());
    assert_eq!(session.layout().full_blocks, 8);

    let mut seen = Vec::new();
    let summary = session
        .process_all(|report| {
            assert!(report.validated(), "frame {}", report.index());
            // SAT plus naive: the image is small enough for both.
            assert_eq!(report.validation.len(), 2);
            for px in &report.strong {
                assert!(!session.mask_filter().has_invalid_neighbor(px.x, px.y));
                let near_spot = spots[report.index()]
                    .iter()
                    .any(|&(cx, cy)| px.x.abs_diff(cx) <= 4 && px.y.abs_diff(cy) <= 4);
                assert!(near_spot, "strong pixel {px:?} far from any spot");
            }
            seen.push((report.index(), report.strong.len()));
        })
        .unwrap();

    assert_eq!(summary.frames, 3);
    assert_eq!(summary.failed_validations, 0);
    assert_eq!(seen.iter().map(|(i, _)| *i).collect::<Vec<_>>(), vec![0, 1, 2]);
    // The spot at (10, 10) in frame 0 sits well inside the clean region.
    assert!(seen[0].1 > 0);
    assert_eq!(summary.strong_pixels, seen.iter().map(|(_, n)| n).sum::<usize>());
}

#[test]
fn test_max_frames_limits_run() {
    let config = RunConfig {
        max_frames: Some(2),
        ..RunConfig::default()
    };
    let session = Session::open(Box::new(SampleSource::new(64, 64, 5)), config).unwrap();
    let summary = session.process_all(|_| {}).unwrap();
    assert_eq!(summary.frames, 2);
}

#[test]
fn test_expected_dimensions_are_enforced() {
    let config = RunConfig {
        expected_dimensions: Some([256, 256]),
        ..RunConfig::default()
    };
    let result = Session::open(Box::new(SampleSource::new(128, 96, 1)), config);
    assert!(matches!(
        result,
        Err(KernelSumError::DimensionMismatch {
            expected_fast: 256,
            actual_fast: 128,
            ..
        })
    ));
}

#[test]
fn test_device_index_out_of_range() {
    let config = RunConfig {
        device: available_contexts().len(),
        ..RunConfig::default()
    };
    let result = Session::open(Box::new(SampleSource::default()), config);
    assert!(matches!(
        result,
        Err(KernelSumError::ContextIndexOutOfRange { .. })
    ));
}

#[test]
fn test_in_memory_source_with_mask() {
    let frames = vec![
        common::noise_image(48, 20, 1),
        common::noise_image(48, 20, 2),
    ];
    let mut mask = Mask::all_valid(48, 20);
    mask.valid[[10, 20]] = false;
    let source = InMemorySource::new(frames.clone())
        .unwrap()
        .with_mask(mask)
        .unwrap();

    let config = RunConfig {
        kernel: KernelParams::new(1, 1, 8),
        strong_threshold: Some(0),
        ..RunConfig::default()
    };
    let ctx = create_context(ContextKind::Rayon).unwrap();
    let session = Session::with_context(Box::new(source), config, ctx).unwrap();
    assert_eq!(session.context_name(), "CPU/Rayon");
    assert_eq!(session.mask().valid_count(), 48 * 20 - 1);

    let report = session.process_frame(1).unwrap();
    assert_eq!(report.image.data, frames[1].data);
    assert!(report.validated());

    // Threshold zero selects every covered pixel with a clean neighborhood.
    let filter = session.mask_filter();
    for px in &report.strong {
        assert!(px.x.abs_diff(20) > 1 || px.y.abs_diff(10) > 1);
        assert!(!filter.has_invalid_neighbor(px.x, px.y));
    }
    assert!(report.strong.iter().all(|p| report.output.is_covered(p.x, p.y)));
}

#[test]
fn test_frame_index_out_of_range() {
    let session = Session::open(Box::new(SampleSource::new(64, 64, 2)), RunConfig::default()).unwrap();
    assert!(matches!(
        session.process_frame(2),
        Err(KernelSumError::FrameIndexOutOfRange { index: 2, total: 2 })
    ));
}

#[test]
fn test_ser_dataset() {
    let frames = vec![
        common::noise_image(64, 32, 21),
        common::noise_image(64, 32, 22),
    ];
    let file = common::write_temp(&common::build_ser(&frames));

    let config = RunConfig {
        input: Some(file.path().to_path_buf()),
        kernel: KernelParams::new(2, 2, 8),
        ..RunConfig::default()
    };
    let source = open_source(&config).unwrap();
    assert_eq!(source.dimensions(), (64, 32));
    assert_eq!(source.frame_count(), 2);
    assert_eq!(source.info().kind, "ser");

    let session = Session::open(source, config.clone()).unwrap();
    let report = session.process_frame(1).unwrap();
    assert_eq!(report.image.data, frames[1].data);
    assert!(report.validated());

    let pipeline = StreamingPipeline::new(64, 32, &config.kernel).unwrap();
    let ctx = create_context(ContextKind::Threads).unwrap();
    let direct = pipeline.run(&frames[1], ctx.as_ref()).unwrap();
    assert_eq!(report.output.sums, direct.sums);
}

#[test]
fn test_sums_written_to_output_dir() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = RunConfig {
        output_dir: Some(dir.path().to_path_buf()),
        ..RunConfig::default()
    };
    let session = Session::open(Box::new(SampleSource::new(64, 48, 2)), config).unwrap();
    session.process_frame(1).unwrap();
    assert!(dir.path().join("sums_00001.tiff").exists());
}

#[test]
fn test_sample_used_without_input() {
    let source = open_source(&RunConfig::default()).unwrap();
    assert_eq!(source.info().kind, "sample");
    assert_eq!(source.dimensions(), (512, 512));
}

#[test]
fn test_eiger2_4m_modules() {
    // 2 x 4 modules of 1028 x 512 with 12 and 38 pixel gaps.
    let config = RunConfig {
        validation: kernelsum_core::config::ValidationConfig {
            enabled: false,
            ..Default::default()
        },
        ..RunConfig::default()
    };
    let session = Session::open(Box::new(SampleSource::new(2068, 2162, 1)), config).unwrap();

    let layout = session.module_layout().copied().unwrap();
    assert_eq!(layout, ModuleLayout::eiger2_4m());

    // The sample gap rows (1081, 1082) fall between modules; the hot pixel
    // at (689, 720) sits in the first module of the second row.
    let valid = session.module_valid_pixels().unwrap();
    let full = 1028 * 512;
    assert_eq!(valid.len(), 8);
    assert_eq!(valid[2], full - 1);
    assert!(valid.iter().enumerate().all(|(i, &n)| i == 2 || n == full));

    let image = session.load_image(0).unwrap();
    let modules = session.module_frames(&image).unwrap();
    assert_eq!(modules.dim(), (8, 512, 1028));
    assert_eq!(modules[[2, 5, 7]], image.data[[550 + 5, 7]]);
    assert_eq!(modules[[7, 511, 1027]], image.data[[2161, 2067]]);
}

#[test]
fn test_no_modules_for_unknown_size() {
    let session = Session::open(Box::new(SampleSource::new(64, 64, 1)), RunConfig::default()).unwrap();
    assert!(session.module_valid_pixels().is_none());
    let image = session.load_image(0).unwrap();
    assert!(session.module_frames(&image).is_none());
}
