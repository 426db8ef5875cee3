use std::path::PathBuf;

use kernelsum_core::config::{RunConfig, ValidationConfig};
use kernelsum_core::consts::{DEFAULT_BLOCK_SIZE, DEFAULT_NAIVE_PIXEL_LIMIT};
use kernelsum_core::kernel::KernelParams;

#[test]
fn test_config_roundtrip() {
    let config = RunConfig {
        input: Some(PathBuf::from("frames.ser")),
        mask: Some(PathBuf::from("mask.png")),
        device: 1,
        kernel: KernelParams::new(5, 2, 32),
        validation: ValidationConfig {
            enabled: false,
            naive_pixel_limit: 1000,
            max_reported: 3,
        },
        strong_threshold: Some(1500),
        expected_dimensions: Some([4148, 4362]),
        output_dir: None,
        max_frames: Some(10),
    };

    let text = toml::to_string_pretty(&config).unwrap();
    let back: RunConfig = toml::from_str(&text).unwrap();

    assert_eq!(back.input, config.input);
    assert_eq!(back.mask, config.mask);
    assert_eq!(back.device, 1);
    assert_eq!(back.kernel, config.kernel);
    assert!(!back.validation.enabled);
    assert_eq!(back.validation.naive_pixel_limit, 1000);
    assert_eq!(back.strong_threshold, Some(1500));
    assert_eq!(back.expected_dimensions, Some([4148, 4362]));
    assert_eq!(back.output_dir, None);
    assert_eq!(back.max_frames, Some(10));
}

#[test]
fn test_partial_config_fills_defaults() {
    let text = r#"
        strong_threshold = 800

        [kernel]
        kernel_width = 5
    "#;
    let config: RunConfig = toml::from_str(text).unwrap();

    assert_eq!(config.strong_threshold, Some(800));
    assert_eq!(config.kernel.kernel_width, 5);
    assert_eq!(config.kernel.block_size, DEFAULT_BLOCK_SIZE);
    assert!(config.validation.enabled);
    assert_eq!(config.validation.naive_pixel_limit, DEFAULT_NAIVE_PIXEL_LIMIT);
    assert_eq!(config.input, None);
    assert_eq!(config.device, 0);
}

#[test]
fn test_empty_config_is_default() {
    let config: RunConfig = toml::from_str("").unwrap();
    assert_eq!(config.kernel, KernelParams::default());
    assert!(config.kernel.validate().is_ok());
}
