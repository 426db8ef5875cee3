use console::Style;
use kernelsum_core::config::RunConfig;
use kernelsum_core::session::{RunSummary, Session};

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
    good: Style,
    bad: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
            good: Style::new().green().bold(),
            bad: Style::new().red().bold(),
        }
    }
}

pub fn print_run_summary(config: &RunConfig, session: &Session) {
    let s = Styles::new();
    let info = session.info();
    let layout = session.layout();

    println!();
    println!("  {}", s.title.apply_to("Kernel Sum"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(10)));
    println!();

    match info.filename {
        Some(ref path) => println!(
            "  {:<14}{}",
            s.label.apply_to("Input"),
            s.path.apply_to(path.display())
        ),
        None => println!(
            "  {:<14}{}",
            s.label.apply_to("Input"),
            s.disabled.apply_to("sample data")
        ),
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Device"),
        s.method.apply_to(session.context_name())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Frames"),
        s.value.apply_to(session.frame_count())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Dimensions"),
        s.value.apply_to(format!("{}x{}", info.fast, info.slow))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Valid"),
        s.value.apply_to(format!(
            "{} px, {} with clean neighborhood",
            session.mask().valid_count(),
            session.mask_filter().clean_count()
        ))
    );
    if let Some(modules) = session.module_layout() {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Modules"),
            s.value.apply_to(modules.module_count())
        );
        if let Some(valid) = session.module_valid_pixels() {
            let full = modules.module_fast * modules.module_slow;
            let damaged = valid.iter().filter(|&&n| n < full).count();
            println!(
                "  {:<14}{}",
                s.label.apply_to("Damaged"),
                s.value.apply_to(format!("{damaged} module(s) with invalid pixels"))
            );
        }
    }
    println!();

    println!("  {}", s.header.apply_to("Kernel"));
    let kernel = &config.kernel;
    println!(
        "    {:<12}{}",
        s.label.apply_to("Size"),
        s.value.apply_to(format!(
            "{}x{}",
            kernel.full_width(),
            kernel.full_height()
        ))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Blocks"),
        s.value.apply_to(format!(
            "{} x {} px",
            layout.full_blocks, layout.block_size
        ))
    );
    if layout.remainder > 0 {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Dropped"),
            s.disabled.apply_to(format!("{} px per row", layout.remainder))
        );
    }
    println!(
        "    {:<12}{}",
        s.label.apply_to("Channel"),
        s.value.apply_to(format!("{} blocks", kernel.channel_capacity))
    );
    println!();

    if config.validation.enabled {
        println!(
            "  {:<14}{}",
            s.header.apply_to("Validation"),
            s.method.apply_to("SAT, naive on small images")
        );
    } else {
        println!(
            "  {:<14}{}",
            s.header.apply_to("Validation"),
            s.disabled.apply_to("disabled")
        );
    }
    match config.strong_threshold {
        Some(t) => println!(
            "  {:<14}{}",
            s.header.apply_to("Threshold"),
            s.value.apply_to(t)
        ),
        None => println!(
            "  {:<14}{}",
            s.header.apply_to("Threshold"),
            s.disabled.apply_to("none")
        ),
    }
    if let Some(ref dir) = config.output_dir {
        println!(
            "  {:<14}{}",
            s.header.apply_to("Output"),
            s.path.apply_to(dir.display())
        );
    }
    println!();
}

pub fn print_run_results(summary: &RunSummary) {
    let s = Styles::new();

    println!();
    println!("  {}", s.header.apply_to("Results"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Frames"),
        s.value.apply_to(summary.frames)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Strong"),
        s.value.apply_to(summary.strong_pixels)
    );
    let per_frame = if summary.frames > 0 {
        summary.elapsed.as_secs_f64() * 1000.0 / summary.frames as f64
    } else {
        0.0
    };
    println!(
        "    {:<12}{}",
        s.label.apply_to("Time"),
        s.value.apply_to(format!("{per_frame:.2} ms/frame"))
    );
    if summary.failed_validations == 0 {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Check"),
            s.good.apply_to("passed")
        );
    } else {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Check"),
            s.bad.apply_to(format!("{} frame(s) failed", summary.failed_validations))
        );
    }
    println!();
}
