use anyhow::Result;
use console::Style;
use kernelsum_core::compute::available_contexts;

/// Print every execution context with the index `--device` selects it by.
pub fn run() -> Result<()> {
    let index = Style::new().bold().white();
    let name = Style::new().green();
    let dim = Style::new().dim();

    for info in available_contexts() {
        println!(
            "  {}  {:<14}{}",
            index.apply_to(info.index),
            name.apply_to(&info.name),
            dim.apply_to(format!("{} threads", info.threads))
        );
    }
    Ok(())
}
