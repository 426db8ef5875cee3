use console::Style;
use kernelsum_core::session::FrameReport;

const CORNER: usize = 16;

/// Print the top-left corner of a frame next to its box sums. Pixels the
/// streaming pass did not cover are shown as dots.
pub fn print_corner(report: &FrameReport) {
    let header = Style::new().cyan().bold();
    let value = Style::new().white();
    let dim = Style::new().dim();
    let strong = Style::new().yellow().bold();

    let rows = CORNER.min(report.image.slow());
    let cols = CORNER.min(report.image.fast());

    println!();
    println!("  {}", header.apply_to(format!("Frame {} pixels", report.index())));
    for y in 0..rows {
        let line: Vec<String> = (0..cols)
            .map(|x| format!("{:>6}", report.image.data[[y, x]]))
            .collect();
        println!("  {}", value.apply_to(line.concat()));
    }

    println!();
    println!("  {}", header.apply_to("Box sums"));
    for y in 0..rows {
        let mut line = String::from("  ");
        for x in 0..cols {
            match report.output.get(x, y) {
                Some(sum) if report.strong.iter().any(|p| p.x == x && p.y == y) => {
                    line.push_str(&strong.apply_to(format!("{sum:>8}")).to_string())
                }
                Some(sum) => line.push_str(&value.apply_to(format!("{sum:>8}")).to_string()),
                None => line.push_str(&dim.apply_to(format!("{:>8}", "\u{b7}")).to_string()),
            }
        }
        println!("{line}");
    }
}
