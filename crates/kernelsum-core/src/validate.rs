use std::fmt;
use std::ops::Range;

use ndarray::Array2;

use crate::kernel::KernelParams;
use crate::stream::StreamOutput;

/// Which reference a streaming result was checked against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReferenceKind {
    Naive,
    SummedAreaTable,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Naive => write!(f, "Naive"),
            Self::SummedAreaTable => write!(f, "SAT"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mismatch {
    pub x: usize,
    pub y: usize,
    pub streaming: u32,
    pub reference: u32,
}

/// Outcome of comparing a streaming result with a reference in the interior.
#[derive(Clone, Debug)]
pub struct ValidationReport {
    pub reference: ReferenceKind,
    /// Pixels compared.
    pub checked: usize,
    /// Pixels that differed.
    pub mismatch_count: usize,
    /// The first few differing pixels, row-major.
    pub mismatches: Vec<Mismatch>,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.mismatch_count == 0
    }
}

/// Region where streaming and reference sums must agree exactly: rows with a
/// full vertical footprint, and covered columns at least `KW` from either edge.
/// Everything outside is border, where the two policies legitimately differ.
pub fn interior_region(
    output: &StreamOutput,
    params: &KernelParams,
) -> (Range<usize>, Range<usize>) {
    let (slow, fast) = output.sums.dim();
    let kw = params.kernel_width;
    let kh = params.kernel_height;
    let rows = output.rows.start.max(kh)..output.rows.end.min(slow.saturating_sub(kh));
    let cols = output.cols.start.max(kw)..output.cols.end.min(fast.saturating_sub(kw));
    (rows, cols)
}

/// Compare the interior of a streaming result against a reference image.
pub fn compare_interior(
    output: &StreamOutput,
    reference: &Array2<u32>,
    kind: ReferenceKind,
    params: &KernelParams,
    max_reported: usize,
) -> ValidationReport {
    let (rows, cols) = interior_region(output, params);
    let mut report = ValidationReport {
        reference: kind,
        checked: 0,
        mismatch_count: 0,
        mismatches: Vec::new(),
    };
    for y in rows {
        for x in cols.clone() {
            report.checked += 1;
            let streaming = output.sums[[y, x]];
            let expected = reference[[y, x]];
            if streaming != expected {
                report.mismatch_count += 1;
                if report.mismatches.len() < max_reported {
                    report.mismatches.push(Mismatch {
                        x,
                        y,
                        streaming,
                        reference: expected,
                    });
                }
            }
        }
    }
    report
}

/// Number of pixels where two whole-image results differ.
pub fn count_differences(a: &Array2<u32>, b: &Array2<u32>) -> usize {
    a.iter().zip(b.iter()).filter(|(x, y)| x != y).count()
}
