use ndarray::{s, Array2, Array3};

/// Geometry of a detector built from a grid of identical modules separated
/// by insensitive gaps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModuleLayout {
    pub module_fast: usize,
    pub module_slow: usize,
    pub gap_fast: usize,
    pub gap_slow: usize,
    /// Modules across a row.
    pub modules_fast: usize,
    /// Modules down a column.
    pub modules_slow: usize,
}

const EIGER2_MODULE_FAST: usize = 1028;
const EIGER2_MODULE_SLOW: usize = 512;
const EIGER2_GAP_FAST: usize = 12;
const EIGER2_GAP_SLOW: usize = 38;

impl ModuleLayout {
    /// 4 x 8 module, 16M pixel detector (4148 x 4362).
    pub fn eiger2_16m() -> Self {
        Self {
            module_fast: EIGER2_MODULE_FAST,
            module_slow: EIGER2_MODULE_SLOW,
            gap_fast: EIGER2_GAP_FAST,
            gap_slow: EIGER2_GAP_SLOW,
            modules_fast: 4,
            modules_slow: 8,
        }
    }

    /// 2 x 4 module, 4M pixel detector (2068 x 2162).
    pub fn eiger2_4m() -> Self {
        Self {
            modules_fast: 2,
            modules_slow: 4,
            ..Self::eiger2_16m()
        }
    }

    /// Recognize a known detector from its full image size.
    pub fn detect(fast: usize, slow: usize) -> Option<Self> {
        [Self::eiger2_16m(), Self::eiger2_4m()]
            .into_iter()
            .find(|layout| layout.image_fast() == fast && layout.image_slow() == slow)
    }

    pub fn image_fast(&self) -> usize {
        self.modules_fast * self.module_fast + (self.modules_fast - 1) * self.gap_fast
    }

    pub fn image_slow(&self) -> usize {
        self.modules_slow * self.module_slow + (self.modules_slow - 1) * self.gap_slow
    }

    pub fn module_count(&self) -> usize {
        self.modules_fast * self.modules_slow
    }

    /// Copy each module's pixels out of a full image, dropping the gaps.
    ///
    /// The result is indexed `[module, row, column]` with modules numbered
    /// row-major across the detector.
    pub fn extract_modules<T: Copy + Default>(&self, image: &Array2<T>) -> Array3<T> {
        let mut modules = Array3::from_elem(
            (self.module_count(), self.module_slow, self.module_fast),
            T::default(),
        );
        for my in 0..self.modules_slow {
            let y0 = my * (self.module_slow + self.gap_slow);
            for mx in 0..self.modules_fast {
                let x0 = mx * (self.module_fast + self.gap_fast);
                let source = image.slice(s![y0..y0 + self.module_slow, x0..x0 + self.module_fast]);
                modules
                    .slice_mut(s![my * self.modules_fast + mx, .., ..])
                    .assign(&source);
            }
        }
        modules
    }
}
