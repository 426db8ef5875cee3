use crate::error::Result;
use crate::frame::{Mask, SourceInfo};

use super::{check_frame_request, ImageSource};

const BACKGROUND: u16 = 10;
const SPOT_PEAK: u16 = 200;
const SPOT_SHOULDER: u16 = 50;
const SPOTS_PER_FRAME: usize = 6;
/// Rows of the simulated inter-module gap, relative to the image center.
const GAP_ROWS: usize = 2;

/// Deterministic synthetic dataset used when no file is given: a noisy
/// background with a handful of bright 3x3 spots per frame, and a mask with
/// an insensitive horizontal gap and one hot pixel.
#[derive(Clone, Debug)]
pub struct SampleSource {
    fast: usize,
    slow: usize,
    frames: usize,
}

impl Default for SampleSource {
    fn default() -> Self {
        Self::new(512, 512, 4)
    }
}

impl SampleSource {
    pub fn new(fast: usize, slow: usize, frames: usize) -> Self {
        Self { fast, slow, frames }
    }

    /// Centers of the bright spots in frame `index`.
    pub fn spot_centers(&self, index: usize) -> Vec<(usize, usize)> {
        let span_x = self.fast.saturating_sub(20).max(1);
        let span_y = self.slow.saturating_sub(20).max(1);
        (0..SPOTS_PER_FRAME)
            .map(|k| {
                let x = (index * 37 + k * 97) % span_x + 10;
                let y = (index * 53 + k * 71) % span_y + 10;
                (x.min(self.fast - 1), y.min(self.slow - 1))
            })
            .collect()
    }

    fn background(x: usize, y: usize, index: usize) -> u16 {
        BACKGROUND + ((x * 31 + y * 17 + index * 7) % 5) as u16
    }
}

impl ImageSource for SampleSource {
    fn dimensions(&self) -> (usize, usize) {
        (self.fast, self.slow)
    }

    fn frame_count(&self) -> usize {
        self.frames
    }

    fn load_mask(&self) -> Result<Mask> {
        let mut mask = Mask::all_valid(self.fast, self.slow);
        let gap_start = self.slow / 2;
        for y in gap_start..(gap_start + GAP_ROWS).min(self.slow) {
            for x in 0..self.fast {
                mask.valid[[y, x]] = false;
            }
        }
        mask.valid[[self.slow / 3, self.fast / 3]] = false;
        Ok(mask)
    }

    fn load_frame(&self, index: usize, destination: &mut [u16]) -> Result<()> {
        check_frame_request(self, index, destination)?;
        for (i, px) in destination.iter_mut().enumerate() {
            *px = Self::background(i % self.fast, i / self.fast, index);
        }
        for (cx, cy) in self.spot_centers(index) {
            for y in cy.saturating_sub(1)..=(cy + 1).min(self.slow - 1) {
                for x in cx.saturating_sub(1)..=(cx + 1).min(self.fast - 1) {
                    let value = if (x, y) == (cx, cy) {
                        SPOT_PEAK
                    } else {
                        SPOT_SHOULDER
                    };
                    let px = &mut destination[y * self.fast + x];
                    *px = (*px).max(value);
                }
            }
        }
        Ok(())
    }

    fn info(&self) -> SourceInfo {
        SourceInfo {
            filename: None,
            kind: "sample",
            total_frames: self.frames,
            fast: self.fast,
            slow: self.slow,
            bit_depth: 16,
        }
    }
}
