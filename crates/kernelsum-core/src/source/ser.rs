use std::fs::File;
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt};
use memmap2::Mmap;
use tracing::{debug, info};

use crate::error::{KernelSumError, Result};
use crate::frame::{Mask, SourceInfo};
use crate::io::image_io::load_pixel_mask;

use super::{check_frame_request, ImageSource};

pub const SER_HEADER_SIZE: usize = 178;
const SER_MAGIC: &[u8; 14] = b"LUCAM-RECORDER";

/// SER file header (178 bytes).
#[derive(Clone, Debug)]
pub struct SerHeader {
    pub color_id: i32,
    pub little_endian: bool,
    pub width: u32,
    pub height: u32,
    pub pixel_depth: u32,
    pub frame_count: u32,
}

impl SerHeader {
    /// Bytes per pixel plane (1 for 8-bit, 2 for 9-16 bit).
    pub fn bytes_per_pixel_plane(&self) -> usize {
        if self.pixel_depth <= 8 { 1 } else { 2 }
    }

    /// Number of planes per pixel (1 for mono/bayer, 3 for RGB/BGR).
    pub fn planes_per_pixel(&self) -> usize {
        match self.color_id {
            100 | 101 => 3,
            _ => 1,
        }
    }

    /// Total bytes per frame.
    pub fn frame_byte_size(&self) -> Result<usize> {
        let pixels = (self.width as usize)
            .checked_mul(self.height as usize)
            .ok_or(KernelSumError::InvalidSer("image dimensions too large".into()))?;
        pixels
            .checked_mul(self.bytes_per_pixel_plane() * self.planes_per_pixel())
            .ok_or(KernelSumError::InvalidSer("frame size overflows".into()))
    }
}

/// Memory-mapped SER movie used as a detector frame source.
///
/// Pixels are handed out as raw intensities. Color files contribute their
/// green plane. The mask comes from an optional companion image.
pub struct SerSource {
    mmap: Mmap,
    path: PathBuf,
    frame_bytes: usize,
    mask_path: Option<PathBuf>,
    pub header: SerHeader,
}

impl SerSource {
    /// Open a SER file and parse its header.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };

        if mmap.len() < SER_HEADER_SIZE {
            return Err(KernelSumError::InvalidSer(
                "File too small for SER header".into(),
            ));
        }

        if &mmap[0..14] != SER_MAGIC {
            return Err(KernelSumError::InvalidSer(
                "Missing LUCAM-RECORDER magic".into(),
            ));
        }

        let header = parse_header(&mmap[..SER_HEADER_SIZE])?;
        let frame_bytes = header.frame_byte_size()?;

        let expected_data_size = SER_HEADER_SIZE + frame_bytes * header.frame_count as usize;
        if mmap.len() < expected_data_size {
            return Err(KernelSumError::InvalidSer(format!(
                "File truncated: expected at least {} bytes, got {}",
                expected_data_size,
                mmap.len()
            )));
        }

        info!(
            path = %path.display(),
            width = header.width,
            height = header.height,
            frames = header.frame_count,
            depth = header.pixel_depth,
            "Opened SER dataset"
        );

        Ok(Self {
            mmap,
            path: path.to_path_buf(),
            frame_bytes,
            mask_path: None,
            header,
        })
    }

    /// Use a companion image as the detector pixel mask (zero = valid).
    pub fn with_mask_file(mut self, path: &Path) -> Self {
        self.mask_path = Some(path.to_path_buf());
        self
    }

    /// Get the raw bytes for a single frame (zero-copy from mmap).
    pub fn frame_raw(&self, index: usize) -> Result<&[u8]> {
        let total = self.frame_count();
        if index >= total {
            return Err(KernelSumError::FrameIndexOutOfRange { index, total });
        }
        let offset = SER_HEADER_SIZE + index * self.frame_bytes;
        Ok(&self.mmap[offset..offset + self.frame_bytes])
    }
}

impl ImageSource for SerSource {
    fn dimensions(&self) -> (usize, usize) {
        (self.header.width as usize, self.header.height as usize)
    }

    fn frame_count(&self) -> usize {
        self.header.frame_count as usize
    }

    fn load_mask(&self) -> Result<Mask> {
        let (fast, slow) = self.dimensions();
        match &self.mask_path {
            Some(path) => {
                let (mask_fast, mask_slow, raw) = load_pixel_mask(path)?;
                if (mask_fast, mask_slow) != (fast, slow) {
                    return Err(KernelSumError::MaskSize {
                        expected: fast * slow,
                        actual: mask_fast * mask_slow,
                    });
                }
                debug!(path = %path.display(), "Loaded pixel mask");
                Mask::from_pixel_mask(fast, slow, &raw)
            }
            None => Ok(Mask::all_valid(fast, slow)),
        }
    }

    fn load_frame(&self, index: usize, destination: &mut [u16]) -> Result<()> {
        check_frame_request(self, index, destination)?;
        let raw = self.frame_raw(index)?;
        // Mono and Bayer data are a single plane; for RGB/BGR take green.
        let plane_index = if self.header.planes_per_pixel() == 1 { 0 } else { 1 };
        decode_plane(
            raw,
            destination,
            self.header.bytes_per_pixel_plane(),
            self.header.planes_per_pixel(),
            plane_index,
            self.header.little_endian,
        );
        Ok(())
    }

    fn info(&self) -> SourceInfo {
        SourceInfo {
            filename: Some(self.path.clone()),
            kind: "ser",
            total_frames: self.frame_count(),
            fast: self.header.width as usize,
            slow: self.header.height as usize,
            bit_depth: self.header.pixel_depth as u8,
        }
    }
}

fn parse_header(buf: &[u8]) -> Result<SerHeader> {
    let mut cursor = std::io::Cursor::new(&buf[14..]); // skip magic

    let _lu_id = cursor.read_i32::<LittleEndian>()?;
    let color_id = cursor.read_i32::<LittleEndian>()?;
    let le_flag = cursor.read_i32::<LittleEndian>()?;
    let width = cursor.read_i32::<LittleEndian>()? as u32;
    let height = cursor.read_i32::<LittleEndian>()? as u32;
    let pixel_depth = cursor.read_i32::<LittleEndian>()? as u32;
    let frame_count = cursor.read_i32::<LittleEndian>()? as u32;

    if width == 0 || height == 0 {
        return Err(KernelSumError::InvalidDimensions {
            fast: width as usize,
            slow: height as usize,
        });
    }
    if pixel_depth == 0 || pixel_depth > 16 {
        return Err(KernelSumError::InvalidSer(format!(
            "unsupported pixel depth {pixel_depth}"
        )));
    }

    // The SER format documents LittleEndian = 0 as big-endian pixel data,
    // but most writers use 0 for little-endian. Treat 0 as little-endian.
    let little_endian = le_flag != 1;

    Ok(SerHeader {
        color_id,
        little_endian,
        width,
        height,
        pixel_depth,
        frame_count,
    })
}

fn decode_plane(
    raw: &[u8],
    destination: &mut [u16],
    bytes_per_sample: usize,
    planes: usize,
    plane_index: usize,
    little_endian: bool,
) {
    for (i, px) in destination.iter_mut().enumerate() {
        let idx = (i * planes + plane_index) * bytes_per_sample;
        *px = if bytes_per_sample == 1 {
            u16::from(raw[idx])
        } else {
            let pair = [raw[idx], raw[idx + 1]];
            if little_endian {
                u16::from_le_bytes(pair)
            } else {
                u16::from_be_bytes(pair)
            }
        };
    }
}
