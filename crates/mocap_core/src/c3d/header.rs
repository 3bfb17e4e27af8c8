//! C3D header block (first 512 bytes).

use super::bytes::{ByteReader, Processor};
use crate::error::{CoreError, Result};
use serde::Serialize;

pub const BLOCK_SIZE: usize = 512;

/// Second byte of the header and of the parameter section.
pub const C3D_KEY: u8 = 0x50;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Header {
    /// 1-based block where the parameter section starts
    pub parameter_block: u8,
    pub point_count: u16,
    /// Analog measurements per 3D frame (channels × samples)
    pub analog_per_frame: u16,
    pub first_frame: u16,
    pub last_frame: u16,
    pub max_gap: u16,
    /// Negative scale means float point data
    pub scale: f32,
    /// 1-based block where the data section starts
    pub data_start: u16,
    pub analog_samples_per_frame: u16,
    pub frame_rate: f32,
}

impl Header {
    /// Locate the parameter section and read its processor type.
    pub(crate) fn processor(bytes: &[u8]) -> Result<Processor> {
        if bytes.len() < BLOCK_SIZE {
            return Err(CoreError::C3d(format!(
                "file too short for a header block ({} bytes)",
                bytes.len()
            )));
        }
        if bytes[1] != C3D_KEY {
            return Err(CoreError::C3d(format!(
                "bad header key 0x{:02X}, expected 0x50",
                bytes[1]
            )));
        }
        let block = bytes[0] as usize;
        if block == 0 {
            return Err(CoreError::C3d("parameter block number is 0".to_string()));
        }
        let start = (block - 1) * BLOCK_SIZE;
        let code = bytes.get(start + 3).copied().ok_or_else(|| {
            CoreError::C3d(format!("parameter block {} beyond end of file", block))
        })?;
        Processor::from_code(code)
    }

    pub(crate) fn parse(bytes: &[u8], processor: Processor) -> Result<Self> {
        let mut r = ByteReader::new(bytes, 0, processor);
        let parameter_block = r.u8()?;
        r.skip(1)?;
        Ok(Self {
            parameter_block,
            point_count: r.u16()?,
            analog_per_frame: r.u16()?,
            first_frame: r.u16()?,
            last_frame: r.u16()?,
            max_gap: r.u16()?,
            scale: r.f32()?,
            data_start: r.u16()?,
            analog_samples_per_frame: r.u16()?,
            frame_rate: r.f32()?,
        })
    }

    /// Frames in the data section; 0 when `last_frame < first_frame`.
    pub fn frame_count(&self) -> usize {
        if self.last_frame < self.first_frame {
            0
        } else {
            (self.last_frame - self.first_frame) as usize + 1
        }
    }

    pub fn is_float(&self) -> bool {
        self.scale < 0.0
    }
}
