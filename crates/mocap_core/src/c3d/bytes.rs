//! Processor byte orders and a bounds-checked byte reader.

use crate::error::{CoreError, Result};
use serde::Serialize;

/// Processor type recorded in the parameter section header.
///
/// Intel and DEC store integers little-endian, MIPS big-endian. DEC floats
/// are VAX F-floats: 16-bit words swapped and an exponent bias 2 higher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Processor {
    Intel,
    Dec,
    Mips,
}

impl Processor {
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            84 => Ok(Processor::Intel),
            85 => Ok(Processor::Dec),
            86 => Ok(Processor::Mips),
            other => Err(CoreError::C3d(format!("unknown processor type {}", other))),
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Processor::Intel => 84,
            Processor::Dec => 85,
            Processor::Mips => 86,
        }
    }

    pub fn decode_u16(&self, b: [u8; 2]) -> u16 {
        match self {
            Processor::Mips => u16::from_be_bytes(b),
            _ => u16::from_le_bytes(b),
        }
    }

    pub fn decode_i16(&self, b: [u8; 2]) -> i16 {
        match self {
            Processor::Mips => i16::from_be_bytes(b),
            _ => i16::from_le_bytes(b),
        }
    }

    pub fn decode_f32(&self, b: [u8; 4]) -> f32 {
        match self {
            Processor::Intel => f32::from_le_bytes(b),
            Processor::Mips => f32::from_be_bytes(b),
            Processor::Dec => {
                let bits = u32::from_le_bytes(b).rotate_left(16);
                f32::from_bits(bits) / 4.0
            }
        }
    }
}

/// Sequential reader over a C3D byte buffer.
pub(crate) struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
    processor: Processor,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8], pos: usize, processor: Processor) -> Self {
        Self {
            bytes,
            pos,
            processor,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| {
                CoreError::C3d(format!(
                    "unexpected end of file reading {} bytes at offset {}",
                    len, self.pos
                ))
            })?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.take(len).map(|_| ())
    }

    pub fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn i8(&mut self) -> Result<i8> {
        Ok(self.u8()? as i8)
    }

    pub fn u16(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(self.processor.decode_u16([b[0], b[1]]))
    }

    pub fn i16(&mut self) -> Result<i16> {
        let b = self.take(2)?;
        Ok(self.processor.decode_i16([b[0], b[1]]))
    }

    pub fn f32(&mut self) -> Result<f32> {
        let b = self.take(4)?;
        Ok(self.processor.decode_f32([b[0], b[1], b[2], b[3]]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processor_codes() {
        for p in [Processor::Intel, Processor::Dec, Processor::Mips] {
            assert_eq!(Processor::from_code(p.code()).unwrap(), p);
        }
        assert!(Processor::from_code(83).is_err());
    }

    #[test]
    fn test_byte_orders() {
        assert_eq!(Processor::Intel.decode_i16([0x34, 0x12]), 0x1234);
        assert_eq!(Processor::Mips.decode_i16([0x12, 0x34]), 0x1234);
        assert_eq!(Processor::Mips.decode_f32(1.5f32.to_be_bytes()), 1.5);
        assert_eq!(Processor::Intel.decode_f32((-2.25f32).to_le_bytes()), -2.25);
    }

    #[test]
    fn test_dec_float() {
        // 6.0 = 0x40C00000, stored as swapped words
        assert_eq!(Processor::Dec.decode_f32([0xC0, 0x40, 0x00, 0x00]), 1.5);
        assert_eq!(Processor::Dec.decode_f32([0, 0, 0, 0]), 0.0);
    }

    #[test]
    fn test_reader_bounds() {
        let bytes = [1u8, 2, 3];
        let mut reader = ByteReader::new(&bytes, 0, Processor::Intel);
        assert_eq!(reader.u16().unwrap(), 0x0201);
        assert!(reader.u16().is_err());
        assert_eq!(reader.position(), 2);
        assert_eq!(reader.u8().unwrap(), 3);
    }
}
