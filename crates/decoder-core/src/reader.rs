//! Forward-only cursor over transaction bytes.

use alloc::vec::Vec;
use crate::error::ReadError;

/// Reads little-endian fields and CompactSize integers from a byte slice.
///
/// The position only ever moves forward. A read that would run past the
/// end fails without moving it.
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        ByteReader { data, pos: 0 }
    }

    /// Current offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Look at the byte `offset` places ahead without consuming anything.
    pub fn peek(&self, offset: usize) -> Option<u8> {
        self.data.get(self.pos.checked_add(offset)?).copied()
    }

    /// Read `n` bytes and advance the position.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], ReadError> {
        if n > self.remaining() {
            return Err(ReadError::UnexpectedEof);
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], ReadError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, ReadError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16, ReadError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32_le(&mut self) -> Result<u32, ReadError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64_le(&mut self) -> Result<u64, ReadError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Read a Bitcoin CompactSize (varint).
    ///
    /// The 9-byte `0xff` form is rejected: no count or length inside a
    /// transaction needs it. On any failure the position is unchanged.
    pub fn read_compact_size(&mut self) -> Result<u64, ReadError> {
        let start = self.pos;
        let value = match self.read_u8()? {
            0xff => Err(ReadError::VarIntOverflow(start)),
            0xfe => self.read_u32_le().map(u64::from),
            0xfd => self.read_u16_le().map(u64::from),
            b => Ok(b as u64),
        };
        if value.is_err() {
            self.pos = start;
        }
        value
    }

    /// Read a CompactSize length followed by that many bytes.
    pub fn read_var_bytes(&mut self) -> Result<&'a [u8], ReadError> {
        let start = self.pos;
        let len = self.read_compact_size()?;
        let bytes = usize::try_from(len)
            .map_err(|_| ReadError::UnexpectedEof)
            .and_then(|len| self.read_bytes(len));
        if bytes.is_err() {
            self.pos = start;
        }
        bytes
    }
}

/// Encode a variable-length integer (Bitcoin varint).
pub fn encode_compact_size(value: u64, output: &mut Vec<u8>) {
    if value < 0xfd {
        output.push(value as u8);
    } else if value <= 0xffff {
        output.push(0xfd);
        output.extend_from_slice(&(value as u16).to_le_bytes());
    } else if value <= 0xffffffff {
        output.push(0xfe);
        output.extend_from_slice(&(value as u32).to_le_bytes());
    } else {
        output.push(0xff);
        output.extend_from_slice(&value.to_le_bytes());
    }
}
