use byteorder::{ByteOrder, LE};
use crate::{DecodeError, DecodeResult};

/// Sequential little-endian reader over an immutable byte buffer.
pub struct Cursor<'a> {
	data: &'a [u8],
	offset: usize,
}

impl<'a> Cursor<'a> {
	pub fn new(data: &'a [u8]) -> Self {
		Self {
			data,
			offset: 0,
		}
	}

	pub fn position(&self) -> usize {
		self.offset
	}

	pub fn remaining(&self) -> usize {
		self.data.len() - self.offset
	}

	/// Absolute; only the mesh pointer table needs this.
	pub fn seek(&mut self, target: usize) -> DecodeResult<()> {
		if target > self.data.len() {
			return Err(DecodeError::BadSeek { target, len: self.data.len() });
		}
		self.offset = target;
		Ok(())
	}

	pub fn read_bytes(&mut self, need: usize) -> DecodeResult<&'a [u8]> {
		if need > self.remaining() {
			return Err(DecodeError::OutOfBounds { offset: self.offset, need, len: self.data.len() });
		}
		let bytes = &self.data[self.offset..self.offset + need];
		self.offset += need;
		Ok(bytes)
	}

	pub fn read_u8(&mut self) -> DecodeResult<u8> {
		Ok(self.read_bytes(1)?[0])
	}

	pub fn read_i8(&mut self) -> DecodeResult<i8> {
		Ok(self.read_bytes(1)?[0] as i8)
	}

	pub fn read_u16(&mut self) -> DecodeResult<u16> {
		Ok(LE::read_u16(self.read_bytes(2)?))
	}

	pub fn read_i16(&mut self) -> DecodeResult<i16> {
		Ok(LE::read_i16(self.read_bytes(2)?))
	}

	pub fn read_u32(&mut self) -> DecodeResult<u32> {
		Ok(LE::read_u32(self.read_bytes(4)?))
	}

	pub fn read_i32(&mut self) -> DecodeResult<i32> {
		Ok(LE::read_i32(self.read_bytes(4)?))
	}
}
