use std::{error::Error, fmt};

/// Any decode error is fatal to the whole decode; there is no partial level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
	/// A read would pass the end of the buffer.
	OutOfBounds { offset: usize, need: usize, len: usize },
	/// A seek target outside the buffer.
	BadSeek { target: usize, len: usize },
	/// A count field whose records cannot fit in the bytes that remain.
	BadCount { offset: usize, count: u64, record_size: usize },
	/// A mesh pointer outside the mesh section.
	BadMeshPointer { index: usize, pointer: u32, section_size: usize },
}

pub type DecodeResult<T> = Result<T, DecodeError>;

impl fmt::Display for DecodeError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match *self {
			DecodeError::OutOfBounds { offset, need, len } => {
				write!(f, "read of {} bytes at offset {} passes the end of the {}-byte buffer", need, offset, len)
			},
			DecodeError::BadSeek { target, len } => {
				write!(f, "seek to offset {} passes the end of the {}-byte buffer", target, len)
			},
			DecodeError::BadCount { offset, count, record_size } => {
				write!(f, "count {} at offset {} overruns the buffer for {}-byte records", count, offset, record_size)
			},
			DecodeError::BadMeshPointer { index, pointer, section_size } => {
				write!(f, "mesh pointer {} ({}) lies outside the {}-byte mesh section", index, pointer, section_size)
			},
		}
	}
}

impl Error for DecodeError {}
