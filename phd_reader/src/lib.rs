extern crate self as phd_reader;

pub mod model;
mod cursor;
mod error;
pub(crate) mod impls;

use num_traits::AsPrimitive;
pub use cursor::Cursor;
pub use error::{DecodeError, DecodeResult};
pub use model::{parse_level, Level};
pub(crate) use phd_derive::Decode;

pub trait Decode: Sized {
	fn decode(cursor: &mut Cursor) -> DecodeResult<Self>;
}

pub fn read_boxed_slice<T: Decode>(cursor: &mut Cursor, len: usize) -> DecodeResult<Box<[T]>> {
	//a record is at least one byte, so a corrupt count cannot reserve past the buffer
	let mut vec = Vec::with_capacity(len.min(cursor.remaining()));
	for _ in 0..len {
		vec.push(T::decode(cursor)?);
	}
	Ok(vec.into_boxed_slice())
}

pub fn read_list<T: Decode, L: Decode + AsPrimitive<usize>>(cursor: &mut Cursor) -> DecodeResult<Box<[T]>> {
	let len = L::decode(cursor)?.as_();
	read_boxed_slice(cursor, len)
}

pub fn skip(cursor: &mut Cursor, num: usize) -> DecodeResult<()> {
	cursor.read_bytes(num)?;
	Ok(())
}
