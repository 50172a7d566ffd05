use arrayvec::ArrayVec;
use glam::{I16Vec3, IVec3, U16Vec2};
use nonmax::{NonMaxU8, NonMaxU16};
use crate::{Cursor, Decode, DecodeResult};

//primitive impls

macro_rules! impl_decode_prim {
	($type:ty, $func:ident) => {
		impl Decode for $type {
			fn decode(cursor: &mut Cursor) -> DecodeResult<Self> {
				cursor.$func()
			}
		}
	};
}

impl_decode_prim!(u8, read_u8);
impl_decode_prim!(i8, read_i8);
impl_decode_prim!(u16, read_u16);
impl_decode_prim!(i16, read_i16);
impl_decode_prim!(u32, read_u32);
impl_decode_prim!(i32, read_i32);

//array impl

impl<T: Decode, const N: usize> Decode for [T; N] {
	fn decode(cursor: &mut Cursor) -> DecodeResult<Self> {
		let mut array = ArrayVec::new();
		for _ in 0..N {
			array.push(T::decode(cursor)?);
		}
		Ok(array.into_inner().ok().unwrap())//reads exactly N items
	}
}

//nonmax impls: 255/0xFFFF on disk mean "none"

impl Decode for Option<NonMaxU8> {
	fn decode(cursor: &mut Cursor) -> DecodeResult<Self> {
		Ok(NonMaxU8::new(cursor.read_u8()?))
	}
}

impl Decode for Option<NonMaxU16> {
	fn decode(cursor: &mut Cursor) -> DecodeResult<Self> {
		Ok(NonMaxU16::new(cursor.read_u16()?))
	}
}

//glam impls

macro_rules! impl_decode_glam {
	($type:ty, $array:ty) => {
		impl Decode for $type {
			fn decode(cursor: &mut Cursor) -> DecodeResult<Self> {
				Ok(<$array>::decode(cursor)?.into())
			}
		}
	};
}

impl_decode_glam!(U16Vec2, [u16; 2]);
impl_decode_glam!(I16Vec3, [i16; 3]);
impl_decode_glam!(IVec3, [i32; 3]);
