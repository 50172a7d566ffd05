use bitfield::bitfield;
use glam::{ivec3, I16Vec3, IVec3, U16Vec2};
use nonmax::{NonMaxU8, NonMaxU16};
use crate::{read_boxed_slice, read_list, skip, Cursor, Decode, DecodeError, DecodeResult};

pub const IMAGE_SIZE: usize = 256;
pub const NUM_PIXELS: usize = IMAGE_SIZE * IMAGE_SIZE;
/// Version tag of retail level files.
pub const PHD_VERSION: u32 = 0x20;

//byte sizes of the fixed records in tables this reader skips or bulk-checks
const SECTOR_SIZE: usize = 0x8;
const FLOOR_DATA_SIZE: usize = 0x2;
const ANIMATION_SIZE: usize = 0x20;
const STATE_CHANGE_SIZE: usize = 0x6;
const ANIM_DISPATCH_SIZE: usize = 0x8;
const ANIM_COMMAND_SIZE: usize = 0x2;
const MESH_NODE_SIZE: usize = 0x4;
const FRAME_SIZE: usize = 0x2;
const MODEL_SIZE: usize = 0x12;
const STATIC_MESH_SIZE: usize = 0x20;
const SPRITE_TEXTURE_SIZE: usize = 0x10;
const SPRITE_SEQUENCE_SIZE: usize = 0x8;

/// 256×256 grid of 8-bit palette indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Atlas {
	pub pixels: Box<[u8; NUM_PIXELS]>,
}

impl Decode for Atlas {
	fn decode(cursor: &mut Cursor) -> DecodeResult<Self> {
		let pixels: Box<[u8; NUM_PIXELS]> = cursor
			.read_bytes(NUM_PIXELS)?
			.to_vec()
			.into_boxed_slice()
			.try_into()
			.ok()
			.unwrap();//read_bytes returns exactly NUM_PIXELS bytes
		Ok(Atlas { pixels })
	}
}

/// World coords; on disk a room vertex is relative to the room origin in a
/// left-handed space, so `y` is negated and `z` negated after the offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoomVertex {
	pub pos: IVec3,
	pub light: u16,
}

/// A polygon's corners plus one texture word: an index into
/// `Level.object_textures` for textured faces, a palette index for solid
/// mesh faces.
#[derive(Decode, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Face<const N: usize> {
	pub vertex_indices: [u16; N],
	pub texture_index: u16,
}

pub type Quad = Face<4>;
pub type Tri = Face<3>;

#[derive(Decode, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sprite {
	/// Index into `Room.vertices`.
	pub vertex_index: u16,
	/// Index into the sprite texture table, which this reader does not keep.
	pub sprite_texture_index: u16,
}

#[derive(Decode, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Portal {
	/// Index into `Level.rooms`.
	pub adjoining_room_index: u16,
	pub normal: I16Vec3,
	/// Relative to room; wound right-handed about the normal.
	pub vertices: [I16Vec3; 4],
}

#[derive(Decode, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sector {
	/// Index into the floor data table, which this reader does not keep.
	pub floor_data_index: u16,
	/// Index into the pathfinding box table.
	pub box_index: u16,
	/// Index into `Level.rooms`.
	pub room_below_index: Option<NonMaxU8>,
	pub floor: i8,
	/// Index into `Level.rooms`.
	pub room_above_index: Option<NonMaxU8>,
	pub ceiling: i8,
}

/// Room collision grid, `num_z` cells deep by `num_x` cells wide, x-major as
/// stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sectors {
	pub num_z: u16,
	pub num_x: u16,
	pub sectors: Box<[Sector]>,
}

impl Sectors {
	pub fn get(&self, x: u16, z: u16) -> Option<&Sector> {
		if x >= self.num_x || z >= self.num_z {
			return None;
		}
		self.sectors.get(x as usize * self.num_z as usize + z as usize)
	}
}

impl Decode for Sectors {
	fn decode(cursor: &mut Cursor) -> DecodeResult<Self> {
		let offset = cursor.position();
		let num_z = cursor.read_u16()?;
		let num_x = cursor.read_u16()?;
		let count = check_count(cursor, offset, num_z as u64 * num_x as u64, SECTOR_SIZE)?;
		let sectors = read_boxed_slice(cursor, count)?;
		Ok(Sectors { num_z, num_x, sectors })
	}
}

#[derive(Decode, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Light {
	/// World coords.
	pub pos: IVec3,
	pub intensity: u16,
	pub fade: u32,
}

#[derive(Decode, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoomStaticMesh {
	/// World coords.
	pub pos: IVec3,
	/// Units are 1/65536 of a rotation.
	pub rotation: u16,
	/// 0 is bright, 0x1FFF is dark.
	pub intensity: u16,
	/// Matched against the static-mesh definition table, which this reader
	/// does not keep; ids align with `Level.meshes` slots.
	pub static_mesh_id: u16,
}

bitfield! {
	#[derive(Decode, Clone, Copy, Debug, PartialEq, Eq)]
	pub struct RoomFlags(u16);
	pub water, _: 0;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Room {
	/// World coord.
	pub x: i32,
	/// World coord.
	pub z: i32,
	pub y_bottom: i32,
	pub y_top: i32,
	pub vertices: Box<[RoomVertex]>,
	/// `vertex_indices` index into `Room.vertices`.
	pub quads: Box<[Quad]>,
	/// `vertex_indices` index into `Room.vertices`.
	pub tris: Box<[Tri]>,
	pub sprites: Box<[Sprite]>,
	pub portals: Box<[Portal]>,
	pub sectors: Sectors,
	pub ambient_light: i16,
	pub lights: Box<[Light]>,
	pub room_static_meshes: Box<[RoomStaticMesh]>,
	/// Index into `Level.rooms`; the flipped variant of this room, if any.
	pub alt_room_index: Option<NonMaxU16>,
	pub flags: RoomFlags,
}

impl Decode for Room {
	fn decode(cursor: &mut Cursor) -> DecodeResult<Self> {
		let x = cursor.read_i32()?;
		let z = cursor.read_i32()?;
		let y_bottom = cursor.read_i32()?;
		let y_top = cursor.read_i32()?;
		skip(cursor, 4)?;//word count of the geometry block, redundant with the list counts
		let num_vertices = cursor.read_u16()? as usize;
		let mut vertices = Vec::with_capacity(num_vertices.min(cursor.remaining()));
		for _ in 0..num_vertices {
			vertices.push(decode_room_vertex(cursor, x, z)?);
		}
		let vertices = vertices.into_boxed_slice();
		let quads = read_list::<_, u16>(cursor)?;
		let tris = read_list::<_, u16>(cursor)?;
		let sprites = read_list::<_, u16>(cursor)?;
		let portals = read_list::<_, u16>(cursor)?;
		let sectors = Sectors::decode(cursor)?;
		let ambient_light = cursor.read_i16()?;
		let lights = read_list::<_, u16>(cursor)?;
		let room_static_meshes = read_list::<_, u16>(cursor)?;
		let alt_room_index = <Option<NonMaxU16>>::decode(cursor)?;
		let flags = RoomFlags::decode(cursor)?;
		Ok(Room {
			x,
			z,
			y_bottom,
			y_top,
			vertices,
			quads,
			tris,
			sprites,
			portals,
			sectors,
			ambient_light,
			lights,
			room_static_meshes,
			alt_room_index,
			flags,
		})
	}
}

fn decode_room_vertex(cursor: &mut Cursor, room_x: i32, room_z: i32) -> DecodeResult<RoomVertex> {
	let dx = cursor.read_i16()? as i32;
	let y = cursor.read_i16()? as i32;
	let dz = cursor.read_i16()? as i32;
	let light = cursor.read_u16()?;
	Ok(RoomVertex {
		pos: ivec3(room_x + dx, -y, -(room_z + dz)),
		light,
	})
}

/// A mesh carries either per-vertex normals or baked light values, never
/// both; the sign of one count field selects which.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MeshLighting {
	Normals(Box<[I16Vec3]>),
	Lights(Box<[i16]>),
}

impl Decode for MeshLighting {
	fn decode(cursor: &mut Cursor) -> DecodeResult<Self> {
		Ok(match cursor.read_i16()? {
			num if num > 0 => MeshLighting::Normals(read_boxed_slice(cursor, num as usize)?),
			num => MeshLighting::Lights(read_boxed_slice(cursor, num.unsigned_abs() as usize)?),
		})
	}
}

#[derive(Decode, Clone, Debug, PartialEq, Eq)]
pub struct Mesh {
	pub center: I16Vec3,
	pub collision_radius: i32,
	#[list_u16]
	pub vertices: Box<[I16Vec3]>,
	pub lighting: MeshLighting,
	/// `vertex_indices` index into `Mesh.vertices`.
	#[list_u16]
	pub textured_quads: Box<[Quad]>,
	#[list_u16]
	pub textured_tris: Box<[Tri]>,
	/// Texture word is a palette index.
	#[list_u16]
	pub solid_quads: Box<[Quad]>,
	#[list_u16]
	pub solid_tris: Box<[Tri]>,
}

bitfield! {
	#[derive(Decode, Clone, Copy, Debug, PartialEq, Eq)]
	pub struct AtlasAndTriangle(u16);
	/// Index into `Level.atlases`.
	pub atlas_index, _: 14, 0;
	pub triangle, _: 15;
}

#[derive(Decode, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObjectTexture {
	/// 0 is opaque, 1 is color-key transparency.
	pub attributes: u16,
	pub atlas_and_triangle: AtlasAndTriangle,
	/// Units are 1/256 of a pixel; triangles use only the first three.
	pub uvs: [U16Vec2; 4],
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
	pub name: String,
	/// Raw version tag; `PHD_VERSION` for known-good files.
	pub version: u32,
	pub atlases: Box<[Atlas]>,
	pub rooms: Box<[Room]>,
	/// `None` slots come from zero entries in the mesh pointer table and
	/// exist only to keep mesh ids aligned.
	pub meshes: Box<[Option<Mesh>]>,
	pub object_textures: Box<[ObjectTexture]>,
}

/// Decode one level from `data`. `name` is a display name; any path prefix
/// is stripped.
pub fn parse_level(name: &str, data: &[u8]) -> DecodeResult<Level> {
	let name = name.rsplit('/').next().unwrap_or(name).to_string();
	let cursor = &mut Cursor::new(data);
	let version = cursor.read_u32()?;
	if version != PHD_VERSION {
		log::warn!("{}: unrecognized version tag {:#x}, decoding as {:#x}", name, version, PHD_VERSION);
	}
	let offset = cursor.position();
	let num_atlases = cursor.read_u32()?;
	let num_atlases = check_count(cursor, offset, num_atlases as u64, NUM_PIXELS)?;
	let atlases = read_boxed_slice(cursor, num_atlases)?;
	skip(cursor, 4)?;//unused
	let rooms = read_list::<Room, u16>(cursor)?;
	skip_table(cursor, FLOOR_DATA_SIZE)?;
	let meshes = decode_meshes(cursor)?;
	//animation data, never materialized
	skip_table(cursor, ANIMATION_SIZE)?;
	skip_table(cursor, STATE_CHANGE_SIZE)?;
	skip_table(cursor, ANIM_DISPATCH_SIZE)?;
	skip_table(cursor, ANIM_COMMAND_SIZE)?;
	skip_table(cursor, MESH_NODE_SIZE)?;
	skip_table(cursor, FRAME_SIZE)?;
	//model definitions, never materialized
	skip_table(cursor, MODEL_SIZE)?;
	skip_table(cursor, STATIC_MESH_SIZE)?;
	let object_textures = read_list::<ObjectTexture, u32>(cursor)?;
	skip_table(cursor, SPRITE_TEXTURE_SIZE)?;
	skip_table(cursor, SPRITE_SEQUENCE_SIZE)?;
	Ok(Level {
		name,
		version,
		atlases,
		rooms,
		meshes,
		object_textures,
	})
}

/// The mesh blob is opaque until the pointer table after it has been read;
/// each pointer is a byte offset from the start of the blob, 0 marking a
/// placeholder slot. Decoding seeks into the blob per pointer, in table
/// order, then the cursor resumes directly after the table.
fn decode_meshes(cursor: &mut Cursor) -> DecodeResult<Box<[Option<Mesh>]>> {
	let offset = cursor.position();
	let num_mesh_words = cursor.read_u32()?;
	let section_size = check_count(cursor, offset, num_mesh_words as u64, 2)? * 2;
	let section_start = cursor.position();
	skip(cursor, section_size)?;
	let pointers = read_list::<u32, u32>(cursor)?;
	let table_end = cursor.position();
	let mut meshes = Vec::with_capacity(pointers.len());
	for (index, &pointer) in pointers.iter().enumerate() {
		meshes.push(match pointer {
			0 => None,
			_ => {
				if pointer as usize >= section_size {
					return Err(DecodeError::BadMeshPointer { index, pointer, section_size });
				}
				cursor.seek(section_start + pointer as usize)?;
				Some(Mesh::decode(cursor)?)
			},
		});
	}
	cursor.seek(table_end)?;
	Ok(meshes.into_boxed_slice())
}

/// Check a count of fixed-size records against the bytes that remain, before
/// any allocation or bulk skip commits to it.
fn check_count(cursor: &Cursor, offset: usize, count: u64, record_size: usize) -> DecodeResult<usize> {
	match usize::try_from(count).ok().and_then(|count| count.checked_mul(record_size)) {
		Some(bytes) if bytes <= cursor.remaining() => Ok(count as usize),
		_ => Err(DecodeError::BadCount { offset, count, record_size }),
	}
}

/// Skip a `u32`-counted table of fixed-size records.
fn skip_table(cursor: &mut Cursor, record_size: usize) -> DecodeResult<()> {
	let offset = cursor.position();
	let count = cursor.read_u32()?;
	let count = check_count(cursor, offset, count as u64, record_size)?;
	skip(cursor, count * record_size)
}
