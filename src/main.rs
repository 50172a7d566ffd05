mod save_image;

use std::{env::args, fs, process::ExitCode};
use anyhow::{Context, Result};
use phd_reader::model::Level;

fn print_summary(level: &Level) {
	println!("{} (version {:#x})", level.name, level.version);
	println!("\tatlases: {}", level.atlases.len());
	println!("\trooms: {}", level.rooms.len());
	for (index, room) in level.rooms.iter().enumerate() {
		println!(
			"\t\troom {}: {} vertices, {} quads, {} tris, {} portals, {}x{} sectors, {} lights, {} static meshes",
			index,
			room.vertices.len(),
			room.quads.len(),
			room.tris.len(),
			room.portals.len(),
			room.sectors.num_x,
			room.sectors.num_z,
			room.lights.len(),
			room.room_static_meshes.len(),
		);
	}
	let num_dummies = level.meshes.iter().filter(|mesh| mesh.is_none()).count();
	println!("\tmeshes: {} ({} placeholders)", level.meshes.len(), num_dummies);
	println!("\tobject textures: {}", level.object_textures.len());
}

fn inspect(path: &str, dump_atlases: bool) -> Result<()> {
	let data = fs::read(path).with_context(|| format!("failed to read {}", path))?;
	let level = phd_reader::parse_level(path, &data).with_context(|| format!("failed to decode {}", path))?;
	print_summary(&level);
	if dump_atlases {
		let prefix = level.name.split('.').next().unwrap_or(&level.name);
		save_image::save_atlases(&level.atlases, prefix)?;
	}
	Ok(())
}

fn main() -> ExitCode {
	env_logger::init();
	let mut dump_atlases = false;
	let mut paths = Vec::new();
	for arg in args().skip(1) {
		match arg.as_str() {
			"--atlases" => dump_atlases = true,
			_ => paths.push(arg),
		}
	}
	if paths.is_empty() {
		eprintln!("usage: phd_tool [--atlases] <level.phd>...");
		return ExitCode::from(2);
	}
	for path in &paths {
		if let Err(error) = inspect(path, dump_atlases) {
			eprintln!("{:#}", error);
			return ExitCode::FAILURE;
		}
	}
	ExitCode::SUCCESS
}
