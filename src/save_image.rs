use anyhow::Result;
use image::{GrayImage, Luma};
use phd_reader::model::{Atlas, IMAGE_SIZE};

const IMG_DIM: u32 = IMAGE_SIZE as u32;

/// Palette indices rendered as grayscale; the palette itself lies past the
/// parsed portion of the file.
pub fn atlas_image(atlas: &Atlas) -> GrayImage {
	let mut img = GrayImage::new(IMG_DIM, IMG_DIM);
	let mut pos = 0u32;
	for &pixel in atlas.pixels.iter() {
		img.put_pixel(pos % IMG_DIM, pos / IMG_DIM, Luma([pixel]));
		pos += 1;
	}
	img
}

pub fn save_atlases(atlases: &[Atlas], prefix: &str) -> Result<()> {
	for (index, atlas) in atlases.iter().enumerate() {
		atlas_image(atlas).save(format!("{}_atlas_{}.png", prefix, index))?;
	}
	Ok(())
}
