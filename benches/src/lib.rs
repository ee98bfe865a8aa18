//! Benchmark helper utilities for acs-rs
//!
//! This module provides utilities for generating synthetic compressed blocks and
//! character containers for the acs-rs benchmarks.
//!
//! # Real Test Files
//!
//! Benchmarks also pick up real characters from `test_data/` when present
//! (e.g. `test_data/merlin.acs`); missing files are skipped with a warning.

use acs_types::file::stride;

/// LSB-first bit sink producing blocks in the container compression format.
#[derive(Debug)]
pub struct BlockEncoder {
	bytes: Vec<u8>,
	bit: usize,
}

impl Default for BlockEncoder {
	fn default() -> Self {
		Self::new()
	}
}

impl BlockEncoder {
	/// Creates an encoder holding only the block header byte.
	pub fn new() -> Self {
		Self {
			bytes: vec![0x00],
			bit: 0,
		}
	}

	fn push_bits(&mut self, value: u32, count: u32) {
		for shift in 0..count {
			let index = 1 + self.bit / 8;
			if index == self.bytes.len() {
				self.bytes.push(0);
			}
			self.bytes[index] |= (((value >> shift) & 1) as u8) << (self.bit % 8);
			self.bit += 1;
		}
	}

	/// Emits one literal byte.
	pub fn literal(&mut self, value: u8) {
		self.push_bits(0, 1);
		self.push_bits(u32::from(value), 8);
	}

	/// Emits a back reference. `length` must be at most 4096 (4097 for distances above 4672).
	pub fn copy(&mut self, distance: u32, length: u32) {
		self.push_bits(1, 1);
		let base = match distance {
			1..=64 => {
				self.push_bits(0b0, 1);
				self.push_bits(distance - 1, 6);
				2
			}
			65..=576 => {
				self.push_bits(0b01, 2);
				self.push_bits(distance - 65, 9);
				2
			}
			577..=4672 => {
				self.push_bits(0b011, 3);
				self.push_bits(distance - 577, 12);
				2
			}
			_ => {
				self.push_bits(0b111, 3);
				self.push_bits(distance - 4673, 20);
				3
			}
		};

		let extra = length - base;
		let mut prefix = 0;
		while extra >= (1 << (prefix + 1)) - 1 {
			prefix += 1;
		}
		self.push_bits((1 << prefix) - 1, prefix);
		self.push_bits(0, 1);
		self.push_bits(extra - ((1 << prefix) - 1), prefix);
	}

	/// Appends the end marker and returns the block.
	pub fn finish(mut self) -> Vec<u8> {
		self.push_bits(0b1111, 4);
		self.push_bits(0x000F_FFFF, 20);
		while self.bit % 8 != 0 {
			self.push_bits(1, 1);
		}
		self.bytes
	}
}

/// Generates a compressed image payload and its decoded length.
///
/// Every third row is stored as literals, the others copy the previous row, which
/// mixes both token kinds the way real character art does.
pub fn generate_compressed_image(width: u16, height: u16) -> (Vec<u8>, usize) {
	let row = stride(width as usize);
	let mut encoder = BlockEncoder::new();

	for y in 0..height as usize {
		if y % 3 == 0 {
			for x in 0..row {
				encoder.literal(((x * 7 + y) % 256) as u8);
			}
		} else {
			let mut remaining = row;
			while remaining > 0 {
				let run = remaining.min(4096);
				if run < 2 {
					encoder.literal(0);
					remaining -= 1;
					continue;
				}
				encoder.copy(row as u32, run as u32);
				remaining -= run;
			}
		}
	}

	(encoder.finish(), row * height as usize)
}

fn push_u32(out: &mut Vec<u8>, value: usize) {
	out.extend_from_slice(&(value as u32).to_le_bytes());
}

fn push_string(out: &mut Vec<u8>, text: &str) {
	let units: Vec<u16> = text.encode_utf16().collect();
	push_u32(out, units.len());
	if !units.is_empty() {
		for unit in units {
			out.extend_from_slice(&unit.to_le_bytes());
		}
		out.extend_from_slice(&[0, 0]);
	}
}

/// Generates a container with `image_count` compressed images and one animation
/// showing each image in turn.
pub fn generate_container(image_count: usize, width: u16, height: u16) -> Vec<u8> {
	let (block, _) = generate_compressed_image(width, height);
	let mut out = vec![0u8; 36];

	// character info
	let info_start = out.len();
	out.extend_from_slice(&[0, 0, 2, 0]);
	out.extend_from_slice(&[0; 8]);
	out.extend_from_slice(&[0x42; 16]);
	out.extend_from_slice(&width.to_le_bytes());
	out.extend_from_slice(&height.to_le_bytes());
	out.push(0);
	out.extend_from_slice(&[0; 4]);
	out.extend_from_slice(&[1, 0, 0, 0]);
	push_u32(&mut out, 256);
	for i in 0..=255u8 {
		out.extend_from_slice(&[i, i.wrapping_mul(2), i.wrapping_mul(3), 0]);
	}
	out.push(0);
	out.extend_from_slice(&0u16.to_le_bytes());
	let info = (info_start, out.len() - info_start);

	// images
	let mut records = Vec::with_capacity(image_count);
	for _ in 0..image_count {
		let start = out.len();
		out.push(0);
		out.extend_from_slice(&width.to_le_bytes());
		out.extend_from_slice(&height.to_le_bytes());
		out.push(1);
		push_u32(&mut out, block.len());
		out.extend_from_slice(&block);
		out.extend_from_slice(&[0; 8]);
		records.push((start, out.len() - start));
	}
	let images_start = out.len();
	push_u32(&mut out, image_count);
	for (offset, size) in records {
		push_u32(&mut out, offset);
		push_u32(&mut out, size);
		push_u32(&mut out, 0);
	}
	let images = (images_start, out.len() - images_start);

	// animation
	let animation_start = out.len();
	push_string(&mut out, "Cycle");
	out.push(2);
	push_string(&mut out, "");
	out.extend_from_slice(&(image_count as u16).to_le_bytes());
	for index in 0..image_count {
		out.extend_from_slice(&[1, 0]);
		push_u32(&mut out, index);
		out.extend_from_slice(&[0; 4]);
		out.extend_from_slice(&0xFFFFu16.to_le_bytes());
		out.extend_from_slice(&10u16.to_le_bytes());
		out.extend_from_slice(&(-1i16).to_le_bytes());
		out.extend_from_slice(&[0, 0]);
	}
	let animation_size = out.len() - animation_start;
	let animations_start = out.len();
	push_u32(&mut out, 1);
	push_string(&mut out, "Cycle");
	push_u32(&mut out, animation_start);
	push_u32(&mut out, animation_size);
	let animations = (animations_start, out.len() - animations_start);

	// sounds
	let sounds = (out.len(), 4);
	push_u32(&mut out, 0);

	let mut header = 0xABCD_ABC3u32.to_le_bytes().to_vec();
	for (offset, size) in [info, animations, images, sounds] {
		push_u32(&mut header, offset);
		push_u32(&mut header, size);
	}
	out[..36].copy_from_slice(&header);
	out
}

/// Common benchmark sizes for synthetic test data
pub mod sizes {
	/// Small sprite: 32x32
	pub const SMALL: (u16, u16) = (32, 32);
	/// Typical character frame: 128x128
	pub const CHARACTER: (u16, u16) = (128, 128);
	/// Large frame: 640x480
	pub const LARGE: (u16, u16) = (640, 480);
}

#[cfg(test)]
mod tests {
	use super::{generate_compressed_image, generate_container, sizes};
	use acs_types::prelude::*;

	#[test]
	fn test_generated_block_decodes() {
		let (width, height) = sizes::SMALL;
		let (block, expected) = generate_compressed_image(width, height);
		let data = Decompressor::new().decompress(&block, expected).unwrap();
		assert_eq!(data.len(), expected);
		assert_eq!(&data[..4], &data[stride(width as usize)..stride(width as usize) + 4]);
	}

	#[test]
	fn test_generated_container_parses() {
		let data = generate_container(4, 30, 20);
		let character = parse(&data).unwrap();
		assert_eq!(character.images().len(), 4);
		assert_eq!(character.animation("cycle").unwrap().frames.len(), 4);
		assert_eq!(character.image(3).unwrap().stride(), 32);
	}
}
