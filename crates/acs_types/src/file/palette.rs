//! Character palette support.
//!
//! Containers store up to 256 colors as Windows `RGBQUAD` entries
//! (blue, green, red, reserved). The reserved byte carries no alpha, so decoded
//! colors are opaque; the character's transparent index is cleared to alpha 0.

use std::fmt;

use serde::Serialize;

use crate::file::{ByteCursor, FormatError, Section};

/// RGBA color representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Color {
	/// Red component (0-255)
	pub r: u8,
	/// Green component (0-255)
	pub g: u8,
	/// Blue component (0-255)
	pub b: u8,
	/// Alpha component (0-255)
	pub a: u8,
}

impl Color {
	/// Creates a new RGBA color.
	pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
		Self {
			r,
			g,
			b,
			a,
		}
	}

	/// Creates a new RGB color with full opacity.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self::new(r, g, b, 255)
	}

	/// Creates a transparent black color.
	pub const fn transparent() -> Self {
		Self::new(0, 0, 0, 0)
	}

	/// Creates an opaque color from an `RGBQUAD` (B, G, R, reserved).
	pub const fn from_rgbquad(quad: [u8; 4]) -> Self {
		Self::rgb(quad[2], quad[1], quad[0])
	}

	/// Returns the same color with a different alpha.
	pub const fn with_alpha(self, a: u8) -> Self {
		Self::new(self.r, self.g, self.b, a)
	}

	/// Returns the color as a 32-bit RGBA value (`0xRRGGBBAA`).
	pub const fn to_rgba32(&self) -> u32 {
		((self.r as u32) << 24) | ((self.g as u32) << 16) | ((self.b as u32) << 8) | (self.a as u32)
	}

	/// Creates a color from a 32-bit RGBA value (`0xRRGGBBAA`).
	pub const fn from_rgba32(rgba: u32) -> Self {
		Self {
			r: ((rgba >> 24) & 0xFF) as u8,
			g: ((rgba >> 16) & 0xFF) as u8,
			b: ((rgba >> 8) & 0xFF) as u8,
			a: (rgba & 0xFF) as u8,
		}
	}
}

impl Default for Color {
	fn default() -> Self {
		Self::transparent()
	}
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "RGBA({}, {}, {}, {})", self.r, self.g, self.b, self.a)
	}
}

/// Indexed color palette of at most 256 entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Palette {
	colors: Vec<Color>,
}

impl Palette {
	/// Maximum number of palette entries
	pub const MAX_COLORS: usize = 256;

	/// Size of one stored color entry in bytes
	pub const ENTRY_SIZE: usize = 4;

	/// Creates a palette from a list of colors.
	///
	/// Returns `None` if there are more than [`Palette::MAX_COLORS`] entries.
	pub fn from_colors(colors: Vec<Color>) -> Option<Self> {
		(colors.len() <= Self::MAX_COLORS).then_some(Self {
			colors,
		})
	}

	/// Reads a palette chunk: a `u32` count followed by that many `RGBQUAD`s.
	///
	/// # Errors
	///
	/// Returns [`FormatError::Malformed`] if the count exceeds 256 or does not fit
	/// in the remaining chunk.
	pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self, FormatError> {
		let count = cursor.read_u32()? as usize;
		if count > Self::MAX_COLORS {
			return Err(FormatError::malformed(
				Section::Palette,
				format!("{count} colors declared, at most {} allowed", Self::MAX_COLORS),
			));
		}
		if count * Self::ENTRY_SIZE > cursor.remaining() {
			return Err(FormatError::malformed(
				Section::Palette,
				format!(
					"{count} colors need {} bytes, chunk has {} left",
					count * Self::ENTRY_SIZE,
					cursor.remaining()
				),
			));
		}

		let mut colors = Vec::with_capacity(count);
		for _ in 0..count {
			colors.push(Color::from_rgbquad(cursor.read_array()?));
		}

		Ok(Self {
			colors,
		})
	}

	/// Returns the number of colors.
	#[inline]
	pub fn len(&self) -> usize {
		self.colors.len()
	}

	/// Returns `true` if the palette has no colors.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.colors.is_empty()
	}

	/// Gets a color by index, or `None` past the end of the palette.
	#[inline]
	pub fn get(&self, index: u8) -> Option<Color> {
		self.colors.get(index as usize).copied()
	}

	/// Clears the alpha of the color at `index`.
	///
	/// Returns `false` if the index is outside the palette.
	pub fn set_transparent(&mut self, index: u8) -> bool {
		match self.colors.get_mut(index as usize) {
			Some(color) => {
				*color = color.with_alpha(0);
				true
			}
			None => false,
		}
	}

	/// Returns the colors as a slice.
	#[inline]
	pub fn colors(&self) -> &[Color] {
		&self.colors
	}

	/// Returns an iterator over palette colors.
	pub fn iter(&self) -> impl Iterator<Item = &Color> {
		self.colors.iter()
	}
}

impl fmt::Display for Palette {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Palette: {} colors", self.colors.len())
	}
}
