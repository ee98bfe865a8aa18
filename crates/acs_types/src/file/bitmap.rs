//! Conversion of stored indexed bitmaps to top-down RGBA.
//!
//! Images inside a container are laid out like a Windows 8bpp DIB: rows are stored
//! bottom-up, and each row is padded to a 4-byte boundary.
//!
//! ```text
//! stored (stride 4, width 3)       normalized (top-down)
//! row 0: [3, 4, 5, pad]    --->    y=0: palette[0], palette[1], palette[2]
//! row 1: [0, 1, 2, pad]            y=1: palette[3], palette[4], palette[5]
//! ```

use crate::file::{BoundsError, Palette, acs::ImageEntry};

/// Returns the padded row length in bytes for an 8bpp image of `width` pixels.
#[inline]
pub const fn stride(width: usize) -> usize {
	width.div_ceil(4) * 4
}

/// Top-down RGBA image produced by [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
	width: usize,
	height: usize,
	pixels: Vec<u32>,
}

impl Bitmap {
	/// Returns the width in pixels.
	pub fn width(&self) -> usize {
		self.width
	}

	/// Returns the height in pixels.
	pub fn height(&self) -> usize {
		self.height
	}

	/// Returns the pixels, row 0 first, each packed as `0xRRGGBBAA`.
	pub fn pixels(&self) -> &[u32] {
		&self.pixels
	}

	/// Returns the packed pixel at `(x, y)`.
	pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
		if x >= self.width || y >= self.height {
			return None;
		}
		self.pixels.get(y * self.width + x).copied()
	}

	/// Returns the pixels as interleaved `R, G, B, A` bytes.
	pub fn to_rgba8(&self) -> Vec<u8> {
		self.pixels.iter().flat_map(|pixel| pixel.to_be_bytes()).collect()
	}

	/// Consumes the bitmap and returns its packed pixels.
	pub fn into_pixels(self) -> Vec<u32> {
		self.pixels
	}
}

/// Converts a stored image to a top-down RGBA bitmap of `width × height` pixels.
///
/// # Errors
///
/// Returns [`BoundsError`] for the first pixel whose index is not in the palette.
pub fn normalize(image: &ImageEntry, palette: &Palette) -> Result<Bitmap, BoundsError> {
	normalize_rows(image, palette, image.height())
}

/// Converts the top `rows` visual rows of a stored image.
///
/// `rows` is clamped to the image height; the result is `width × rows` pixels.
pub fn normalize_rows(
	image: &ImageEntry,
	palette: &Palette,
	rows: usize,
) -> Result<Bitmap, BoundsError> {
	let width = image.width();
	let height = image.height();
	let rows = rows.min(height);

	let mut pixels = Vec::with_capacity(width * rows);
	for y in 0..rows {
		let source = image.row(height - 1 - y);
		for (x, &index) in source.iter().enumerate() {
			let color = palette.get(index).ok_or(BoundsError {
				index,
				palette_len: palette.len(),
				x,
				y,
			})?;
			pixels.push(color.to_rgba32());
		}
	}

	Ok(Bitmap {
		width,
		height: rows,
		pixels,
	})
}
