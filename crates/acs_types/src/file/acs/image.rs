//! Image directory and image records.

use serde::Serialize;

use crate::file::{
	ByteCursor, FormatError, Section, bitmap::stride, compression::BlockDecoder,
};

use super::{ParseConfig, check_limit, types::Locator};

/// One entry of the image directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct ImageLocator {
	pub locator: Locator,
	pub checksum: u32,
}

impl ImageLocator {
	pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self, FormatError> {
		Ok(Self {
			locator: Locator::read(cursor)?,
			checksum: cursor.read_u32()?,
		})
	}
}

/// An 8bpp indexed image, stored bottom-up with rows padded to 4 bytes.
///
/// The pixel buffer always holds exactly `stride(width) × height` bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageEntry {
	width: u16,
	height: u16,
	#[serde(skip)]
	data: Vec<u8>,
	#[serde(skip)]
	region: Option<Vec<u8>>,
	checksum: u32,
}

impl ImageEntry {
	/// Creates an image from raw stored pixels.
	///
	/// # Errors
	///
	/// Returns [`FormatError::Malformed`] if either dimension is zero or `data` is not
	/// exactly `stride(width) × height` bytes long.
	pub fn new(width: u16, height: u16, data: Vec<u8>) -> Result<Self, FormatError> {
		if width == 0 || height == 0 {
			return Err(FormatError::malformed(
				Section::Image,
				format!("image size {width}x{height} is empty"),
			));
		}

		let expected = Self::stored_len(width, height);
		if data.len() != expected {
			return Err(FormatError::malformed(
				Section::Image,
				format!(
					"{width}x{height} image needs {expected} bytes of pixel data, found {}",
					data.len()
				),
			));
		}

		Ok(Self {
			width,
			height,
			data,
			region: None,
			checksum: 0,
		})
	}

	/// Byte length of the stored pixels of a `width × height` image.
	pub fn stored_len(width: u16, height: u16) -> usize {
		stride(width as usize) * height as usize
	}

	/// Reads one image record and decodes its pixel data.
	///
	/// `pixel_bytes_used` is the decoded size of the images read before this one. The
	/// pixel and region limits of `config` are checked before anything is decoded.
	pub(super) fn read<D: BlockDecoder>(
		cursor: &mut ByteCursor<'_>,
		index: usize,
		checksum: u32,
		pixel_bytes_used: usize,
		decoder: &mut D,
		config: &ParseConfig,
	) -> Result<Self, FormatError> {
		cursor.read_u8()?;
		let width = cursor.read_u16()?;
		let height = cursor.read_u16()?;
		let compressed = cursor.read_u8()? != 0;

		let largest = width.max(height);
		if largest > config.max_image_dimension {
			return Err(FormatError::LimitExceeded {
				what: "image dimension",
				value: largest as usize,
				limit: config.max_image_dimension as usize,
			});
		}
		if width == 0 || height == 0 {
			return Err(FormatError::malformed(
				Section::Image,
				format!("image {index} has empty size {width}x{height}"),
			));
		}

		let expected = Self::stored_len(width, height);
		check_limit(
			"total pixel bytes",
			pixel_bytes_used.saturating_add(expected),
			config.max_total_pixel_bytes,
		)?;

		let size = cursor.read_u32()? as usize;
		let payload = cursor.read_slice(size)?;
		let data = if compressed {
			decoder.decompress(payload, expected).map_err(|source| FormatError::Decompression {
				image_index: index,
				source,
			})?
		} else {
			payload.to_vec()
		};

		let region = read_region(cursor, index, decoder, config)?;

		log::trace!(
			"image {}: {}x{}, {} payload bytes{}{}",
			index,
			width,
			height,
			size,
			if compressed { ", compressed" } else { "" },
			if region.is_some() { ", with region" } else { "" }
		);

		let mut image = Self::new(width, height, data).map_err(|_| {
			FormatError::malformed(
				Section::Image,
				format!("image {index}: {width}x{height} needs {expected} bytes, payload has {size}"),
			)
		})?;
		image.region = region;
		image.checksum = checksum;
		Ok(image)
	}

	/// Returns the width in pixels.
	#[inline]
	pub fn width(&self) -> usize {
		self.width as usize
	}

	/// Returns the height in pixels.
	#[inline]
	pub fn height(&self) -> usize {
		self.height as usize
	}

	/// Returns the padded row length in bytes.
	#[inline]
	pub fn stride(&self) -> usize {
		stride(self.width())
	}

	/// Returns the `width` pixel indices of stored row `index` (0 is the bottom row).
	///
	/// # Panics
	///
	/// Panics if `index >= height`.
	pub fn row(&self, index: usize) -> &[u8] {
		let start = index * self.stride();
		&self.data[start..start + self.width()]
	}

	/// Returns the stored pixel buffer, padding included.
	pub fn data(&self) -> &[u8] {
		&self.data
	}

	/// Returns the decoded `RGNDATA` bytes used for hit testing, if present.
	pub fn region(&self) -> Option<&[u8]> {
		self.region.as_deref()
	}

	/// Returns the checksum recorded in the image directory.
	pub fn checksum(&self) -> u32 {
		self.checksum
	}
}

/// Reads the optional region block that follows the pixel data.
///
/// Layout: `u32` compressed size, `u32` decoded size, payload. A compressed size of 0
/// means the payload is stored raw.
fn read_region<D: BlockDecoder>(
	cursor: &mut ByteCursor<'_>,
	index: usize,
	decoder: &mut D,
	config: &ParseConfig,
) -> Result<Option<Vec<u8>>, FormatError> {
	if cursor.remaining() == 0 {
		return Ok(None);
	}

	let compressed_size = cursor.read_u32()? as usize;
	let size = cursor.read_u32()? as usize;
	check_limit("region bytes", size, config.max_region_bytes)?;
	if compressed_size == 0 {
		if size == 0 {
			return Ok(None);
		}
		return Ok(Some(cursor.read_bytes(size)?));
	}

	let payload = cursor.read_slice(compressed_size)?;
	let region = decoder.decompress(payload, size).map_err(|source| {
		FormatError::Decompression {
			image_index: index,
			source,
		}
	})?;
	Ok(Some(region))
}
