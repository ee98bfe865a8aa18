//! Primitive records shared by every container section.

use std::fmt;

use encoding_rs::UTF_16LE;
use serde::{Serialize, Serializer};

use crate::file::{ByteCursor, FormatError, Section};

/// Offset and size of a block within the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Locator {
	/// Absolute offset from the start of the container
	pub offset: u32,
	/// Size of the block in bytes
	pub size: u32,
}

impl Locator {
	/// Size of a stored locator in bytes
	pub const SIZE: usize = 8;

	/// Reads a locator (`u32` offset, `u32` size).
	pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self, FormatError> {
		Ok(Self {
			offset: cursor.read_u32()?,
			size: cursor.read_u32()?,
		})
	}

	/// Returns a cursor over the located block of `root`.
	///
	/// # Errors
	///
	/// Returns [`FormatError::LocatorOutOfRange`] if the block does not fit in `root`.
	pub fn view<'a>(
		&self,
		root: &ByteCursor<'a>,
		section: Section,
	) -> Result<ByteCursor<'a>, FormatError> {
		root.view_at(self.offset as usize, self.size as usize).map_err(|_| {
			FormatError::LocatorOutOfRange {
				section,
				offset: self.offset,
				size: self.size,
				len: root.len(),
			}
		})
	}
}

/// A 128-bit Windows GUID as stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Guid(pub [u8; 16]);

impl Guid {
	/// Reads 16 raw GUID bytes.
	pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self, FormatError> {
		Ok(Self(cursor.read_array()?))
	}

	/// Returns `true` if every byte is zero.
	pub fn is_nil(&self) -> bool {
		self.0.iter().all(|&b| b == 0)
	}
}

impl fmt::Display for Guid {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let b = &self.0;
		let data1 = u32::from_le_bytes([b[0], b[1], b[2], b[3]]);
		let data2 = u16::from_le_bytes([b[4], b[5]]);
		let data3 = u16::from_le_bytes([b[6], b[7]]);
		write!(
			f,
			"{{{data1:08X}-{data2:04X}-{data3:04X}-{:02X}{:02X}-{:02X}{:02X}{:02X}{:02X}{:02X}{:02X}}}",
			b[8], b[9], b[10], b[11], b[12], b[13], b[14], b[15]
		)
	}
}

impl Serialize for Guid {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

/// Reads a length-prefixed UTF-16LE string.
///
/// The `u32` prefix counts code units; a non-empty string is followed by a NUL
/// code unit that is not part of the count.
pub fn read_string(cursor: &mut ByteCursor<'_>) -> Result<String, FormatError> {
	let units = cursor.read_u32()? as usize;
	if units == 0 {
		return Ok(String::new());
	}

	let bytes = cursor.read_slice(units.saturating_mul(2))?;
	cursor.read_u16()?;

	let (text, had_errors) = UTF_16LE.decode_without_bom_handling(bytes);
	if had_errors {
		log::warn!("string at offset {} contains invalid UTF-16", cursor.position());
	}
	Ok(text.into_owned())
}

/// Reads a `u32`-length-prefixed byte block.
pub fn read_data_block(cursor: &mut ByteCursor<'_>) -> Result<Vec<u8>, FormatError> {
	let size = cursor.read_u32()? as usize;
	Ok(cursor.read_bytes(size)?)
}
