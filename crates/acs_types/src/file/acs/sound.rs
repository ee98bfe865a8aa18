//! Sound directory. Each payload is a complete RIFF WAVE file kept verbatim.

use std::io::Cursor;

use serde::Serialize;

use crate::file::{ByteCursor, FormatError, Section};

use super::types::Locator;

/// One entry of the sound directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct SoundLocator {
	pub locator: Locator,
	pub checksum: u32,
}

impl SoundLocator {
	pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self, FormatError> {
		Ok(Self {
			locator: Locator::read(cursor)?,
			checksum: cursor.read_u32()?,
		})
	}
}

/// An embedded sound effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sound {
	#[serde(skip)]
	data: Vec<u8>,
	checksum: u32,
}

impl Sound {
	pub(super) fn new(data: Vec<u8>, checksum: u32) -> Self {
		Self {
			data,
			checksum,
		}
	}

	/// Returns the raw WAVE file bytes.
	pub fn data(&self) -> &[u8] {
		&self.data
	}

	/// Returns the checksum recorded in the sound directory.
	pub fn checksum(&self) -> u32 {
		self.checksum
	}

	/// Returns the payload length in bytes.
	pub fn len(&self) -> usize {
		self.data.len()
	}

	/// Returns `true` if the payload is empty.
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	/// Parses the WAVE header and returns the stream format.
	///
	/// # Errors
	///
	/// Returns [`FormatError::Malformed`] if the payload is not a readable WAVE file.
	pub fn wav_spec(&self) -> Result<hound::WavSpec, FormatError> {
		hound::WavReader::new(Cursor::new(self.data.as_slice()))
			.map(|reader| reader.spec())
			.map_err(|e| FormatError::malformed(Section::Sound, format!("invalid WAVE data: {e}")))
	}
}
