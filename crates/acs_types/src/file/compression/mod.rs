//! Block decompression engine for compressed container payloads.
//!
//! The parser never assumes a particular decoder: anything implementing
//! [`BlockDecoder`] can be injected. [`Decompressor`] is the native implementation.
//!
//! # Working Region
//!
//! A [`Decompressor`] owns one scratch buffer. Each call copies the source block to
//! the front of it, decodes into the bytes that follow, and copies the output into
//! a fresh vector. The region grows in whole [`Decompressor::ALLOCATION_UNIT`] steps
//! and is never shrunk. Because decoding needs `&mut self`, a single instance can
//! only serve one call at a time; threads that decode in parallel should each own
//! an instance.
//!
//! ```
//! use acs_types::file::compression::{BlockDecoder, Decompressor};
//!
//! let mut engine = Decompressor::new();
//! let block = [0x00, 0x82, 0x02, 0xF2, 0xFF, 0xFF, 0xFF];
//! assert_eq!(engine.decompress(&block, 4).unwrap(), b"AAAA");
//! assert!(engine.decompress(&block, 5).is_err());
//! ```

mod decode;

pub use decode::decode_region;

use crate::file::DecompressionError;

/// Decodes one compressed block whose output length is known in advance.
pub trait BlockDecoder {
	/// Decodes `source` into exactly `expected_len` bytes.
	///
	/// Implementations must fail rather than return a truncated or padded buffer.
	fn decompress(
		&mut self,
		source: &[u8],
		expected_len: usize,
	) -> Result<Vec<u8>, DecompressionError>;
}

/// Native decompression engine with a reusable working region.
#[derive(Debug, Clone, Default)]
pub struct Decompressor {
	region: Vec<u8>,
}

impl Decompressor {
	/// Granularity of working region growth (64 KiB)
	pub const ALLOCATION_UNIT: usize = 0x1_0000;

	/// Creates an engine with an empty working region.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates an engine whose region already holds at least `capacity` bytes.
	pub fn with_capacity(capacity: usize) -> Result<Self, DecompressionError> {
		let mut engine = Self::new();
		engine.reserve(capacity)?;
		Ok(engine)
	}

	/// Returns the current size of the working region.
	pub fn capacity(&self) -> usize {
		self.region.len()
	}

	/// Grows the region to hold `required` bytes, rounding up to whole units.
	fn reserve(&mut self, required: usize) -> Result<(), DecompressionError> {
		if self.region.len() >= required {
			return Ok(());
		}

		let units = required.div_ceil(Self::ALLOCATION_UNIT);
		let new_len = units.checked_mul(Self::ALLOCATION_UNIT).ok_or(
			DecompressionError::RegionTooLarge {
				requested: required,
			},
		)?;

		log::trace!("growing decompression region {} -> {} bytes", self.region.len(), new_len);
		self.region.resize(new_len, 0);
		Ok(())
	}
}

impl BlockDecoder for Decompressor {
	fn decompress(
		&mut self,
		source: &[u8],
		expected_len: usize,
	) -> Result<Vec<u8>, DecompressionError> {
		let required = source.len().checked_add(expected_len).ok_or(
			DecompressionError::RegionTooLarge {
				requested: usize::MAX,
			},
		)?;
		self.reserve(required)?;

		let src_len = source.len();
		self.region[..src_len].copy_from_slice(source);

		let produced = decode_region(&mut self.region, 0, src_len, src_len, expected_len)?;
		if produced != expected_len {
			return Err(DecompressionError::LengthMismatch {
				expected: expected_len,
				actual: produced,
			});
		}

		Ok(self.region[src_len..src_len + expected_len].to_vec())
	}
}

impl<D: BlockDecoder + ?Sized> BlockDecoder for &mut D {
	fn decompress(
		&mut self,
		source: &[u8],
		expected_len: usize,
	) -> Result<Vec<u8>, DecompressionError> {
		(**self).decompress(source, expected_len)
	}
}
