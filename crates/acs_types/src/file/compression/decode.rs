//! Agent block decompression
//!
//! ## Overview
//!
//! Character containers compress image and region payloads with a small LZ77 variant.
//! The decoder works over a single working region holding the source block followed
//! by the output window; see [`decode_region`].
//!
//! ## Block Layout
//!
//! | Offset | Size | Description                                     |
//! |--------|------|-------------------------------------------------|
//! | 0x00   | 1    | Always `0x00`                                   |
//! | 0x01   | ...  | Bit stream, least-significant bit of each byte first |
//!
//! Encoders finish blocks with the end marker followed by `0xFF` padding.
//!
//! ## Tokens
//!
//! | Prefix  | Meaning                                             |
//! |---------|-----------------------------------------------------|
//! | `0`     | Literal: next 8 bits are one output byte            |
//! | `1`     | Back reference: distance field, then run length     |
//!
//! ### Distance Field
//!
//! | Bits after `1` | Field width | Bias  |
//! |----------------|-------------|-------|
//! | `0`            | 6           | 1     |
//! | `10`           | 9           | 65    |
//! | `110`          | 12          | 577   |
//! | `111`          | 20          | 4673  |
//!
//! A 20-bit field of `0xFFFFF` terminates the stream.
//!
//! ### Run Length
//!
//! The run starts at 2 bytes (3 for 20-bit distances). A unary prefix of `n` one
//! bits (at most 11, closed by a zero bit) is followed by an `n`-bit value `v`;
//! the run grows by `v + 2^n - 1`.

use crate::file::DecompressionError;

/// Value of a 20-bit distance field that marks the end of the stream
const END_OF_STREAM: u32 = 0x000F_FFFF;

/// Widths and biases of the four distance classes
const DISTANCE_CLASSES: [(u32, u32); 4] = [(6, 1), (9, 65), (12, 577), (20, 4673)];

/// Longest accepted unary run-length prefix
const MAX_LENGTH_PREFIX: u32 = 11;

/// Reads bits least-significant first from a byte slice.
#[derive(Debug)]
struct BitReader<'a> {
	data: &'a [u8],
	bit: usize,
}

impl<'a> BitReader<'a> {
	fn new(data: &'a [u8]) -> Self {
		Self {
			data,
			bit: 0,
		}
	}

	/// Total number of bits available
	fn total_bits(&self) -> usize {
		self.data.len() * 8
	}

	fn is_exhausted(&self) -> bool {
		self.bit >= self.total_bits()
	}

	fn read_bit(&mut self) -> Result<u32, DecompressionError> {
		if self.is_exhausted() {
			return Err(DecompressionError::Truncated {
				bit: self.bit,
			});
		}

		let value = (self.data[self.bit / 8] >> (self.bit % 8)) & 1;
		self.bit += 1;
		Ok(u32::from(value))
	}

	/// Reads `count` bits (at most 32), first bit read is bit 0 of the result.
	fn read_bits(&mut self, count: u32) -> Result<u32, DecompressionError> {
		let mut value = 0u32;
		for shift in 0..count {
			value |= self.read_bit()? << shift;
		}
		Ok(value)
	}
}

/// Decoder state for one block.
#[derive(Debug)]
struct BlockState<'a> {
	bits: BitReader<'a>,
	output: &'a mut [u8],
	written: usize,
}

impl<'a> BlockState<'a> {
	fn push(&mut self, value: u8) -> Result<(), DecompressionError> {
		let capacity = self.output.len();
		let slot = self
			.output
			.get_mut(self.written)
			.ok_or(DecompressionError::OutputOverflow { capacity })?;
		*slot = value;
		self.written += 1;
		Ok(())
	}

	/// Reads the distance class prefix and field.
	///
	/// Returns `None` for the end-of-stream marker, otherwise `(distance, is_long)`.
	fn read_distance(&mut self) -> Result<Option<(usize, bool)>, DecompressionError> {
		let mut class = 0;
		while class < 3 && self.bits.read_bit()? == 1 {
			class += 1;
		}

		let (width, bias) = DISTANCE_CLASSES[class];
		let field = self.bits.read_bits(width)?;
		let is_long = class == 3;
		if is_long && field == END_OF_STREAM {
			return Ok(None);
		}

		Ok(Some(((field + bias) as usize, is_long)))
	}

	fn read_run_length(&mut self, is_long: bool) -> Result<usize, DecompressionError> {
		let prefix_start = self.bits.bit;
		let mut prefix = 0;
		while self.bits.read_bit()? == 1 {
			prefix += 1;
			if prefix > MAX_LENGTH_PREFIX {
				return Err(DecompressionError::MalformedLength {
					bit: prefix_start,
				});
			}
		}

		let mut length = if is_long {
			3
		} else {
			2
		};
		if prefix > 0 {
			let value = self.bits.read_bits(prefix)? as usize;
			length += value + (1usize << prefix) - 1;
		}

		Ok(length)
	}

	fn copy_back(&mut self, distance: usize, length: usize) -> Result<(), DecompressionError> {
		if distance > self.written {
			return Err(DecompressionError::InvalidBackReference {
				distance,
				produced: self.written,
			});
		}

		// Byte-wise on purpose: runs may overlap their own output.
		for _ in 0..length {
			let value = self.output[self.written - distance];
			self.push(value)?;
		}
		Ok(())
	}

	fn run(&mut self) -> Result<usize, DecompressionError> {
		while !self.bits.is_exhausted() {
			if self.bits.read_bit()? == 0 {
				let value = self.bits.read_bits(8)? as u8;
				self.push(value)?;
				continue;
			}

			let Some((distance, is_long)) = self.read_distance()? else {
				break;
			};
			let length = self.read_run_length(is_long)?;
			self.copy_back(distance, length)?;
		}

		Ok(self.written)
	}
}

/// Decodes one block inside a working region.
///
/// The compressed block occupies `region[src_offset..src_offset + src_len]` and the
/// output is written to `region[dst_offset..dst_offset + dst_len]`; the two ranges
/// must not overlap and the source must come first.
///
/// Returns the number of output bytes produced, which callers compare against
/// `dst_len`. Malformed token streams are reported as errors, and so are ranges
/// that overlap or do not fit in `region` ([`DecompressionError::RegionTooLarge`]).
pub fn decode_region(
	region: &mut [u8],
	src_offset: usize,
	src_len: usize,
	dst_offset: usize,
	dst_len: usize,
) -> Result<usize, DecompressionError> {
	let src_end = src_offset.saturating_add(src_len);
	let dst_end = dst_offset.saturating_add(dst_len);
	if src_end > dst_offset || dst_end > region.len() {
		return Err(DecompressionError::RegionTooLarge {
			requested: dst_end.max(src_end),
		});
	}

	let (head, tail) = region.split_at_mut(dst_offset);
	let source = &head[src_offset..src_offset + src_len];
	let output = &mut tail[..dst_len];

	let Some((&first, stream)) = source.split_first() else {
		return Ok(0);
	};
	if first != 0 {
		return Err(DecompressionError::InvalidHeader(first));
	}

	let mut state = BlockState {
		bits: BitReader::new(stream),
		output,
		written: 0,
	};
	state.run()
}
