//! Error types for container parsing, block decompression and bitmap normalization.

use std::fmt;

use thiserror::Error;

/// A cursor read or seek that would leave the bounds of its buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OutOfBounds {
	/// A read of `requested` bytes starting at `offset` does not fit
	#[error("read of {requested} bytes at offset {offset} exceeds buffer of {len} bytes")]
	Read {
		/// Cursor position when the read was attempted
		offset: usize,
		/// Number of bytes requested
		requested: usize,
		/// Length of the cursor's view
		len: usize,
	},

	/// A seek target lies before the start or past the end of the view
	#[error("seek to offset {target} is outside buffer of {len} bytes")]
	Seek {
		/// Requested absolute position
		target: i64,
		/// Length of the cursor's view
		len: usize,
	},
}

/// Errors raised by the block decompression engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecompressionError {
	/// The block does not start with the mandatory zero byte
	#[error("invalid block header byte 0x{0:02X}, expected 0x00")]
	InvalidHeader(u8),

	/// The source ran out of bits in the middle of a token
	#[error("compressed stream truncated at bit {bit}")]
	Truncated {
		/// Bit position (relative to the start of the token stream) where input ran out
		bit: usize,
	},

	/// A run-length prefix is longer than the grammar allows
	#[error("run length prefix exceeds 11 bits at bit {bit}")]
	MalformedLength {
		/// Bit position of the offending prefix
		bit: usize,
	},

	/// A back reference points before the start of the output
	#[error("back reference distance {distance} exceeds {produced} bytes produced so far")]
	InvalidBackReference {
		/// Distance encoded in the token
		distance: usize,
		/// Bytes already written when the token was read
		produced: usize,
	},

	/// The stream tries to write past the declared output length
	#[error("decoded data overflows the declared output length of {capacity} bytes")]
	OutputOverflow {
		/// Declared output length
		capacity: usize,
	},

	/// Decoding finished with a different length than declared
	#[error("decoded {actual} bytes, expected {expected}")]
	LengthMismatch {
		/// Declared output length
		expected: usize,
		/// Bytes actually produced
		actual: usize,
	},

	/// The working region cannot hold the source and output ranges
	#[error("working region cannot hold {requested} bytes of source and output")]
	RegionTooLarge {
		/// Bytes required for source plus output
		requested: usize,
	},
}

/// Palette index out of range while normalizing a bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("palette index {index} at ({x}, {y}) is out of range for a palette of {palette_len} colors")]
pub struct BoundsError {
	/// Offending palette index
	pub index: u8,
	/// Number of colors in the palette
	pub palette_len: usize,
	/// Output column of the pixel
	pub x: usize,
	/// Output row of the pixel (top-down)
	pub y: usize,
}

/// Errors from normalizing an image of a parsed character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NormalizeError {
	/// The image index is past the end of the image table
	#[error("image {index} requested, {count} available")]
	UnknownImage {
		/// Requested image index
		index: usize,
		/// Number of images in the character
		count: usize,
	},

	/// A pixel refers to a color outside the palette
	#[error(transparent)]
	Bounds(#[from] BoundsError),
}

/// Container section in which a structural error was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
	/// File header and locator table
	Header,
	/// Character info block
	CharacterInfo,
	/// Localized name table
	LocalizedInfo,
	/// Color palette
	Palette,
	/// Image directory or image record
	Image,
	/// Animation directory or animation record
	Animation,
	/// Sound directory or sound record
	Sound,
}

impl fmt::Display for Section {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Section::Header => write!(f, "header"),
			Section::CharacterInfo => write!(f, "character info"),
			Section::LocalizedInfo => write!(f, "localized info"),
			Section::Palette => write!(f, "palette"),
			Section::Image => write!(f, "image"),
			Section::Animation => write!(f, "animation"),
			Section::Sound => write!(f, "sound"),
		}
	}
}

/// Errors that can occur when parsing a character container.
#[derive(Debug, Error)]
pub enum FormatError {
	/// IO error while reading the container from disk
	#[error(transparent)]
	Io(#[from] std::io::Error),

	/// A read ran past the end of a chunk or of the buffer
	#[error("truncated container: {0}")]
	Truncated(#[from] OutOfBounds),

	/// The signature does not identify a character container
	#[error("invalid signature: expected 0x{expected:08X}, got 0x{actual:08X}")]
	InvalidMagic {
		/// Expected signature
		expected: u32,
		/// Signature found in the buffer
		actual: u32,
	},

	/// A locator points outside the buffer
	#[error("{section} locator [{offset}, +{size}) is outside buffer of {len} bytes")]
	LocatorOutOfRange {
		/// Section the locator belongs to
		section: Section,
		/// Declared offset
		offset: u32,
		/// Declared size
		size: u32,
		/// Buffer length
		len: usize,
	},

	/// Structurally inconsistent data
	#[error("malformed {section}: {reason}")]
	Malformed {
		/// Section containing the inconsistency
		section: Section,
		/// Human-readable description
		reason: String,
	},

	/// An animation frame references an image that does not exist
	#[error(
		"animation '{animation}' frame {frame} references image {image_index}, but only {image_count} images exist"
	)]
	DanglingImageReference {
		/// Animation name
		animation: String,
		/// Frame index within the animation
		frame: usize,
		/// Referenced image index
		image_index: u32,
		/// Number of images in the container
		image_count: usize,
	},

	/// An animation frame references a sound that does not exist
	#[error(
		"animation '{animation}' frame {frame} references sound {sound_index}, but only {sound_count} sounds exist"
	)]
	DanglingSoundReference {
		/// Animation name
		animation: String,
		/// Frame index within the animation
		frame: usize,
		/// Referenced sound index
		sound_index: u16,
		/// Number of sounds in the container
		sound_count: usize,
	},

	/// A compressed payload failed to decode
	#[error("image {image_index}: {source}")]
	Decompression {
		/// Index of the image whose payload failed
		image_index: usize,
		/// Underlying decoder error
		#[source]
		source: DecompressionError,
	},

	/// A value exceeds a limit configured in [`ParseConfig`](crate::file::acs::ParseConfig)
	#[error("{what} of {value} exceeds the configured limit of {limit}")]
	LimitExceeded {
		/// Name of the limited quantity
		what: &'static str,
		/// Value found in the container
		value: usize,
		/// Configured limit
		limit: usize,
	},
}

impl FormatError {
	/// Creates a [`FormatError::Malformed`] error.
	pub fn malformed(section: Section, reason: impl Into<String>) -> Self {
		Self::Malformed {
			section,
			reason: reason.into(),
		}
	}
}
