//! Prelude module for `acs_types`.
//!
//! This module provides a convenient way to import commonly used types, traits, and functions.
//!
//! # Examples
//!
//! ```no_run
//! use acs_types::prelude::*;
//!
//! let mut engine = Decompressor::new();
//! let block = [0x00, 0x82, 0xFE, 0xFF, 0xFF, 0xFF];
//! assert_eq!(engine.decompress(&block, 1).unwrap(), b"A");
//! ```

// File module types
#[doc(inline)]
pub use crate::file::{
	// Model
	AnimationData,
	AnimationFrameInfo,
	// Bitmap
	Bitmap,
	// Decompression
	BlockDecoder,
	BoundsError,
	// Cursor
	ByteCursor,
	CharacterData,
	CharacterInfo,
	Color,
	DecompressionError,
	Decompressor,
	// Errors
	FormatError,
	FrameImage,
	ImageEntry,
	NormalizeError,
	OutOfBounds,
	Palette,
	// Parsing
	ParseConfig,
	Parser,
	Section,
	Sound,
	normalize,
	normalize_rows,
	parse,
	stride,
};

// Re-export the file module for advanced usage
#[doc(inline)]
pub use crate::file;
