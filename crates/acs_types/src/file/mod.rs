//! File format support for `acs-rs` project.

mod cursor;
mod error;

pub mod acs;
pub mod bitmap;
pub mod compression;
pub mod palette;

// Re-export error types
pub use error::{
	BoundsError, DecompressionError, FormatError, NormalizeError, OutOfBounds, Section,
};

pub use acs::{
	AnimationData, AnimationFrameInfo, CharacterData, CharacterInfo, FrameImage, ImageEntry,
	ParseConfig, Parser, Sound, parse,
};
pub use bitmap::{Bitmap, normalize, normalize_rows, stride};
pub use compression::{BlockDecoder, Decompressor};
pub use cursor::ByteCursor;
pub use palette::{Color, Palette};
