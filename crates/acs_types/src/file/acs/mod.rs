//! `.ACS` character container support.
//!
//! An ACS file bundles everything needed to animate one character: a palette, a
//! table of 8bpp images, named animations built from those images, and WAVE sounds.
//!
//! # File Structure Overview
//!
//! All integers are little-endian. Sections are addressed through *locators*, a
//! `u32` absolute offset followed by a `u32` size.
//!
//! ## Header (36 bytes at offset 0x00)
//!
//! ```text
//! Offset  Size  Field                Description
//! ------  ----  -------------------  ------------------------------------------
//! 0x00    4     signature            0xABCDABC3
//! 0x04    8     character info       Locator of the character info block
//! 0x0C    8     animation directory  Locator of the animation directory
//! 0x14    8     image directory      Locator of the image directory
//! 0x1C    8     sound directory      Locator of the sound directory
//! ```
//!
//! ## Strings
//!
//! A `u32` count of UTF-16LE code units, followed by the code units and a NUL code
//! unit when the count is non-zero.
//!
//! ## Directories
//!
//! ```text
//! Animation directory: u32 count, then per entry: STRING name, locator
//! Image directory:     u32 count, then per entry: locator, u32 checksum
//! Sound directory:     u32 count, then per entry: locator, u32 checksum
//! ```
//!
//! ## Image Record
//!
//! ```text
//! u8      unknown
//! u16     width
//! u16     height
//! u8      compressed flag
//! u32     payload size, payload bytes
//! u32     region compressed size (0 = stored raw)
//! u32     region decoded size, region bytes
//! ```
//!
//! Pixel rows are stored bottom-up and padded to 4 bytes, so the decoded payload is
//! always `stride(width) × height` bytes. Compressed payloads are decoded through a
//! [`BlockDecoder`].
//!
//! # Examples
//!
//! ```no_run
//! use acs_types::file::acs::CharacterData;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let character = CharacterData::open("merlin.acs")?;
//! println!("{} animations", character.animations().len());
//!
//! if let Some(wave) = character.animation("wave") {
//!     let first = &wave.frames[0];
//!     for placement in &first.images {
//!         let bitmap = character.normalize_image(placement.image_index as usize)?;
//!         println!("{}x{}", bitmap.width(), bitmap.height());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod animation;
mod character;
mod image;
mod parse_config;
mod sound;
mod types;


use std::{collections::HashSet, io::Read, path::Path};

use serde::Serialize;

use crate::file::{
	Bitmap, ByteCursor, FormatError, NormalizeError, Palette, Section,
	bitmap,
	compression::{BlockDecoder, Decompressor},
};

pub use animation::{
	AnimationData, AnimationFrameInfo, Branch, FrameImage, Overlay, OverlayKind, TICK_MILLIS,
	TransitionType,
};
pub use character::{
	BalloonInfo, CharacterInfo, LANG_EN_US, LocalizedInfo, StateInfo, TrayIcon, VoiceExtra,
	VoiceInfo, flags,
};
pub use image::ImageEntry;
pub use parse_config::ParseConfig;
pub use sound::Sound;
pub use types::{Guid, Locator};

use animation::AnimationLocator;
use image::ImageLocator;
use sound::SoundLocator;

pub(crate) mod constants {
	/// File signature
	pub const SIGNATURE: u32 = 0xABCD_ABC3;

	/// Header size: signature plus four locators
	pub const HEADER_SIZE: usize = 4 + 4 * super::Locator::SIZE;

	/// Size of one image or sound directory entry
	pub const MEDIA_ENTRY_SIZE: usize = super::Locator::SIZE + 4;
}

/// Container header: the signature and the four section locators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Header {
	/// Character info block
	pub character_info: Locator,
	/// Animation directory
	pub animations: Locator,
	/// Image directory
	pub images: Locator,
	/// Sound directory
	pub sounds: Locator,
}

impl Header {
	/// Size of the header in bytes
	pub const SIZE: usize = constants::HEADER_SIZE;

	/// Reads and validates the header at the start of `root`.
	///
	/// Every locator must lie within `root`.
	pub fn read(root: &ByteCursor<'_>) -> Result<Self, FormatError> {
		let mut cursor = *root;
		cursor.seek(std::io::SeekFrom::Start(0))?;

		let signature = cursor.read_u32()?;
		if signature != constants::SIGNATURE {
			return Err(FormatError::InvalidMagic {
				expected: constants::SIGNATURE,
				actual: signature,
			});
		}

		let header = Self {
			character_info: Locator::read(&mut cursor)?,
			animations: Locator::read(&mut cursor)?,
			images: Locator::read(&mut cursor)?,
			sounds: Locator::read(&mut cursor)?,
		};

		for (locator, section) in [
			(header.character_info, Section::CharacterInfo),
			(header.animations, Section::Animation),
			(header.images, Section::Image),
			(header.sounds, Section::Sound),
		] {
			locator.view(root, section)?;
		}

		Ok(header)
	}
}

/// A fully parsed character.
///
/// Owns copies of every payload; nothing borrows the input buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterData {
	header: Header,
	info: CharacterInfo,
	#[serde(skip)]
	images: Vec<ImageEntry>,
	animations: Vec<AnimationData>,
	#[serde(skip)]
	sounds: Vec<Sound>,
}

impl CharacterData {
	/// Opens and parses a container with the default configuration.
	///
	/// # Errors
	///
	/// Returns [`FormatError::Io`] if the file cannot be read, or any parse error.
	pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FormatError> {
		let mut file = std::fs::File::open(path)?;
		Self::from_reader(&mut file)
	}

	/// Reads a whole container from `reader` and parses it.
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, FormatError> {
		let mut buffer = Vec::new();
		reader.read_to_end(&mut buffer)?;
		Self::from_bytes(&buffer)
	}

	/// Parses a container with the default configuration and a fresh engine.
	pub fn from_bytes(data: &[u8]) -> Result<Self, FormatError> {
		Parser::new().parse(data)
	}

	/// Returns the container header.
	pub fn header(&self) -> &Header {
		&self.header
	}

	/// Returns the character info block.
	pub fn info(&self) -> &CharacterInfo {
		&self.info
	}

	/// Returns the display name of the character, if any is stored.
	pub fn name(&self) -> Option<&str> {
		self.info.name()
	}

	/// Returns the canvas width in pixels.
	pub fn width(&self) -> u16 {
		self.info.width
	}

	/// Returns the canvas height in pixels.
	pub fn height(&self) -> u16 {
		self.info.height
	}

	/// Returns the palette, transparent index already applied.
	pub fn palette(&self) -> &Palette {
		&self.info.palette
	}

	/// Returns the image table.
	pub fn images(&self) -> &[ImageEntry] {
		&self.images
	}

	/// Returns the image at `index`.
	pub fn image(&self, index: usize) -> Option<&ImageEntry> {
		self.images.get(index)
	}

	/// Returns the animations in directory order.
	pub fn animations(&self) -> &[AnimationData] {
		&self.animations
	}

	/// Looks up an animation by name, ignoring ASCII case.
	pub fn animation(&self, name: &str) -> Option<&AnimationData> {
		self.animations.iter().find(|anim| anim.name.eq_ignore_ascii_case(name))
	}

	/// Returns an iterator over animation names.
	pub fn animation_names(&self) -> impl Iterator<Item = &str> {
		self.animations.iter().map(|anim| anim.name.as_str())
	}

	/// Returns the sound table.
	pub fn sounds(&self) -> &[Sound] {
		&self.sounds
	}

	/// Converts image `index` to a top-down RGBA bitmap using the character palette.
	///
	/// # Errors
	///
	/// Returns [`NormalizeError::UnknownImage`] for an unknown index, or
	/// [`NormalizeError::Bounds`] when a pixel is outside the palette.
	pub fn normalize_image(&self, index: usize) -> Result<Bitmap, NormalizeError> {
		let image = self.image(index).ok_or(NormalizeError::UnknownImage {
			index,
			count: self.images.len(),
		})?;
		Ok(bitmap::normalize(image, self.palette())?)
	}
}

/// Reusable container parser.
///
/// Holds the parse limits and the decompression engine, so the engine's working
/// region is reused across parses.
///
/// ```no_run
/// use acs_types::file::acs::{ParseConfig, Parser};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut parser = Parser::with_config(ParseConfig::strict());
/// for path in ["genie.acs", "robby.acs"] {
///     let character = parser.parse(&std::fs::read(path)?)?;
///     println!("{path}: {} images", character.images().len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Parser<D = Decompressor> {
	config: ParseConfig,
	decoder: D,
}

impl Parser<Decompressor> {
	/// Creates a parser with the default configuration and a new engine.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a parser with the given configuration and a new engine.
	pub fn with_config(config: ParseConfig) -> Self {
		Self {
			config,
			decoder: Decompressor::new(),
		}
	}
}

impl<D: BlockDecoder> Parser<D> {
	/// Creates a parser around an existing decoder.
	pub fn with_decoder(config: ParseConfig, decoder: D) -> Self {
		Self {
			config,
			decoder,
		}
	}

	/// Returns the parse configuration.
	pub fn config(&self) -> &ParseConfig {
		&self.config
	}

	/// Consumes the parser and returns its decoder.
	pub fn into_decoder(self) -> D {
		self.decoder
	}

	/// Parses a complete container.
	///
	/// The first error aborts the parse; no partial model is returned.
	pub fn parse(&mut self, data: &[u8]) -> Result<CharacterData, FormatError> {
		let root = ByteCursor::new(data);
		let header = Header::read(&root)?;
		log::debug!("parsing {} byte container", data.len());

		let mut cursor = header.character_info.view(&root, Section::CharacterInfo)?;
		let info = CharacterInfo::read(&mut cursor, &root)?;

		let images = self.read_images(&root, header.images)?;
		let sounds = self.read_sounds(&root, header.sounds)?;
		let animations = self.read_animations(&root, header.animations)?;

		for animation in &animations {
			animation.validate(images.len(), sounds.len())?;
		}

		log::debug!(
			"parsed character {:?}: {} images, {} animations, {} sounds",
			info.name().unwrap_or("<unnamed>"),
			images.len(),
			animations.len(),
			sounds.len()
		);

		Ok(CharacterData {
			header,
			info,
			images,
			animations,
			sounds,
		})
	}

	fn read_images(
		&mut self,
		root: &ByteCursor<'_>,
		locator: Locator,
	) -> Result<Vec<ImageEntry>, FormatError> {
		let mut directory = locator.view(root, Section::Image)?;
		let count = directory.read_u32()? as usize;
		check_limit("image count", count, self.config.max_images)?;
		check_directory(count, constants::MEDIA_ENTRY_SIZE, &directory, Section::Image)?;

		let mut images = Vec::with_capacity(count);
		let mut total_bytes = 0usize;
		for index in 0..count {
			let entry = ImageLocator::read(&mut directory)?;
			let mut record = entry.locator.view(root, Section::Image)?;
			let image = ImageEntry::read(
				&mut record,
				index,
				entry.checksum,
				total_bytes,
				&mut self.decoder,
				&self.config,
			)?;

			total_bytes += image.data().len();
			images.push(image);
		}

		log::debug!("read {} images, {} pixel bytes", images.len(), total_bytes);
		Ok(images)
	}

	fn read_sounds(
		&mut self,
		root: &ByteCursor<'_>,
		locator: Locator,
	) -> Result<Vec<Sound>, FormatError> {
		if locator.size == 0 {
			return Ok(Vec::new());
		}

		let mut directory = locator.view(root, Section::Sound)?;
		let count = directory.read_u32()? as usize;
		check_directory(count, constants::MEDIA_ENTRY_SIZE, &directory, Section::Sound)?;

		let mut sounds = Vec::with_capacity(count);
		for index in 0..count {
			let entry = SoundLocator::read(&mut directory)?;
			let payload = entry.locator.view(root, Section::Sound)?;
			log::trace!("sound {}: {} bytes", index, payload.len());
			sounds.push(Sound::new(payload.as_slice().to_vec(), entry.checksum));
		}

		log::debug!("read {} sounds", sounds.len());
		Ok(sounds)
	}

	fn read_animations(
		&mut self,
		root: &ByteCursor<'_>,
		locator: Locator,
	) -> Result<Vec<AnimationData>, FormatError> {
		let mut directory = locator.view(root, Section::Animation)?;
		let count = directory.read_u32()? as usize;
		check_limit("animation count", count, self.config.max_animations)?;
		// smallest entry: empty name (4 bytes) plus a locator
		check_directory(count, 4 + Locator::SIZE, &directory, Section::Animation)?;

		let mut animations = Vec::with_capacity(count);
		let mut seen = HashSet::with_capacity(count);
		for _ in 0..count {
			let entry = AnimationLocator::read(&mut directory)?;
			let mut record = entry.locator.view(root, Section::Animation)?;
			let animation = AnimationData::read(&mut record)?;

			if !animation.name.eq_ignore_ascii_case(&entry.name) {
				log::warn!(
					"animation directory name '{}' differs from record name '{}'",
					entry.name,
					animation.name
				);
			}

			if !seen.insert(animation.name.to_ascii_lowercase()) {
				if self.config.reject_duplicate_names {
					return Err(FormatError::malformed(
						Section::Animation,
						format!("duplicate animation name '{}'", animation.name),
					));
				}
				log::warn!("duplicate animation name '{}'", animation.name);
			}

			animations.push(animation);
		}

		log::debug!("read {} animations", animations.len());
		Ok(animations)
	}
}

fn check_limit(what: &'static str, value: usize, limit: usize) -> Result<(), FormatError> {
	if value > limit {
		return Err(FormatError::LimitExceeded {
			what,
			value,
			limit,
		});
	}
	Ok(())
}

/// Rejects counts that cannot fit in the rest of a directory, before allocating.
fn check_directory(
	count: usize,
	entry_size: usize,
	directory: &ByteCursor<'_>,
	section: Section,
) -> Result<(), FormatError> {
	if count.saturating_mul(entry_size) > directory.remaining() {
		return Err(FormatError::malformed(
			section,
			format!(
				"{count} entries of at least {entry_size} bytes do not fit in {} bytes",
				directory.remaining()
			),
		));
	}
	Ok(())
}

/// Parses a container with the default configuration and a fresh engine.
///
/// # Errors
///
/// Returns a [`FormatError`] describing the first problem found.
pub fn parse(data: &[u8]) -> Result<CharacterData, FormatError> {
	Parser::new().parse(data)
}
