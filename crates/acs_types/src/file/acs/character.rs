//! Character info block: canvas size, palette and character-wide metadata.

use serde::Serialize;

use crate::file::{ByteCursor, Color, FormatError, Palette, Section};

use super::types::{Guid, Locator, read_data_block, read_string};

/// Character flag bits.
pub mod flags {
	/// Voice output is enabled; a voice info record is present
	pub const VOICE_OUTPUT: u32 = 0x0000_0020;
	/// Word balloon is enabled; a balloon info record is present
	pub const BALLOON_ENABLED: u32 = 0x0000_0200;
	/// Balloon resizes to fit its text
	pub const BALLOON_SIZE_TO_TEXT: u32 = 0x0001_0000;
	/// Balloon does not hide automatically
	pub const BALLOON_AUTO_HIDE_DISABLED: u32 = 0x0002_0000;
	/// Balloon text is not paced
	pub const BALLOON_AUTO_PACE_DISABLED: u32 = 0x0004_0000;
	/// Character implements the standard animation set
	pub const STANDARD_ANIMATION_SET: u32 = 0x0010_0000;
}

/// Language ID of US English, preferred when picking a display name
pub const LANG_EN_US: u16 = 0x0409;

/// Text-to-speech settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceInfo {
	/// TTS engine class ID
	pub engine_id: Guid,
	/// TTS mode ID
	pub mode_id: Guid,
	/// Speaking speed
	pub speed: u32,
	/// Voice pitch
	pub pitch: u16,
	/// Optional language and style description
	pub extra: Option<VoiceExtra>,
}

/// Optional part of [`VoiceInfo`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceExtra {
	/// Windows language ID
	pub language_id: u16,
	/// Dialect name
	pub dialect: String,
	/// Speaker gender code
	pub gender: u16,
	/// Speaker age
	pub age: u16,
	/// Speaking style
	pub style: String,
}

impl VoiceInfo {
	fn read(cursor: &mut ByteCursor<'_>) -> Result<Self, FormatError> {
		let engine_id = Guid::read(cursor)?;
		let mode_id = Guid::read(cursor)?;
		let speed = cursor.read_u32()?;
		let pitch = cursor.read_u16()?;

		let extra = if cursor.read_u8()? != 0 {
			Some(VoiceExtra {
				language_id: cursor.read_u16()?,
				dialect: read_string(cursor)?,
				gender: cursor.read_u16()?,
				age: cursor.read_u16()?,
				style: read_string(cursor)?,
			})
		} else {
			None
		};

		Ok(Self {
			engine_id,
			mode_id,
			speed,
			pitch,
			extra,
		})
	}
}

/// Word balloon appearance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalloonInfo {
	/// Number of visible text lines
	pub lines: u8,
	/// Characters per line
	pub chars_per_line: u8,
	/// Text color
	pub foreground: Color,
	/// Fill color
	pub background: Color,
	/// Border color
	pub border: Color,
	/// Font face name
	pub font_name: String,
	/// Font height (Win32 `LOGFONT` semantics)
	pub font_height: i32,
	/// Font weight (400 normal, 700 bold)
	pub font_weight: i32,
	/// Italic font
	pub italic: bool,
}

impl BalloonInfo {
	fn read(cursor: &mut ByteCursor<'_>) -> Result<Self, FormatError> {
		let lines = cursor.read_u8()?;
		let chars_per_line = cursor.read_u8()?;
		let foreground = Color::from_rgbquad(cursor.read_array()?);
		let background = Color::from_rgbquad(cursor.read_array()?);
		let border = Color::from_rgbquad(cursor.read_array()?);
		let font_name = read_string(cursor)?;
		let font_height = cursor.read_i32()?;
		let font_weight = cursor.read_i32()?;
		let italic = cursor.read_u8()? != 0;
		cursor.read_u8()?;

		Ok(Self {
			lines,
			chars_per_line,
			foreground,
			background,
			border,
			font_name,
			font_height,
			font_weight,
			italic,
		})
	}
}

/// Notification area icon, stored as two DIB blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrayIcon {
	/// Monochrome mask bitmap
	#[serde(skip)]
	pub mono_bitmap: Vec<u8>,
	/// Color bitmap
	#[serde(skip)]
	pub color_bitmap: Vec<u8>,
}

/// A named state grouping several animations (e.g. "Speaking", "IdlingLevel1").
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateInfo {
	/// State name
	pub name: String,
	/// Names of the animations played for this state
	pub animations: Vec<String>,
}

/// Name and description of the character in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizedInfo {
	/// Windows language ID
	pub language_id: u16,
	/// Character name
	pub name: String,
	/// Character description
	pub description: String,
	/// Extra data string
	pub extra: String,
}

impl LocalizedInfo {
	/// Reads the localized info table (`u16` count of entries).
	fn read_table(cursor: &mut ByteCursor<'_>) -> Result<Vec<Self>, FormatError> {
		let count = cursor.read_u16()?;
		let mut entries = Vec::with_capacity(count as usize);
		for _ in 0..count {
			entries.push(Self {
				language_id: cursor.read_u16()?,
				name: read_string(cursor)?,
				description: read_string(cursor)?,
				extra: read_string(cursor)?,
			});
		}
		Ok(entries)
	}
}

/// Character-wide metadata from the character info block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterInfo {
	/// Format minor version
	pub minor_version: u16,
	/// Format major version
	pub major_version: u16,
	/// Unique character ID
	pub guid: Guid,
	/// Canvas width in pixels
	pub width: u16,
	/// Canvas height in pixels
	pub height: u16,
	/// Palette index drawn as transparent
	pub transparent_index: u8,
	/// Raw flag bits, see [`flags`]
	pub flags: u32,
	/// Animation set major version
	pub animation_set_major: u16,
	/// Animation set minor version
	pub animation_set_minor: u16,
	/// Text-to-speech settings
	pub voice: Option<VoiceInfo>,
	/// Word balloon settings
	pub balloon: Option<BalloonInfo>,
	/// Color palette
	#[serde(skip)]
	pub palette: Palette,
	/// Notification area icon
	pub tray_icon: Option<TrayIcon>,
	/// Animation states
	pub states: Vec<StateInfo>,
	/// Localized names and descriptions
	pub localized: Vec<LocalizedInfo>,
}

impl CharacterInfo {
	/// Reads the character info block.
	///
	/// `root` is the whole container, needed to follow the localized info locator.
	pub fn read(cursor: &mut ByteCursor<'_>, root: &ByteCursor<'_>) -> Result<Self, FormatError> {
		let minor_version = cursor.read_u16()?;
		let major_version = cursor.read_u16()?;
		let localized_locator = Locator::read(cursor)?;
		let guid = Guid::read(cursor)?;
		let width = cursor.read_u16()?;
		let height = cursor.read_u16()?;
		let transparent_index = cursor.read_u8()?;
		let flags = cursor.read_u32()?;
		let animation_set_major = cursor.read_u16()?;
		let animation_set_minor = cursor.read_u16()?;

		if width == 0 || height == 0 {
			return Err(FormatError::malformed(
				Section::CharacterInfo,
				format!("canvas size {width}x{height} is empty"),
			));
		}

		let voice = if flags & flags::VOICE_OUTPUT != 0 {
			Some(VoiceInfo::read(cursor)?)
		} else {
			None
		};
		let balloon = if flags & flags::BALLOON_ENABLED != 0 {
			Some(BalloonInfo::read(cursor)?)
		} else {
			None
		};

		let mut palette = Palette::read(cursor)?;
		if !palette.set_transparent(transparent_index) {
			log::warn!(
				"transparent index {} is outside the {}-color palette",
				transparent_index,
				palette.len()
			);
		}

		let tray_icon = if cursor.read_u8()? != 0 {
			Some(TrayIcon {
				mono_bitmap: read_data_block(cursor)?,
				color_bitmap: read_data_block(cursor)?,
			})
		} else {
			None
		};

		let state_count = cursor.read_u16()?;
		let mut states = Vec::with_capacity(state_count as usize);
		for _ in 0..state_count {
			let name = read_string(cursor)?;
			let count = cursor.read_u16()?;
			let animations =
				(0..count).map(|_| read_string(cursor)).collect::<Result<Vec<_>, _>>()?;
			states.push(StateInfo {
				name,
				animations,
			});
		}

		let localized = if localized_locator.size == 0 {
			Vec::new()
		} else {
			let mut view = localized_locator.view(root, Section::LocalizedInfo)?;
			LocalizedInfo::read_table(&mut view)?
		};

		log::debug!(
			"character info v{}.{}: {}x{} canvas, {} colors, {} states, {} localized names",
			major_version,
			minor_version,
			width,
			height,
			palette.len(),
			states.len(),
			localized.len()
		);

		Ok(Self {
			minor_version,
			major_version,
			guid,
			width,
			height,
			transparent_index,
			flags,
			animation_set_major,
			animation_set_minor,
			voice,
			balloon,
			palette,
			tray_icon,
			states,
			localized,
		})
	}

	/// Returns `true` if all bits of `flag` are set.
	pub fn has_flag(&self, flag: u32) -> bool {
		self.flags & flag == flag
	}

	/// Returns the localized entry for `language_id`, if any.
	pub fn localized(&self, language_id: u16) -> Option<&LocalizedInfo> {
		self.localized.iter().find(|info| info.language_id == language_id)
	}

	/// Returns the display name, preferring US English over the first entry.
	pub fn name(&self) -> Option<&str> {
		self.localized(LANG_EN_US).or_else(|| self.localized.first()).map(|info| info.name.as_str())
	}
}
