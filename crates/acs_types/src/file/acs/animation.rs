//! Animation directory and animation records.
//!
//! An animation is a named, non-empty list of frames. Each frame draws one or more
//! images at an offset from the canvas origin, optionally plays a sound, and may
//! branch to another frame with a given probability.
//!
//! ```text
//! Frame record
//! ------------------------------------------------------------
//! u16        image count
//!   u32 image index, i16 x, i16 y        (per image)
//! u16        sound index (0xFFFF = none)
//! u16        duration in 10 ms ticks
//! i16        exit frame (-1 = none)
//! u8         branch count
//!   u16 frame index, u16 probability     (per branch)
//! u8         overlay count
//!   overlay records
//! ```

use std::fmt;

use serde::Serialize;

use crate::file::{ByteCursor, FormatError, Section};

use super::types::{Locator, read_data_block, read_string};

/// Sound index meaning "no sound"
const NO_SOUND: u16 = 0xFFFF;

/// Exit frame meaning "no exit branch"
const NO_EXIT_FRAME: i16 = -1;

/// Length of one frame tick
pub const TICK_MILLIS: u32 = 10;

/// One entry of the animation directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct AnimationLocator {
	pub name: String,
	pub locator: Locator,
}

impl AnimationLocator {
	pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self, FormatError> {
		Ok(Self {
			name: read_string(cursor)?,
			locator: Locator::read(cursor)?,
		})
	}
}

/// What happens when an animation is interrupted or finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TransitionType {
	/// Play the return animation
	ReturnAnimation,
	/// Follow the frames' exit branches
	ExitBranches,
	/// No transition
	None,
}

impl TransitionType {
	fn from_u8(value: u8) -> Result<Self, FormatError> {
		match value {
			0 => Ok(Self::ReturnAnimation),
			1 => Ok(Self::ExitBranches),
			2 => Ok(Self::None),
			other => Err(FormatError::malformed(
				Section::Animation,
				format!("unknown transition type {other}"),
			)),
		}
	}
}

impl fmt::Display for TransitionType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TransitionType::ReturnAnimation => write!(f, "return animation"),
			TransitionType::ExitBranches => write!(f, "exit branches"),
			TransitionType::None => write!(f, "none"),
		}
	}
}

/// An image drawn as part of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameImage {
	/// Index into the character's image table
	pub image_index: u32,
	/// Horizontal offset from the canvas origin
	pub x_offset: i16,
	/// Vertical offset from the canvas origin
	pub y_offset: i16,
}

/// A probabilistic jump to another frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Branch {
	/// Target frame within the same animation
	pub frame_index: u16,
	/// Chance of taking the branch, in percent
	pub probability: u16,
}

/// Mouth shape drawn over a frame while the character speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OverlayKind {
	/// Mouth closed
	Closed,
	/// Wide open, variant 1
	Wide1,
	/// Wide open, variant 2
	Wide2,
	/// Wide open, variant 3
	Wide3,
	/// Wide open, variant 4
	Wide4,
	/// Medium opening
	Medium,
	/// Narrow opening
	Narrow,
}

impl OverlayKind {
	fn from_u8(value: u8) -> Result<Self, FormatError> {
		Ok(match value {
			0 => Self::Closed,
			1 => Self::Wide1,
			2 => Self::Wide2,
			3 => Self::Wide3,
			4 => Self::Wide4,
			5 => Self::Medium,
			6 => Self::Narrow,
			other => {
				return Err(FormatError::malformed(
					Section::Animation,
					format!("unknown overlay kind {other}"),
				));
			}
		})
	}
}

/// Mouth overlay of a frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overlay {
	/// Mouth shape
	pub kind: OverlayKind,
	/// Draw in place of the frame's top image instead of above it
	pub replace_top_image: bool,
	/// Index into the character's image table
	pub image_index: u16,
	/// Horizontal offset from the canvas origin
	pub x_offset: i16,
	/// Vertical offset from the canvas origin
	pub y_offset: i16,
	/// Overlay width
	pub width: u16,
	/// Overlay height
	pub height: u16,
	/// Raw region data, when present
	#[serde(skip)]
	pub region: Option<Vec<u8>>,
}

impl Overlay {
	fn read(cursor: &mut ByteCursor<'_>) -> Result<Self, FormatError> {
		let kind = OverlayKind::from_u8(cursor.read_u8()?)?;
		let replace_top_image = cursor.read_u8()? != 0;
		let image_index = cursor.read_u16()?;
		cursor.read_u8()?;
		let has_region = cursor.read_u8()? != 0;
		let x_offset = cursor.read_i16()?;
		let y_offset = cursor.read_i16()?;
		let width = cursor.read_u16()?;
		let height = cursor.read_u16()?;
		let region = if has_region {
			Some(read_data_block(cursor)?)
		} else {
			None
		};

		Ok(Self {
			kind,
			replace_top_image,
			image_index,
			x_offset,
			y_offset,
			width,
			height,
			region,
		})
	}
}

/// One timed step of an animation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnimationFrameInfo {
	/// Display time in 10 ms ticks
	pub duration: u16,
	/// Images drawn in this frame, bottom-most first
	pub images: Vec<FrameImage>,
	/// Sound started when the frame is shown
	pub sound_index: Option<u16>,
	/// Frame to jump to when the animation is being exited
	pub exit_frame: Option<u16>,
	/// Probabilistic branches taken after the frame
	pub branches: Vec<Branch>,
	/// Mouth overlays
	pub overlays: Vec<Overlay>,
}

impl AnimationFrameInfo {
	fn read(cursor: &mut ByteCursor<'_>) -> Result<Self, FormatError> {
		let image_count = cursor.read_u16()?;
		let mut images = Vec::with_capacity(image_count as usize);
		for _ in 0..image_count {
			images.push(FrameImage {
				image_index: cursor.read_u32()?,
				x_offset: cursor.read_i16()?,
				y_offset: cursor.read_i16()?,
			});
		}

		let sound_index = cursor.read_u16()?;
		let duration = cursor.read_u16()?;
		let exit_frame = match cursor.read_i16()? {
			NO_EXIT_FRAME => None,
			frame if frame >= 0 => Some(frame as u16),
			frame => {
				return Err(FormatError::malformed(
					Section::Animation,
					format!("exit frame {frame} is negative"),
				));
			}
		};

		let branch_count = cursor.read_u8()?;
		let mut branches = Vec::with_capacity(branch_count as usize);
		for _ in 0..branch_count {
			branches.push(Branch {
				frame_index: cursor.read_u16()?,
				probability: cursor.read_u16()?,
			});
		}

		let overlay_count = cursor.read_u8()?;
		let overlays =
			(0..overlay_count).map(|_| Overlay::read(cursor)).collect::<Result<Vec<_>, _>>()?;

		Ok(Self {
			duration,
			images,
			sound_index: (sound_index != NO_SOUND).then_some(sound_index),
			exit_frame,
			branches,
			overlays,
		})
	}

	/// Returns the display time in milliseconds.
	pub fn duration_millis(&self) -> u32 {
		self.duration as u32 * TICK_MILLIS
	}
}

/// A named animation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnimationData {
	/// Animation name
	pub name: String,
	/// Transition behavior
	pub transition: TransitionType,
	/// Animation played on return, may be empty
	pub return_animation: String,
	/// Frames in playback order, never empty
	pub frames: Vec<AnimationFrameInfo>,
}

impl AnimationData {
	/// Reads one animation record.
	///
	/// References to images and sounds are checked by the caller once every table is
	/// known.
	pub(super) fn read(cursor: &mut ByteCursor<'_>) -> Result<Self, FormatError> {
		let name = read_string(cursor)?;
		let transition = TransitionType::from_u8(cursor.read_u8()?)?;
		let return_animation = read_string(cursor)?;

		let frame_count = cursor.read_u16()?;
		if frame_count == 0 {
			return Err(FormatError::malformed(
				Section::Animation,
				format!("animation '{name}' has no frames"),
			));
		}

		let mut frames = Vec::with_capacity(frame_count as usize);
		for _ in 0..frame_count {
			frames.push(AnimationFrameInfo::read(cursor)?);
		}

		log::trace!("animation '{}': {} frames, transition {}", name, frames.len(), transition);

		Ok(Self {
			name,
			transition,
			return_animation,
			frames,
		})
	}

	/// Checks every image and sound reference against the table sizes.
	pub(super) fn validate(&self, image_count: usize, sound_count: usize) -> Result<(), FormatError> {
		for (frame, info) in self.frames.iter().enumerate() {
			let overlay_images = info.overlays.iter().map(|overlay| overlay.image_index as u32);
			for image_index in info.images.iter().map(|image| image.image_index).chain(overlay_images)
			{
				if image_index as usize >= image_count {
					return Err(FormatError::DanglingImageReference {
						animation: self.name.clone(),
						frame,
						image_index,
						image_count,
					});
				}
			}

			if let Some(sound_index) = info.sound_index
				&& sound_index as usize >= sound_count
			{
				return Err(FormatError::DanglingSoundReference {
					animation: self.name.clone(),
					frame,
					sound_index,
					sound_count,
				});
			}
		}
		Ok(())
	}

	/// Returns the total playback time of one pass in milliseconds, ignoring branches.
	pub fn duration_millis(&self) -> u32 {
		self.frames.iter().map(AnimationFrameInfo::duration_millis).sum()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn push_string(data: &mut Vec<u8>, text: &str) {
		let units: Vec<u16> = text.encode_utf16().collect();
		data.extend_from_slice(&(units.len() as u32).to_le_bytes());
		if !units.is_empty() {
			for unit in units {
				data.extend_from_slice(&unit.to_le_bytes());
			}
			data.extend_from_slice(&[0, 0]);
		}
	}

	fn frame(images: &[(u32, i16, i16)], sound: u16, duration: u16) -> Vec<u8> {
		let mut data = (images.len() as u16).to_le_bytes().to_vec();
		for &(index, x, y) in images {
			data.extend_from_slice(&index.to_le_bytes());
			data.extend_from_slice(&x.to_le_bytes());
			data.extend_from_slice(&y.to_le_bytes());
		}
		data.extend_from_slice(&sound.to_le_bytes());
		data.extend_from_slice(&duration.to_le_bytes());
		data.extend_from_slice(&(-1i16).to_le_bytes());
		data.push(0);
		data.push(0);
		data
	}

	fn animation(name: &str, frames: &[Vec<u8>]) -> Vec<u8> {
		let mut data = Vec::new();
		push_string(&mut data, name);
		data.push(2);
		push_string(&mut data, "");
		data.extend_from_slice(&(frames.len() as u16).to_le_bytes());
		for frame in frames {
			data.extend_from_slice(frame);
		}
		data
	}

	#[test]
	fn test_read_animation() {
		let data = animation("Wave", &[frame(&[(0, 0, 0), (1, -4, 12)], NO_SOUND, 10)]);
		let anim = AnimationData::read(&mut ByteCursor::new(&data)).unwrap();

		assert_eq!(anim.name, "Wave");
		assert_eq!(anim.transition, TransitionType::None);
		assert_eq!(anim.frames.len(), 1);
		let info = &anim.frames[0];
		assert_eq!(info.duration_millis(), 100);
		assert_eq!(info.sound_index, None);
		assert_eq!(info.exit_frame, None);
		assert_eq!(
			info.images[1],
			FrameImage {
				image_index: 1,
				x_offset: -4,
				y_offset: 12
			}
		);
	}

	#[test]
	fn test_branches_and_overlays() {
		let mut data = Vec::new();
		push_string(&mut data, "Speak");
		data.push(1);
		push_string(&mut data, "RestPose");
		data.extend_from_slice(&1u16.to_le_bytes());
		data.extend_from_slice(&1u16.to_le_bytes());
		data.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0]);
		data.extend_from_slice(&2u16.to_le_bytes());
		data.extend_from_slice(&5u16.to_le_bytes());
		data.extend_from_slice(&3i16.to_le_bytes());
		data.push(1);
		data.extend_from_slice(&0u16.to_le_bytes());
		data.extend_from_slice(&50u16.to_le_bytes());
		data.push(1);
		data.extend_from_slice(&[5, 1]);
		data.extend_from_slice(&4u16.to_le_bytes());
		data.extend_from_slice(&[0, 1]);
		data.extend_from_slice(&10i16.to_le_bytes());
		data.extend_from_slice(&20i16.to_le_bytes());
		data.extend_from_slice(&8u16.to_le_bytes());
		data.extend_from_slice(&6u16.to_le_bytes());
		data.extend_from_slice(&2u32.to_le_bytes());
		data.extend_from_slice(&[0xAB, 0xCD]);

		let anim = AnimationData::read(&mut ByteCursor::new(&data)).unwrap();
		assert_eq!(anim.transition, TransitionType::ExitBranches);
		assert_eq!(anim.return_animation, "RestPose");

		let info = &anim.frames[0];
		assert_eq!(info.sound_index, Some(2));
		assert_eq!(info.exit_frame, Some(3));
		assert_eq!(
			info.branches,
			vec![Branch {
				frame_index: 0,
				probability: 50
			}]
		);
		let overlay = &info.overlays[0];
		assert_eq!(overlay.kind, OverlayKind::Medium);
		assert!(overlay.replace_top_image);
		assert_eq!(overlay.image_index, 4);
		assert_eq!((overlay.x_offset, overlay.y_offset), (10, 20));
		assert_eq!((overlay.width, overlay.height), (8, 6));
		assert_eq!(overlay.region.as_deref(), Some(&[0xAB, 0xCD][..]));

		assert!(anim.validate(5, 3).is_ok());
		assert!(matches!(
			anim.validate(4, 3),
			Err(FormatError::DanglingImageReference {
				image_index: 4,
				..
			})
		));
	}

	#[test]
	fn test_empty_animation_is_malformed() {
		let data = animation("Empty", &[]);
		assert!(matches!(
			AnimationData::read(&mut ByteCursor::new(&data)),
			Err(FormatError::Malformed {
				section: Section::Animation,
				..
			})
		));
	}

	#[test]
	fn test_dangling_image_reference() {
		let data = animation("Show", &[frame(&[(0, 0, 0)], NO_SOUND, 1), frame(&[(7, 0, 0)], NO_SOUND, 1)]);
		let anim = AnimationData::read(&mut ByteCursor::new(&data)).unwrap();
		let err = anim.validate(5, 0).unwrap_err();
		assert!(matches!(
			err,
			FormatError::DanglingImageReference {
				frame: 1,
				image_index: 7,
				image_count: 5,
				..
			}
		));
	}

	#[test]
	fn test_dangling_sound_reference() {
		let data = animation("Hide", &[frame(&[(0, 0, 0)], 3, 1)]);
		let anim = AnimationData::read(&mut ByteCursor::new(&data)).unwrap();
		assert!(anim.validate(1, 4).is_ok());
		assert!(matches!(
			anim.validate(1, 3),
			Err(FormatError::DanglingSoundReference {
				sound_index: 3,
				sound_count: 3,
				..
			})
		));
	}

	#[test]
	fn test_negative_exit_frame() {
		let mut bad = frame(&[(0, 0, 0)], NO_SOUND, 1);
		bad[14..16].copy_from_slice(&(-2i16).to_le_bytes());
		let data = animation("Exit", &[bad]);
		assert!(matches!(
			AnimationData::read(&mut ByteCursor::new(&data)),
			Err(FormatError::Malformed {
				section: Section::Animation,
				..
			})
		));

		let mut good = frame(&[(0, 0, 0)], NO_SOUND, 1);
		good[14..16].copy_from_slice(&3i16.to_le_bytes());
		let anim = AnimationData::read(&mut ByteCursor::new(&animation("Exit", &[good]))).unwrap();
		assert_eq!(anim.frames[0].exit_frame, Some(3));
	}

	#[test]
	fn test_unknown_transition() {
		let mut data = Vec::new();
		push_string(&mut data, "Odd");
		data.push(9);
		assert!(AnimationData::read(&mut ByteCursor::new(&data)).is_err());
	}
}
