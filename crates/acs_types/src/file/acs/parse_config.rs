//! Parse configuration for character containers.
//!
//! This module provides limits that bound the memory a single parse may allocate
//! and the policy for duplicate animation names.

/// Configuration for parsing character containers.
///
/// Every limit is checked before the corresponding allocation, so a hostile
/// container cannot request more memory than the limits allow.
///
/// # Presets
///
/// - `default()`: balanced limits (images up to 2048×2048, 256 MiB of pixel data)
/// - `lenient()`: higher limits, duplicate animation names tolerated
/// - `strict()`: low limits for untrusted input
///
/// # Examples
///
/// ```
/// use acs_types::file::acs::ParseConfig;
///
/// let config = ParseConfig::default();
/// assert!(config.reject_duplicate_names);
///
/// let config = ParseConfig::lenient();
/// assert!(!config.reject_duplicate_names);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseConfig {
	/// Largest accepted image width or height in pixels
	pub max_image_dimension: u16,
	/// Largest accepted number of image directory entries
	pub max_images: usize,
	/// Largest accepted number of animation directory entries
	pub max_animations: usize,
	/// Upper bound on the sum of decoded image bytes
	pub max_total_pixel_bytes: usize,
	/// Largest accepted decoded size of one image region block
	pub max_region_bytes: usize,
	/// Fail on two animations whose names differ only by case
	pub reject_duplicate_names: bool,
}

impl Default for ParseConfig {
	fn default() -> Self {
		Self {
			max_image_dimension: 2048,
			max_images: 65_536,
			max_animations: 4096,
			max_total_pixel_bytes: 256 * 1024 * 1024,
			max_region_bytes: 4 * 1024 * 1024,
			reject_duplicate_names: true,
		}
	}
}

impl ParseConfig {
	/// Create a lenient configuration with higher limits.
	///
	/// Duplicate animation names are accepted; lookups by name return the first.
	pub fn lenient() -> Self {
		Self {
			max_image_dimension: u16::MAX,
			max_images: 1 << 20,
			max_animations: 1 << 16,
			max_total_pixel_bytes: 1024 * 1024 * 1024,
			max_region_bytes: 64 * 1024 * 1024,
			reject_duplicate_names: false,
		}
	}

	/// Create a strict configuration for untrusted input.
	pub fn strict() -> Self {
		Self {
			max_image_dimension: 1024,
			max_images: 8192,
			max_animations: 1024,
			max_total_pixel_bytes: 64 * 1024 * 1024,
			max_region_bytes: 1024 * 1024,
			reject_duplicate_names: true,
		}
	}
}
