//! Prelude module for `acs_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use acs_internal::prelude::*;
//!
//! // A 1×1 stored image and a one-color palette
//! let image = ImageEntry::new(1, 1, vec![0, 0, 0, 0]).unwrap();
//! let palette = Palette::from_colors(vec![Color::rgb(10, 20, 30)]).unwrap();
//!
//! let bitmap = normalize(&image, &palette).unwrap();
//! assert_eq!(bitmap.to_rgba8(), vec![10, 20, 30, 255]);
//! ```

// Re-export everything from acs_types::prelude
#[doc(inline)]
pub use acs_types::prelude::*;

// Re-export the entire acs_types module for advanced usage
#[doc(inline)]
pub use acs_types;
