//! This crate provides core data types and file format support for the `acs-rs` project.
//!
//! # Components
//!
//! - **`ByteCursor`**: bounds-checked little-endian reader over a borrowed buffer
//! - **`Decompressor`**: block decompression engine for compressed image payloads
//! - **ACS**: character container parser producing an immutable [`CharacterData`](file::CharacterData)
//! - **Bitmap**: conversion of stored bottom-up 8bpp images to top-down RGBA
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use acs_types::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("peedy.acs")?;
//! let character = parse(&data)?;
//!
//! for (index, image) in character.images().iter().enumerate() {
//!     let bitmap = normalize(image, character.palette())?;
//!     println!("image {index}: {} pixels", bitmap.pixels().len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Or use explicit paths with a custom configuration:
//!
//! ```no_run
//! use acs_types::file::acs::{ParseConfig, Parser};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut parser = Parser::with_config(ParseConfig::strict());
//! let character = parser.parse(&std::fs::read("peedy.acs")?)?;
//! # Ok(())
//! # }
//! ```

pub mod file;

/// `use acs_types::prelude::*;` to import commonly used items.
pub mod prelude;
