#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `acs-rs` decodes Microsoft Agent character containers (`.acs`) into a validated,
//! immutable model of palette, images, animations and sounds.
//!
//! ```no_run
//! use acs_rs::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let character = CharacterData::open("clippit.acs")?;
//! println!("{:?} has {} animations", character.name(), character.animations().len());
//! # Ok(())
//! # }
//! ```
pub use acs_internal::*;
