//! This module is separated into its own crate so the public `acs-rs` facade stays thin, and should not be used directly.

/// `use acs_rs::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export acs_types for convenience
pub use acs_types;

// Re-export commonly used types at crate root
pub use acs_types::file::{CharacterData, Decompressor, FormatError, ParseConfig, Parser, parse};
