//! # cprnav
//!
//! A pure-Rust decoder for the `CPRNAV_2` compressed asset container, a
//! proprietary block-based LZ format recovered from a fixed-function
//! navigation device.
//!
//! ## Quick Start
//!
//! ```no_run
//! // Decode raw container bytes in memory
//! let data = std::fs::read("map_tile.PHD")?;
//! let payload = cprnav::decode(&data)?;
//! assert!(!payload.is_empty());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ### Working with files
//!
//! ```no_run
//! use cprnav::extract::decompress_file;
//! use std::path::Path;
//!
//! // Read, decode, and write the payload next to the input
//! let outcome = decompress_file(Path::new("map_tile.PHD"), None)?;
//! println!("wrote {}", outcome.output.display());
//! # Ok::<(), cprnav::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `cprnav` command-line binary

pub mod cpr;
pub mod error;
pub mod extract;

// Re-exports for convenience
pub use cpr::decode;
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::cpr::{BLOCK_SIZE, BlockRange, ContainerInfo, FileHeader, decode, inspect_container};
    pub use crate::error::{Error, Result};
    pub use crate::extract::{
        BatchResult, DecompressedFile, decompress_batch, decompress_file, find_container_files,
        output_path_for,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
