//! Container inspection utilities.
//!
//! Reports header fields and the block table without running the
//! decompressor, for tooling and diagnostics.

use std::path::Path;

use serde::Serialize;

use crate::cpr::header;
use crate::error::Result;

/// Information about a `CPRNAV_2` container file.
#[derive(Debug, Clone, Serialize)]
pub struct ContainerInfo {
    /// Format version from the header.
    pub version: u16,
    /// The unknown header flag word.
    pub flag: u16,
    /// Magic signature, rendered as text.
    pub signature: String,
    /// Declared size of the decompressed payload.
    pub total_uncompressed_size: u32,
    /// Compression mode from the header.
    pub compression_mode: u16,
    /// Size of the raw file in bytes.
    pub file_size: u64,
    /// Number of compressed blocks.
    pub num_blocks: usize,
    /// Per-block byte ranges.
    pub blocks: Vec<BlockInfo>,
}

/// Information about one compressed block.
#[derive(Debug, Clone, Serialize)]
pub struct BlockInfo {
    /// Position of the block in the container.
    pub index: usize,
    /// Offset of the block's first byte.
    pub start: u32,
    /// Offset one past the block's last byte.
    pub end: u32,
    /// Compressed size of the block in bytes.
    pub compressed_size: usize,
}

impl ContainerInfo {
    /// Build a report from raw container bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let (file_header, blocks) = header::parse(data)?;

        let blocks: Vec<BlockInfo> = blocks
            .iter()
            .enumerate()
            .map(|(index, range)| BlockInfo {
                index,
                start: range.start,
                end: range.end,
                compressed_size: range.len(),
            })
            .collect();

        Ok(Self {
            version: file_header.version,
            flag: file_header.flag,
            signature: String::from_utf8_lossy(&file_header.signature).into_owned(),
            total_uncompressed_size: file_header.total_uncompressed_size,
            compression_mode: file_header.compression_mode,
            file_size: data.len() as u64,
            num_blocks: blocks.len(),
            blocks,
        })
    }
}

/// Get information about a container file's structure.
///
/// # Errors
/// Returns an error if the file cannot be read or has an invalid header.
pub fn inspect_container<P: AsRef<Path>>(source: P) -> Result<ContainerInfo> {
    let data = std::fs::read(source.as_ref())?;
    ContainerInfo::from_bytes(&data)
}
