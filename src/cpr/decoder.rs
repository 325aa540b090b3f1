//! Container-level decoding.
//!
//! Orchestrates the header parser and the block decoder: one zeroed
//! output buffer of the declared total size, each block written at an
//! increasing cursor, and the cursor bumped to the next 0x4000 boundary
//! between blocks. The skipped padding bytes keep their zero value.

use crate::cpr::block::{BLOCK_SIZE, decode_block};
use crate::cpr::header;
use crate::error::Result;

/// Decode a whole `CPRNAV_2` container into its uncompressed payload.
///
/// This is a pure function over in-memory bytes with no filesystem or
/// console side effects. On success the returned buffer is exactly
/// `total_uncompressed_size` bytes long.
pub fn decode(data: &[u8]) -> Result<Vec<u8>> {
    let (file_header, blocks) = header::parse(data)?;
    let total = file_header.total_uncompressed_size as usize;
    let mut output = vec![0u8; total];

    tracing::debug!(blocks = blocks.len(), total, "decoding container");

    let mut cursor = 0usize;
    for (index, range) in blocks.iter().enumerate() {
        let window = BLOCK_SIZE.min(total - cursor);
        let raw = &data[range.start as usize..range.end as usize];
        let written = decode_block(raw, &mut output[cursor..cursor + window])?;
        tracing::trace!(block = index, written, "block decoded");

        cursor += written;
        if cursor % BLOCK_SIZE != 0 {
            cursor = total.min((cursor / BLOCK_SIZE + 1) * BLOCK_SIZE);
        }
    }

    Ok(output)
}
