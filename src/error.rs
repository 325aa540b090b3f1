//! Error types for `cprnav`

use thiserror::Error;

/// The error type for `cprnav` operations.
///
/// Every variant is terminal for the file being decoded: the decoder
/// never retries or self-heals a bad input.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Header Errors ====================
    /// A fixed header field does not match the format.
    #[error("invalid header: {field} (expected {expected}, got {actual})")]
    InvalidHeader {
        /// Name of the offending header field.
        field: &'static str,
        /// The value the format requires.
        expected: String,
        /// The value found in the file.
        actual: String,
    },

    /// The block offset table never lands on the first block offset,
    /// e.g. because the header is misaligned.
    #[error("unsupported offset table: cursor {cursor:#x} missed first block offset {first_block_offset:#x}")]
    UnsupportedOffsetTable {
        /// Read position after walking the table.
        cursor: u32,
        /// The offset the table was expected to end at.
        first_block_offset: u32,
    },

    // ==================== Block Errors ====================
    /// Compressed block data ran out while input bytes were still needed.
    #[error("truncated block: input exhausted at offset {offset}")]
    TruncatedBlock {
        /// Offset within the block (or file) where the read failed.
        offset: usize,
    },

    /// A bit request outside the supported `1..=32` range.
    #[error("invalid bit request: {requested} bits")]
    InvalidBitRequest {
        /// Number of bits that was asked for.
        requested: u8,
    },

    /// A back-reference addressed bytes outside the already-written
    /// region of the output window.
    #[error("invalid back-reference: distance {distance} at output position {position}")]
    InvalidBackReference {
        /// Output position at which the copy was issued.
        position: usize,
        /// Backward distance the copy asked for.
        distance: usize,
    },

    /// The capacity field of a block does not fit its output window.
    #[error("invalid block capacity field {declared:#x} for a window of {window} bytes")]
    InvalidBlockCapacity {
        /// Raw value of the 16-bit capacity field.
        declared: usize,
        /// Size of the output window the block was given.
        window: usize,
    },
}

/// A specialized Result type for `cprnav` operations.
pub type Result<T> = std::result::Result<T, Error>;
