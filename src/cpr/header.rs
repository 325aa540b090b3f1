//! Fixed file header and block offset table parsing.
//!
//! A `CPRNAV_2` container starts with a fixed 0x14-byte header followed
//! by a run of `u32` block end offsets. The first `u32` of that run is
//! special: it is the offset at which the table itself ends, which is
//! also where block 0 begins.

use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::{Error, Result};

/// Magic signature at offset 0x4.
pub const SIGNATURE: &[u8; 8] = b"CPRNAV_2";

/// Required `version` field value.
pub const FORMAT_VERSION: u16 = 5;

/// Required `compression_mode` field value. Mode 1 presumably marks
/// uncompressed payloads but has never been observed in the wild.
pub const COMPRESSION_MODE: u16 = 3;

/// File offset of the block offset table.
const OFFSET_TABLE_START: u64 = 0x14;

/// Fixed header of a `CPRNAV_2` container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    /// Format version, always 5.
    pub version: u16,
    /// Unknown field; observed as 16, never above 64.
    pub flag: u16,
    /// Magic bytes, always `CPRNAV_2`.
    pub signature: [u8; 8],
    /// Size of the fully decompressed payload in bytes.
    pub total_uncompressed_size: u32,
    /// Compression mode, always 3.
    pub compression_mode: u16,
}

/// Byte range of one compressed block within the raw file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    /// Offset of the first byte of the block.
    pub start: u32,
    /// Offset one past the last byte of the block.
    pub end: u32,
}

impl BlockRange {
    /// Length of the block in bytes.
    pub fn len(&self) -> usize {
        (self.end - self.start) as usize
    }

    /// Whether the block spans no bytes at all.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Parse the fixed header and derive the ordered block table.
///
/// Block ranges are contiguous: block 0 starts right after the offset
/// table and each later block starts where the previous one ended. An
/// empty table is valid and yields zero blocks.
pub fn parse(data: &[u8]) -> Result<(FileHeader, Vec<BlockRange>)> {
    let mut cursor = Cursor::new(data);

    let version = cursor.read_u16::<LittleEndian>()?;
    if version != FORMAT_VERSION {
        return Err(Error::InvalidHeader {
            field: "version",
            expected: FORMAT_VERSION.to_string(),
            actual: version.to_string(),
        });
    }

    let flag = cursor.read_u16::<LittleEndian>()?;
    if flag > 64 {
        return Err(Error::InvalidHeader {
            field: "flag",
            expected: "<= 64".to_string(),
            actual: flag.to_string(),
        });
    }

    let mut signature = [0u8; 8];
    cursor.read_exact(&mut signature)?;
    if &signature != SIGNATURE {
        return Err(Error::InvalidHeader {
            field: "signature",
            expected: String::from_utf8_lossy(SIGNATURE).into_owned(),
            actual: String::from_utf8_lossy(&signature).into_owned(),
        });
    }

    let total_uncompressed_size = cursor.read_u32::<LittleEndian>()?;

    let compression_mode = cursor.read_u16::<LittleEndian>()?;
    if compression_mode != COMPRESSION_MODE {
        return Err(Error::InvalidHeader {
            field: "compression_mode",
            expected: COMPRESSION_MODE.to_string(),
            actual: compression_mode.to_string(),
        });
    }
    // The reserved word at 0x12 (observed as 1) is not validated.

    let header = FileHeader {
        version,
        flag,
        signature,
        total_uncompressed_size,
        compression_mode,
    };

    cursor.set_position(OFFSET_TABLE_START);
    let first_block_offset = cursor.read_u32::<LittleEndian>()?;

    let mut ends = Vec::new();
    while cursor.position() < u64::from(first_block_offset) {
        ends.push(cursor.read_u32::<LittleEndian>()?);
    }
    if cursor.position() != u64::from(first_block_offset) {
        return Err(Error::UnsupportedOffsetTable {
            cursor: cursor.position() as u32,
            first_block_offset,
        });
    }

    let mut blocks = Vec::with_capacity(ends.len());
    let mut start = first_block_offset;
    for end in ends {
        if end < start || end as usize > data.len() {
            return Err(Error::TruncatedBlock {
                offset: end as usize,
            });
        }
        blocks.push(BlockRange { start, end });
        start = end;
    }

    Ok((header, blocks))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    /// Build a header + offset table for the given block payload sizes.
    fn fixture(total: u32, block_sizes: &[u32]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        data.extend_from_slice(&16u16.to_le_bytes());
        data.extend_from_slice(SIGNATURE);
        data.extend_from_slice(&total.to_le_bytes());
        data.extend_from_slice(&COMPRESSION_MODE.to_le_bytes());
        data.extend_from_slice(&1u16.to_le_bytes());

        let table_end = 0x18 + 4 * block_sizes.len() as u32;
        data.extend_from_slice(&table_end.to_le_bytes());
        let mut end = table_end;
        for size in block_sizes {
            end += size;
            data.extend_from_slice(&end.to_le_bytes());
        }
        for (i, size) in block_sizes.iter().enumerate() {
            data.extend(std::iter::repeat_n(i as u8, *size as usize));
        }
        data
    }

    #[test]
    fn parses_valid_header_and_blocks() {
        let data = fixture(100, &[10, 20]);
        let (header, blocks) = parse(&data).unwrap();

        assert_eq!(header.version, 5);
        assert_eq!(header.flag, 16);
        assert_eq!(&header.signature, SIGNATURE);
        assert_eq!(header.total_uncompressed_size, 100);
        assert_eq!(header.compression_mode, 3);

        assert_eq!(
            blocks,
            vec![
                BlockRange {
                    start: 0x20,
                    end: 0x2a
                },
                BlockRange {
                    start: 0x2a,
                    end: 0x3e
                },
            ]
        );
        assert_eq!(blocks[0].len(), 10);
    }

    #[test]
    fn empty_offset_table_yields_zero_blocks() {
        let data = fixture(64, &[]);
        let (header, blocks) = parse(&data).unwrap();
        assert_eq!(header.total_uncompressed_size, 64);
        assert!(blocks.is_empty());
    }

    #[test]
    fn rejects_bad_version() {
        let mut data = fixture(4, &[]);
        data[0] = 6;
        assert!(matches!(
            parse(&data),
            Err(Error::InvalidHeader {
                field: "version",
                ..
            })
        ));
    }

    #[test]
    fn rejects_bad_flag() {
        let mut data = fixture(4, &[]);
        data[2..4].copy_from_slice(&65u16.to_le_bytes());
        assert!(matches!(
            parse(&data),
            Err(Error::InvalidHeader { field: "flag", .. })
        ));
    }

    #[test]
    fn rejects_bad_signature() {
        let mut data = fixture(4, &[]);
        data[4] = b'X';
        assert!(matches!(
            parse(&data),
            Err(Error::InvalidHeader {
                field: "signature",
                ..
            })
        ));
    }

    #[test]
    fn rejects_bad_compression_mode() {
        let mut data = fixture(4, &[]);
        data[0x10..0x12].copy_from_slice(&1u16.to_le_bytes());
        assert!(matches!(
            parse(&data),
            Err(Error::InvalidHeader {
                field: "compression_mode",
                ..
            })
        ));
    }

    #[test]
    fn rejects_misaligned_offset_table() {
        let mut data = fixture(4, &[8]);
        // First block offset that no 4-byte read cursor can land on.
        data[0x14..0x18].copy_from_slice(&0x1au32.to_le_bytes());
        assert!(matches!(
            parse(&data),
            Err(Error::UnsupportedOffsetTable {
                first_block_offset: 0x1a,
                ..
            })
        ));
    }

    #[test]
    fn rejects_block_end_past_eof() {
        let mut data = fixture(4, &[8]);
        data[0x18..0x1c].copy_from_slice(&0x1000u32.to_le_bytes());
        assert!(matches!(
            parse(&data),
            Err(Error::TruncatedBlock { offset: 0x1000 })
        ));
    }

    #[test]
    fn rejects_block_end_behind_start() {
        let mut data = fixture(4, &[8, 8]);
        // Second end offset behind the first.
        data[0x1c..0x20].copy_from_slice(&0x10u32.to_le_bytes());
        assert!(matches!(parse(&data), Err(Error::TruncatedBlock { .. })));
    }
}
