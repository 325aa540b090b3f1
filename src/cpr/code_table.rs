//! The four fixed prefix-code tables driving block decompression.
//!
//! Every block selects one of these tables with a 2-bit selector. Each
//! table holds nine canonical-prefix codes mapping to a copy command
//! plus the extra-bit widths and bases of that command's parameters.
//! A flat lookup array of `2^max_code_len` slots resolves any bit
//! pattern to its entry in one indexed read instead of a bit-by-bit
//! tree walk.
//!
//! The entry values are format constants recovered from the reference
//! tables, not derived. Two columns per entry (`max_length`,
//! `max_offset`) and most of the per-table constants are carried over
//! for fidelity only; the decoder never consults them.

use lazy_static::lazy_static;

/// Copy command attached to a code-table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Copy a single byte from the block's literal data.
    CopyLiteralByte,
    /// Copy a run of bytes from the block's literal data.
    CopyBytesFromInput,
    /// Copy already-written output bytes (back-reference).
    CopyBytesFromOutput,
}

/// One row of a code table.
#[derive(Debug, Clone, Copy)]
pub struct CodeTableEntry {
    /// Copy command this code stands for.
    pub command: Command,
    /// Canonical code value, matched against the low `code_len` bits.
    pub code: u16,
    /// Length of the canonical code in bits.
    pub code_len: u8,
    /// Number of extra bits encoding the copy length.
    pub len_extra_bits: u8,
    /// Base copy length the extra bits are added to.
    pub len_base: u16,
    /// Largest length this entry can encode. Not read by the decoder.
    pub max_length: u16,
    /// Number of extra bits encoding the backward offset.
    pub offset_extra_bits: u8,
    /// Base backward offset the scaled extra bits are added to.
    pub offset_base: u16,
    /// Largest offset this entry can encode. Not read by the decoder.
    pub max_offset: u16,
}

/// Table-level constants from the reference data.
///
/// The decoder derives `offset_shift` from `offset_scale`; the other
/// fields are carried over unused (they may be encoder-side budgets).
#[derive(Debug, Clone, Copy)]
pub struct TableConstants {
    /// Symbol probe width; 6 in every table.
    pub symbol_bits: u8,
    /// Four constants of unresolved meaning.
    pub reserved: [u16; 4],
    /// Scale factor for offset extra bits; `offset_shift` is half of it.
    pub offset_scale: u16,
}

/// One of the four standard code tables, with its derived decode index.
#[derive(Debug)]
pub struct CodeTable {
    entries: [CodeTableEntry; 9],
    constants: TableConstants,
    /// Maps any `max_code_len`-bit pattern to the entry whose canonical
    /// code is a prefix of it.
    decode_index: Vec<u8>,
    index_mask: u32,
    offset_shift: u8,
}

impl CodeTable {
    fn new(entries: [CodeTableEntry; 9], constants: TableConstants) -> Self {
        let max_len = entries.iter().map(|e| e.code_len).max().unwrap_or(0);
        let size = 1usize << max_len;

        // Canonical-prefix fill: every slot whose low `code_len` bits
        // equal `code` resolves to that entry, whatever the upper bits.
        let mut decode_index = vec![0u8; size];
        for (i, entry) in entries.iter().enumerate() {
            let step = 1usize << entry.code_len;
            let mut slot = usize::from(entry.code);
            while slot < size {
                decode_index[slot] = i as u8;
                slot += step;
            }
        }

        Self {
            entries,
            constants,
            decode_index,
            index_mask: (size - 1) as u32,
            offset_shift: (constants.offset_scale >> 1) as u8,
        }
    }

    /// Entry whose canonical code prefixes the accumulator's low bits.
    #[inline]
    pub fn lookup(&self, accumulator: u32) -> &CodeTableEntry {
        let slot = (accumulator & self.index_mask) as usize;
        &self.entries[usize::from(self.decode_index[slot])]
    }

    /// Left-shift applied to offset extra bits before adding the base.
    pub fn offset_shift(&self) -> u8 {
        self.offset_shift
    }

    /// The table's nine entries, in canonical order.
    pub fn entries(&self) -> &[CodeTableEntry; 9] {
        &self.entries
    }

    /// Table-level reference constants.
    pub fn constants(&self) -> &TableConstants {
        &self.constants
    }

    /// Number of slots in the decode index (`2^max_code_len`).
    pub fn index_len(&self) -> usize {
        self.decode_index.len()
    }
}

/// Row constructor keeping the table literals in reference column order.
const fn entry(
    command: Command,
    code: u16,
    code_len: u8,
    len_extra_bits: u8,
    len_base: u16,
    max_length: u16,
    offset_extra_bits: u8,
    offset_base: u16,
    max_offset: u16,
) -> CodeTableEntry {
    CodeTableEntry {
        command,
        code,
        code_len,
        len_extra_bits,
        len_base,
        max_length,
        offset_extra_bits,
        offset_base,
        max_offset,
    }
}

use self::Command::{
    CopyBytesFromInput as Input, CopyBytesFromOutput as Output, CopyLiteralByte as Literal,
};

const TABLE_0: [CodeTableEntry; 9] = [
    entry(Literal, 0, 2, 0, 1, 1, 0, 0, 0),
    entry(Output, 1, 2, 2, 2, 5, 4, 2, 32),
    entry(Output, 2, 3, 2, 2, 5, 11, 546, 4640),
    entry(Output, 3, 3, 2, 2, 5, 8, 34, 544),
    entry(Input, 6, 3, 3, 2, 9, 0, 0, 0),
    entry(Output, 7, 4, 5, 6, 37, 4, 2, 32),
    entry(Output, 15, 5, 5, 6, 37, 8, 34, 544),
    entry(Output, 31, 6, 5, 6, 37, 11, 546, 4640),
    entry(Input, 63, 6, 8, 10, 265, 0, 0, 0),
];

const TABLE_1: [CodeTableEntry; 9] = [
    entry(Literal, 0, 2, 0, 1, 1, 0, 0, 0),
    entry(Output, 1, 2, 2, 2, 5, 3, 4, 32),
    entry(Output, 2, 3, 2, 2, 5, 10, 548, 4640),
    entry(Output, 3, 3, 2, 2, 5, 7, 36, 544),
    entry(Input, 6, 3, 3, 2, 9, 0, 0, 0),
    entry(Output, 7, 4, 5, 6, 37, 3, 4, 32),
    entry(Output, 15, 5, 5, 6, 37, 7, 36, 544),
    entry(Output, 31, 6, 5, 6, 37, 10, 548, 4640),
    entry(Input, 63, 6, 8, 10, 265, 0, 0, 0),
];

const TABLE_2: [CodeTableEntry; 9] = [
    entry(Literal, 0, 2, 0, 1, 1, 0, 0, 0),
    entry(Output, 1, 2, 2, 2, 5, 4, 4, 64),
    entry(Output, 2, 3, 2, 2, 5, 11, 1092, 9184),
    entry(Output, 3, 3, 2, 2, 5, 8, 68, 1088),
    entry(Input, 6, 3, 3, 2, 9, 0, 0, 0),
    entry(Output, 7, 4, 4, 6, 21, 4, 4, 64),
    entry(Output, 15, 5, 4, 6, 21, 8, 68, 1088),
    entry(Output, 31, 6, 4, 6, 21, 11, 1092, 9184),
    entry(Input, 63, 6, 7, 10, 137, 0, 0, 0),
];

const TABLE_3: [CodeTableEntry; 9] = [
    entry(Literal, 0, 2, 0, 1, 1, 0, 0, 0),
    entry(Output, 1, 2, 2, 2, 5, 4, 2, 32),
    entry(Output, 2, 3, 2, 2, 5, 10, 546, 2592),
    entry(Output, 3, 3, 2, 2, 5, 8, 34, 544),
    entry(Input, 6, 3, 3, 2, 9, 0, 0, 0),
    entry(Output, 7, 4, 5, 6, 37, 4, 2, 32),
    entry(Output, 15, 5, 5, 6, 37, 8, 34, 544),
    entry(Output, 31, 6, 5, 6, 37, 10, 546, 2592),
    entry(Input, 63, 6, 8, 10, 265, 0, 0, 0),
];

lazy_static! {
    /// The four standard code tables, built once and shared by every
    /// decode. Write-once, read-only afterwards.
    pub static ref CODE_TABLES: [CodeTable; 4] = [
        CodeTable::new(TABLE_0, TableConstants {
            symbol_bits: 6,
            reserved: [16, 4640, 265, 37],
            offset_scale: 2,
        }),
        CodeTable::new(TABLE_1, TableConstants {
            symbol_bits: 6,
            reserved: [15, 4640, 265, 37],
            offset_scale: 4,
        }),
        CodeTable::new(TABLE_2, TableConstants {
            symbol_bits: 6,
            reserved: [15, 9184, 137, 21],
            offset_scale: 4,
        }),
        CodeTable::new(TABLE_3, TableConstants {
            symbol_bits: 6,
            reserved: [16, 2592, 265, 37],
            offset_scale: 2,
        }),
    ];
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn decode_index_is_complete_and_prefix_consistent() {
        for table in CODE_TABLES.iter() {
            assert_eq!(table.index_len(), 64);
            for pattern in 0..64u32 {
                let entry = table.lookup(pattern);
                // The slot must resolve to the entry whose canonical
                // code matches the pattern's low code_len bits.
                let mask = (1u32 << entry.code_len) - 1;
                assert_eq!(pattern & mask, u32::from(entry.code));
            }
        }
    }

    #[test]
    fn every_entry_is_reachable() {
        for table in CODE_TABLES.iter() {
            for expected in table.entries() {
                let entry = table.lookup(u32::from(expected.code));
                assert_eq!(entry.code, expected.code);
                assert_eq!(entry.code_len, expected.code_len);
            }
        }
    }

    #[test]
    fn offset_shift_is_half_the_scale_constant() {
        let shifts: Vec<u8> = CODE_TABLES.iter().map(CodeTable::offset_shift).collect();
        assert_eq!(shifts, vec![1, 2, 2, 1]);
        for table in CODE_TABLES.iter() {
            assert_eq!(table.offset_shift(), (table.constants().offset_scale >> 1) as u8);
        }
    }

    #[test]
    fn upper_bits_never_change_the_lookup() {
        let table = &CODE_TABLES[0];
        // Code 7 (len 4) must win for any pattern ending in 0111.
        for upper in 0..4u32 {
            let entry = table.lookup(7 | (upper << 4));
            assert_eq!(entry.code, 7);
            assert_eq!(entry.command, Command::CopyBytesFromOutput);
        }
    }
}
