//! Bit-level reader over one compressed block.
//!
//! The compressed stream is a run of little-endian dwords. Bits are
//! handed out from the low end of each dword upward, and every request
//! is delivered left-justified: the `n` requested bits occupy the top
//! `n` bits of the returned `u32`, with the first stream bit lowest
//! among them. Callers shift the result into a running accumulator, so
//! the junk in the low `32 - n` bits never matters.
//!
//! The reader always keeps one dword prefetched. Once the block runs
//! out, further dword loads read as zero; the format pads compressed
//! data to dword boundaries and the decode loop stops on the output
//! length before the padding could be misread.

use crate::error::{Error, Result};

/// Stateful bit pump over one block's raw bytes.
///
/// Created fresh per block and discarded at block end.
#[derive(Debug)]
pub struct BitReader<'a> {
    data: &'a [u8],
    /// Byte offset of the next dword to prefetch.
    pos: usize,
    /// The prefetched dword.
    word: u32,
    /// Bits already consumed from `remainder`'s original dword, in `0..32`.
    bits_used: u8,
    /// Not-yet-delivered bits of the dword before `word`, kept in place.
    remainder: u32,
}

impl<'a> BitReader<'a> {
    /// Create a reader over `data`, prefetching the first dword.
    pub fn new(data: &'a [u8]) -> Self {
        let mut reader = Self {
            data,
            pos: 0,
            word: 0,
            bits_used: 0,
            remainder: 0,
        };
        reader.word = reader.load_word();
        reader
    }

    /// Fetch the next little-endian dword, or zero once fewer than four
    /// bytes remain.
    fn load_word(&mut self) -> u32 {
        match self.data.get(self.pos..self.pos + 4) {
            Some(bytes) => {
                self.pos += 4;
                u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
            }
            None => 0,
        }
    }

    /// Return the next `n` bits of the stream, left-justified.
    ///
    /// `n` must be in `1..=32`.
    pub fn next(&mut self, n: u8) -> Result<u32> {
        if n == 0 || n > 32 {
            return Err(Error::InvalidBitRequest { requested: n });
        }
        let wanted = u32::from(n);

        if self.bits_used == 0 {
            // Fresh dword: serve from `word` and prefetch its successor.
            if n == 32 {
                let result = self.word;
                self.word = self.load_word();
                return Ok(result);
            }
            let result = self.word << (32 - wanted);
            self.remainder = self.word ^ (result >> (32 - wanted));
            self.word = self.load_word();
            self.bits_used = n;
            return Ok(result);
        }

        let buffered = 32 - u32::from(self.bits_used);
        if wanted < buffered {
            // Request fits inside the buffered remainder.
            let used = u32::from(self.bits_used) + wanted;
            let result = self.remainder << (32 - used);
            self.remainder ^= result >> (32 - used);
            self.bits_used = used as u8;
            Ok(result)
        } else if wanted == buffered {
            // Remainder drained exactly; `word` is already prefetched.
            self.bits_used = 0;
            Ok(self.remainder)
        } else {
            // Request spans the remainder and the prefetched dword.
            let extra = wanted - buffered;
            let result = (self.word << (32 - extra)) | (self.remainder >> extra);
            self.remainder = self.word >> extra << extra;
            self.word = self.load_word();
            self.bits_used = extra as u8;
            Ok(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    /// Drain `bits` stream bits using the given request sizes, packing
    /// them back into a flat bit sequence (first stream bit = bit 0).
    fn drain(data: &[u8], splits: &[u8]) -> u128 {
        let mut reader = BitReader::new(data);
        let mut collected = 0u128;
        let mut filled = 0u32;
        for &n in splits {
            let value = reader.next(n).unwrap();
            collected |= u128::from(value >> (32 - u32::from(n))) << filled;
            filled += u32::from(n);
        }
        collected
    }

    #[test]
    fn varied_splits_reconstruct_the_same_bit_sequence() {
        let data: Vec<u8> = [0xdeadbeefu32, 0x01234567, 0xcafe5a5a]
            .iter()
            .flat_map(|w| w.to_le_bytes())
            .collect();

        let whole = drain(&data, &[32, 32, 32]);
        assert_eq!(drain(&data, &[3, 13, 16, 7, 30, 27]), whole);
        assert_eq!(drain(&data, &[16, 16, 16, 16, 16, 16]), whole);
        assert_eq!(drain(&data, &[1, 31, 32, 5, 5, 5, 5, 12]), whole);
        assert_eq!(drain(&data, &[24, 24, 24, 24]), whole);
    }

    #[test]
    fn fresh_read_is_left_justified() {
        let data = 0x0000_0005u32.to_le_bytes();
        let mut reader = BitReader::new(&data);
        // Low three bits of the dword are 101.
        assert_eq!(reader.next(3).unwrap() >> 29, 0b101);
    }

    #[test]
    fn rejects_zero_and_oversized_requests() {
        let data = [0u8; 8];
        let mut reader = BitReader::new(&data);
        assert!(matches!(
            reader.next(0),
            Err(Error::InvalidBitRequest { requested: 0 })
        ));
        assert!(matches!(
            reader.next(33),
            Err(Error::InvalidBitRequest { requested: 33 })
        ));
    }

    #[test]
    fn exhausted_stream_reads_as_zero() {
        let data = 0xffff_ffffu32.to_le_bytes();
        let mut reader = BitReader::new(&data);
        assert_eq!(reader.next(32).unwrap(), 0xffff_ffff);
        assert_eq!(reader.next(32).unwrap(), 0);
        assert_eq!(reader.next(7).unwrap(), 0);
    }

    #[test]
    fn partial_trailing_word_reads_as_zero() {
        // Two spare bytes cannot form a dword and are not picked up.
        let data = [0x78, 0x56, 0x34, 0x12, 0xaa, 0xbb];
        let mut reader = BitReader::new(&data);
        assert_eq!(reader.next(32).unwrap(), 0x12345678);
        assert_eq!(reader.next(32).unwrap(), 0);
    }
}
