//! Hamming (7,4) Block Code
//!
//! Four data bits are protected by three parity bits placed at the
//! power-of-two positions of the codeword:
//!
//! ```text
//! position:  1   2   3   4   5   6   7
//! bit:       p1  p2  d1  p3  d2  d3  d4
//!
//! p1 = d1 ⊕ d2 ⊕ d4
//! p2 = d1 ⊕ d3 ⊕ d4
//! p3 = d2 ⊕ d3 ⊕ d4
//! ```
//!
//! The syndrome `s1 + 2·s2 + 4·s3` is the 1-based position of a single
//! flipped bit, which the decoder corrects. Two flips in one block produce a
//! non-zero syndrome pointing at a third position; the repaired block is a
//! different codeword, so the decoded nibble differs from the original.
//! Data is zero-padded to a whole number of nibbles on encode.

use super::DecodeStats;
use crate::types::{Bit, BitStream};

/// Data bits per block
pub const DATA_BITS: usize = 4;
/// Coded bits per block
pub const BLOCK_BITS: usize = 7;

/// Hamming (7,4) encoder/decoder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hamming74;

impl Hamming74 {
    /// Encode 4 data bits into a 7-bit codeword
    pub fn encode_block(&self, data: [Bit; DATA_BITS]) -> [Bit; BLOCK_BITS] {
        let [d1, d2, d3, d4] = data.map(|b| b & 1);
        let p1 = d1 ^ d2 ^ d4;
        let p2 = d1 ^ d3 ^ d4;
        let p3 = d2 ^ d3 ^ d4;
        [p1, p2, d1, p3, d2, d3, d4]
    }

    /// Syndrome of a codeword: 0 for a valid codeword, otherwise the
    /// 1-based position of the bit a single error would have flipped
    pub fn syndrome(&self, codeword: &[Bit; BLOCK_BITS]) -> usize {
        let c = codeword.map(|b| b & 1);
        let s1 = c[0] ^ c[2] ^ c[4] ^ c[6];
        let s2 = c[1] ^ c[2] ^ c[5] ^ c[6];
        let s3 = c[3] ^ c[4] ^ c[5] ^ c[6];
        (s1 as usize) | ((s2 as usize) << 1) | ((s3 as usize) << 2)
    }

    /// Decode a codeword, correcting a single-bit error.
    ///
    /// Returns the data nibble and whether a repair was applied.
    pub fn decode_block(&self, codeword: [Bit; BLOCK_BITS]) -> ([Bit; DATA_BITS], bool) {
        let mut c = codeword.map(|b| b & 1);
        let syndrome = self.syndrome(&c);
        if syndrome != 0 {
            c[syndrome - 1] ^= 1;
        }
        ([c[2], c[4], c[5], c[6]], syndrome != 0)
    }

    /// Encode a bitstream, zero-padding the final nibble
    pub fn encode(&self, bits: &[Bit]) -> BitStream {
        let mut out = Vec::with_capacity(bits.len().div_ceil(DATA_BITS) * BLOCK_BITS);
        for chunk in bits.chunks(DATA_BITS) {
            let mut nibble = [0u8; DATA_BITS];
            nibble[..chunk.len()].copy_from_slice(chunk);
            out.extend_from_slice(&self.encode_block(nibble));
        }
        out
    }

    /// Decode a bitstream block by block. Trailing bits that do not fill a
    /// codeword are ignored; padding bits are left for the caller to trim
    /// (text decoding packs whole bytes only).
    pub fn decode(&self, coded: &[Bit]) -> (BitStream, DecodeStats) {
        let mut stats = DecodeStats::default();
        let mut out = Vec::with_capacity(coded.len() / BLOCK_BITS * DATA_BITS);

        for block in coded.chunks_exact(BLOCK_BITS) {
            let mut codeword = [0u8; BLOCK_BITS];
            codeword.copy_from_slice(block);
            let (data, repaired) = self.decode_block(codeword);
            stats.total_blocks += 1;
            if repaired {
                stats.corrected_errors += 1;
            }
            out.extend_from_slice(&data);
        }

        (out, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_nibbles() -> impl Iterator<Item = [Bit; DATA_BITS]> {
        (0u8..16).map(|n| [(n >> 3) & 1, (n >> 2) & 1, (n >> 1) & 1, n & 1])
    }

    #[test]
    fn test_codewords_have_zero_syndrome() {
        let code = Hamming74;
        for nibble in all_nibbles() {
            assert_eq!(code.syndrome(&code.encode_block(nibble)), 0);
        }
    }

    #[test]
    fn test_single_flip_corrected_at_every_position() {
        let code = Hamming74;
        for nibble in all_nibbles() {
            for pos in 0..BLOCK_BITS {
                let mut cw = code.encode_block(nibble);
                cw[pos] ^= 1;
                assert_eq!(code.syndrome(&cw), pos + 1);
                let (data, repaired) = code.decode_block(cw);
                assert_eq!(data, nibble);
                assert!(repaired);
            }
        }
    }

    #[test]
    fn test_double_flip_changes_output() {
        let code = Hamming74;
        for nibble in all_nibbles() {
            for a in 0..BLOCK_BITS {
                for b in (a + 1)..BLOCK_BITS {
                    let mut cw = code.encode_block(nibble);
                    cw[a] ^= 1;
                    cw[b] ^= 1;
                    let (data, repaired) = code.decode_block(cw);
                    assert!(repaired);
                    assert_ne!(data, nibble, "flips at {a},{b}");
                }
            }
        }
    }

    #[test]
    fn test_stream_padding() {
        let code = Hamming74;
        let coded = code.encode(&[1, 0, 1, 1, 1]);
        assert_eq!(coded.len(), 14);
        let (bits, stats) = code.decode(&coded);
        assert_eq!(bits, vec![1, 0, 1, 1, 1, 0, 0, 0]);
        assert_eq!(stats.total_blocks, 2);
        assert_eq!(stats.corrected_errors, 0);
    }
}
