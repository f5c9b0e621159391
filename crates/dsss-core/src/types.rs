//! Core types for DSSS signal processing
//!
//! The link simulated here is real-valued end to end: the carrier is a
//! cosine and every stage waveform is a sequence of `f64` samples. Complex
//! numbers only appear inside the FFT based blocks (spectrum analysis and
//! the band-limited noise generator).
//!
//! ## Bits, chips and symbols
//!
//! ```text
//!   bit     0 / 1 value carried by the message (Bit = u8, always 0 or 1)
//!   symbol  one coded bit after the coding scheme, mapped to ±1 (NRZ)
//!   chip    one ±1 element of the spreading sequence
//! ```

use num_complex::Complex64;

/// Type alias for complex numbers using f64 precision
pub type Complex = Complex64;

/// A floating point sample (real-valued signals)
pub type Sample = f64;

/// A single bit, stored as `0` or `1`
pub type Bit = u8;

/// Raw bits, one bit per element
pub type BitStream = Vec<Bit>;

/// Result type for DSP operations
pub type DspResult<T> = Result<T, DspError>;

/// Errors that can occur while building DSP blocks
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DspError {
    #[error("Unknown coding scheme: {0}. Must be one of nrz, manchester, rep3, hamming74")]
    UnknownCodingScheme(String),

    #[error("Unknown stage: {0}")]
    UnknownStage(String),

    #[error("Invalid {name}: {reason}")]
    InvalidArgument { name: &'static str, reason: String },
}

impl DspError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}

/// Map a bit to its NRZ level (1 → +1.0, 0 → -1.0)
#[inline]
pub fn bit_to_nrz(bit: Bit) -> Sample {
    if bit & 1 == 1 {
        1.0
    } else {
        -1.0
    }
}

/// Hard decision of a soft value: strictly positive → 1, otherwise 0
#[inline]
pub fn nrz_to_bit(value: Sample) -> Bit {
    u8::from(value > 0.0)
}

/// Unpack bytes to individual bits (MSB first)
pub fn bytes_to_bits(data: &[u8]) -> BitStream {
    let mut bits = Vec::with_capacity(data.len() * 8);
    for &byte in data {
        for i in (0..8).rev() {
            bits.push((byte >> i) & 1);
        }
    }
    bits
}

/// Pack bits into bytes (MSB first). Trailing bits that don't fill a
/// complete byte are discarded.
pub fn bits_to_bytes(bits: &[Bit]) -> Vec<u8> {
    bits.chunks_exact(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u8, |acc, (i, &bit)| acc | ((bit & 1) << (7 - i)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nrz_mapping() {
        assert_eq!(bit_to_nrz(1), 1.0);
        assert_eq!(bit_to_nrz(0), -1.0);
        assert_eq!(nrz_to_bit(0.3), 1);
        assert_eq!(nrz_to_bit(-0.3), 0);
        // Zero is not a positive decision
        assert_eq!(nrz_to_bit(0.0), 0);
    }

    #[test]
    fn test_bytes_bits_msb_first() {
        let bits = bytes_to_bits(&[0x48]); // 'H'
        assert_eq!(bits, vec![0, 1, 0, 0, 1, 0, 0, 0]);
        assert_eq!(bits_to_bytes(&bits), vec![0x48]);
    }

    #[test]
    fn test_bits_to_bytes_drops_partial_byte() {
        let mut bits = bytes_to_bits(b"ok");
        bits.extend_from_slice(&[1, 0, 1]);
        assert_eq!(bits_to_bytes(&bits), b"ok".to_vec());
    }
}
