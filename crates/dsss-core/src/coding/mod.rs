//! Line Coding and Error Correction
//!
//! Four coding schemes sit between the message bits and the spreader. They
//! trade bandwidth (coded symbols per payload bit) for resilience against
//! symbol errors introduced by noise or a mismatched despreading code.
//!
//! ```text
//! ┌────────────┬─────────────┬──────────────────────────────────────────┐
//! │ Scheme     │ Expansion   │ Error handling                           │
//! ├────────────┼─────────────┼──────────────────────────────────────────┤
//! │ nrz        │ 1           │ none                                     │
//! │ manchester │ 2           │ invalid pairs detected, nearest pattern  │
//! │ rep3       │ 3           │ majority vote, corrects 1 of 3           │
//! │ hamming74  │ 7/4         │ syndrome decoding, corrects 1 of 7       │
//! └────────────┴─────────────┴──────────────────────────────────────────┘
//! ```
//!
//! ## Text Mapping
//!
//! Messages are carried as their UTF-8 bytes, 8 bits per byte, MSB first.
//! The decoder packs complete bytes only and converts them back with lossy
//! UTF-8 replacement, so a corrupted byte shows up as `U+FFFD` instead of
//! failing the decode.
//!
//! ## Processing Pipeline
//!
//! ```text
//! TX: text → UTF-8 bytes → bits → scheme encode → coded bits
//! RX: correlator outputs → decide (> 0) → scheme decode → bits → text
//! ```

pub mod hamming;
pub mod manchester;
pub mod repetition;

pub use hamming::Hamming74;
pub use manchester::ManchesterCode;
pub use repetition::RepetitionCode;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::{bits_to_bytes, bytes_to_bits, nrz_to_bit, Bit, BitStream, DspError, Sample};

/// Coding scheme applied to the payload bits before spreading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodingScheme {
    /// Non-return-to-zero: one symbol per bit, no redundancy
    Nrz,
    /// Manchester: two symbols per bit (0 → 01, 1 → 10)
    Manchester,
    /// Rate-1/3 repetition code with majority vote
    Rep3,
    /// Hamming (7,4) single-error-correcting block code
    Hamming74,
}

impl Default for CodingScheme {
    fn default() -> Self {
        Self::Nrz
    }
}

impl CodingScheme {
    /// All schemes, in declaration order
    pub const ALL: [CodingScheme; 4] = [
        CodingScheme::Nrz,
        CodingScheme::Manchester,
        CodingScheme::Rep3,
        CodingScheme::Hamming74,
    ];

    /// Wire name of the scheme
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nrz => "nrz",
            Self::Manchester => "manchester",
            Self::Rep3 => "rep3",
            Self::Hamming74 => "hamming74",
        }
    }

    /// Number of coded symbols produced for `payload_bits` input bits
    pub fn encoded_len(&self, payload_bits: usize) -> usize {
        match self {
            Self::Nrz => payload_bits,
            Self::Manchester => payload_bits * 2,
            Self::Rep3 => payload_bits * 3,
            Self::Hamming74 => payload_bits.div_ceil(4) * 7,
        }
    }

    /// Code rate (payload bits per coded symbol)
    pub fn code_rate(&self) -> f64 {
        match self {
            Self::Nrz => 1.0,
            Self::Manchester => 0.5,
            Self::Rep3 => 1.0 / 3.0,
            Self::Hamming74 => 4.0 / 7.0,
        }
    }
}

impl fmt::Display for CodingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodingScheme {
    type Err = DspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nrz" => Ok(Self::Nrz),
            "manchester" => Ok(Self::Manchester),
            "rep3" => Ok(Self::Rep3),
            "hamming74" => Ok(Self::Hamming74),
            other => Err(DspError::UnknownCodingScheme(other.to_string())),
        }
    }
}

/// Statistics returned by the decoders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeStats {
    /// Coded symbols (or blocks) that disagreed with the decision and were repaired
    pub corrected_errors: usize,
    /// Blocks recognised as invalid and resolved by a best-effort choice
    pub detected_errors: usize,
    /// Total number of code blocks processed
    pub total_blocks: usize,
}

impl DecodeStats {
    /// Total number of repaired or flagged errors
    pub fn error_count(&self) -> usize {
        self.corrected_errors + self.detected_errors
    }

    /// True when decoding saw no errors at all
    pub fn is_clean(&self) -> bool {
        self.error_count() == 0
    }
}

/// Convert text to its bitstream (UTF-8, MSB first)
pub fn text_to_bits(message: &str) -> BitStream {
    bytes_to_bits(message.as_bytes())
}

/// Convert a bitstream back to text, replacing invalid UTF-8
pub fn bits_to_text(bits: &[Bit]) -> String {
    String::from_utf8_lossy(&bits_to_bytes(bits)).into_owned()
}

/// Apply a coding scheme to payload bits
pub fn encode_bits(bits: &[Bit], scheme: CodingScheme) -> BitStream {
    match scheme {
        CodingScheme::Nrz => bits.iter().map(|b| b & 1).collect(),
        CodingScheme::Manchester => ManchesterCode.encode(bits),
        CodingScheme::Rep3 => RepetitionCode::RATE_THIRD.encode(bits),
        CodingScheme::Hamming74 => Hamming74.encode(bits),
    }
}

/// Reverse a coding scheme. Never fails: uncorrectable blocks produce a
/// best-effort output and are reported in the stats.
pub fn decode_bits(coded: &[Bit], scheme: CodingScheme) -> (BitStream, DecodeStats) {
    match scheme {
        CodingScheme::Nrz => {
            let stats = DecodeStats {
                total_blocks: coded.len(),
                ..Default::default()
            };
            (coded.iter().map(|b| b & 1).collect(), stats)
        }
        CodingScheme::Manchester => ManchesterCode.decode(coded),
        CodingScheme::Rep3 => RepetitionCode::RATE_THIRD.decode(coded),
        CodingScheme::Hamming74 => Hamming74.decode(coded),
    }
}

/// Encode a text message into coded bits
pub fn encode(message: &str, scheme: CodingScheme) -> BitStream {
    encode_bits(&text_to_bits(message), scheme)
}

/// Decode coded bits into text
pub fn decode(coded: &[Bit], scheme: CodingScheme) -> (String, DecodeStats) {
    let (bits, stats) = decode_bits(coded, scheme);
    (bits_to_text(&bits), stats)
}

/// Threshold correlator outputs at zero to recover coded bits
pub fn decide(metrics: &[Sample]) -> BitStream {
    metrics.iter().map(|&m| nrz_to_bit(m)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_all_schemes() {
        for scheme in CodingScheme::ALL {
            for message in ["", "A", "HELLO DSSS", "grüße ✓"] {
                let coded = encode(message, scheme);
                assert_eq!(coded.len(), scheme.encoded_len(message.len() * 8));
                let (decoded, stats) = decode(&coded, scheme);
                assert_eq!(decoded, message, "scheme {scheme}");
                assert!(stats.is_clean(), "scheme {scheme} reported errors");
            }
        }
    }

    #[test]
    fn test_encoded_lengths() {
        assert_eq!(CodingScheme::Nrz.encoded_len(16), 16);
        assert_eq!(CodingScheme::Manchester.encoded_len(16), 32);
        assert_eq!(CodingScheme::Rep3.encoded_len(16), 48);
        assert_eq!(CodingScheme::Hamming74.encoded_len(16), 28);
        assert_eq!(CodingScheme::Hamming74.encoded_len(5), 14);
    }

    #[test]
    fn test_scheme_parse_and_display() {
        for scheme in CodingScheme::ALL {
            let parsed: CodingScheme = scheme.as_str().parse().unwrap();
            assert_eq!(parsed, scheme);
            assert_eq!(scheme.to_string(), scheme.as_str());
        }
        assert_eq!("HAMMING74".parse::<CodingScheme>().unwrap(), CodingScheme::Hamming74);
        assert!(matches!(
            "qpsk".parse::<CodingScheme>(),
            Err(DspError::UnknownCodingScheme(_))
        ));
    }

    #[test]
    fn test_scheme_serde_names() {
        let yaml = serde_yaml::to_string(&CodingScheme::Hamming74).unwrap();
        assert_eq!(yaml.trim(), "hamming74");
        let parsed: CodingScheme = serde_yaml::from_str("rep3").unwrap();
        assert_eq!(parsed, CodingScheme::Rep3);
    }

    #[test]
    fn test_decide_thresholds_at_zero() {
        assert_eq!(decide(&[0.5, -0.5, 0.0, 1e-9]), vec![1, 0, 0, 1]);
    }

    #[test]
    fn test_garbled_bytes_are_replaced() {
        let text = bits_to_text(&[1, 1, 1, 1, 1, 1, 1, 1]);
        assert_eq!(text, "\u{FFFD}");
    }

    #[test]
    fn test_nrz_flip_is_not_repaired() {
        let mut coded = encode("A", CodingScheme::Nrz);
        coded[7] ^= 1;
        let (decoded, stats) = decode(&coded, CodingScheme::Nrz);
        assert_eq!(decoded, "@");
        assert_eq!(stats.error_count(), 0);
    }
}
