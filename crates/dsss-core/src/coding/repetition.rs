//! Repetition coding for the `rep3` scheme
//!
//! Every payload bit is sent as a run of `factor` identical coded symbols.
//! The receiver takes a majority vote over each run, so up to
//! `(factor - 1) / 2` wrong symbols per run are repaired. The factor must be
//! odd, otherwise a split vote would have no winner.
//!
//! ```
//! use dsss_core::coding::RepetitionCode;
//!
//! let rep3 = RepetitionCode::RATE_THIRD;
//! let mut symbols = rep3.encode(&[1, 0]);
//! assert_eq!(symbols, vec![1, 1, 1, 0, 0, 0]);
//!
//! symbols[0] = 0;
//! symbols[4] = 1;
//! let (bits, stats) = rep3.decode(&symbols);
//! assert_eq!(bits, vec![1, 0]);
//! assert_eq!(stats.corrected_errors, 2);
//! ```

use super::DecodeStats;
use crate::types::{Bit, BitStream, DspError, DspResult};

/// Majority-vote repetition code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepetitionCode {
    factor: usize,
}

impl RepetitionCode {
    /// Three symbols per bit
    pub const RATE_THIRD: Self = Self { factor: 3 };

    /// Code with an odd repetition `factor`
    pub fn with_factor(factor: usize) -> DspResult<Self> {
        if factor % 2 == 0 {
            return Err(DspError::invalid(
                "repetition factor",
                format!("must be odd, got {factor}"),
            ));
        }
        Ok(Self { factor })
    }

    pub fn factor(&self) -> usize {
        self.factor
    }

    /// Wrong symbols per run the vote still repairs
    pub fn correctable(&self) -> usize {
        self.factor / 2
    }

    pub fn encode(&self, bits: &[Bit]) -> BitStream {
        bits.iter()
            .flat_map(|&bit| std::iter::repeat(bit & 1).take(self.factor))
            .collect()
    }

    /// Majority vote per run. An incomplete trailing run is dropped.
    ///
    /// `corrected_errors` counts the symbols outvoted in their run.
    pub fn decode(&self, symbols: &[Bit]) -> (BitStream, DecodeStats) {
        let mut stats = DecodeStats::default();
        let bits = symbols
            .chunks_exact(self.factor)
            .map(|run| {
                let ones = run.iter().filter(|&&s| s & 1 == 1).count();
                let zeros = self.factor - ones;
                stats.total_blocks += 1;
                stats.corrected_errors += ones.min(zeros);
                u8::from(ones > zeros)
            })
            .collect();
        (bits, stats)
    }
}
