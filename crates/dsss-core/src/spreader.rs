//! Direct-Sequence Spreader
//!
//! Coded bits are mapped to NRZ symbols and each symbol is multiplied by
//! its own run of chips:
//!
//! ```text
//! symbol i:     +1                        -1
//! chips:     [+1 -1 -1 +1 ...]        [-1 -1 +1 +1 ...]
//! output:    [+1 -1 -1 +1 ...]        [+1 +1 -1 -1 ...]
//!            └── cps chips ──┘        └── cps chips ──┘
//! ```
//!
//! The output runs at the chip rate and is `symbols × cps` samples long.

use crate::spreading::ChipSequence;
use crate::types::{bit_to_nrz, Bit, Sample};

/// Map coded bits to NRZ symbols (1 → +1, 0 → -1)
pub fn nrz_symbols(bits: &[Bit]) -> Vec<Sample> {
    bits.iter().map(|&b| bit_to_nrz(b)).collect()
}

/// Spreads NRZ symbols with a transmitter chip sequence
#[derive(Debug, Clone)]
pub struct Spreader {
    chips: ChipSequence,
}

impl Spreader {
    pub fn new(chips: ChipSequence) -> Self {
        Self { chips }
    }

    pub fn chips_per_symbol(&self) -> usize {
        self.chips.chips_per_symbol()
    }

    pub fn chips(&self) -> &ChipSequence {
        &self.chips
    }

    /// Spread symbols, one chip run per symbol.
    ///
    /// Symbols beyond the length of the chip sequence are dropped.
    pub fn spread(&self, symbols: &[Sample]) -> Vec<Sample> {
        let mut out = Vec::with_capacity(symbols.len() * self.chips_per_symbol());
        for (&symbol, run) in symbols.iter().zip(self.chips.symbol_runs()) {
            out.extend(run.iter().map(|&chip| symbol * f64::from(chip)));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreading::ChipSequenceGenerator;

    #[test]
    fn test_output_length() {
        let seq = ChipSequenceGenerator::generate("TEST", 16, 5);
        let spreader = Spreader::new(seq);
        let out = spreader.spread(&nrz_symbols(&[1, 0, 1, 1, 0]));
        assert_eq!(out.len(), 5 * 16);
        assert!(out.iter().all(|&x| x == 1.0 || x == -1.0));
    }

    #[test]
    fn test_symbol_polarity() {
        let seq = ChipSequenceGenerator::generate("TEST", 8, 2);
        let spreader = Spreader::new(seq.clone());
        let out = spreader.spread(&[1.0, -1.0]);
        for (i, &chip) in seq.symbol_chips(0).iter().enumerate() {
            assert_eq!(out[i], f64::from(chip));
        }
        for (i, &chip) in seq.symbol_chips(1).iter().enumerate() {
            assert_eq!(out[8 + i], -f64::from(chip));
        }
    }

    #[test]
    fn test_empty_input() {
        let spreader = Spreader::new(ChipSequenceGenerator::generate("TEST", 16, 0));
        assert!(spreader.spread(&[]).is_empty());
    }
}
