//! Coherent Despreading Correlator
//!
//! The receiver knows the carrier exactly (no phase or frequency offset is
//! modelled), so despreading is a straight matched filter:
//!
//! ```text
//! r[n] ──► × cos(2π f_c n / fs) ──► mean over each chip ──► × rx chip ──► mean over cps ──► metric
//!              (downconvert)          (oversampling)                      (integrate)
//! ```
//!
//! With the right chips every product `chip_rx · chip_tx` is +1 and the
//! metric takes the sign of the transmitted symbol. With chips from a
//! different secret the products are ±1 at random and the metric is
//! dominated by chance, which is what garbles a mismatched link.

use crate::modulation::Modulator;
use crate::spreading::ChipSequence;
use crate::types::Sample;

/// Despreads a received passband signal into one metric per symbol
#[derive(Debug, Clone)]
pub struct Correlator {
    modulator: Modulator,
    chips: ChipSequence,
}

impl Correlator {
    /// Create a correlator using the link's carrier and the receiver's
    /// regenerated chip sequence
    pub fn new(modulator: Modulator, chips: ChipSequence) -> Self {
        Self { modulator, chips }
    }

    /// Mix down and integrate each chip period.
    ///
    /// A trailing partial chip is dropped.
    pub fn chip_estimates(&self, received: &[Sample]) -> Vec<Sample> {
        let os = self.modulator.oversampling();
        received
            .chunks_exact(os)
            .enumerate()
            .map(|(chip_index, chunk)| {
                let start = chip_index * os;
                let sum: f64 = chunk
                    .iter()
                    .enumerate()
                    .map(|(i, &r)| r * self.modulator.carrier_at(start + i))
                    .sum();
                sum / os as f64
            })
            .collect()
    }

    /// Correlate against the chip sequence, returning one real metric per
    /// symbol. The metric count is bounded by both the received length and
    /// the number of symbols the chip sequence covers.
    pub fn correlate(&self, received: &[Sample]) -> Vec<Sample> {
        let cps = self.chips.chips_per_symbol();
        if cps == 0 {
            return Vec::new();
        }
        let estimates = self.chip_estimates(received);

        estimates
            .chunks_exact(cps)
            .zip(self.chips.symbol_runs())
            .map(|(est, run)| {
                let dot: f64 = est
                    .iter()
                    .zip(run)
                    .map(|(&e, &chip)| e * f64::from(chip))
                    .sum();
                dot / cps as f64
            })
            .collect()
    }
}
