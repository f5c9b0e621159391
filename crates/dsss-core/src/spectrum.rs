//! Spectrum Analysis
//!
//! One-sided magnitude spectrum of a real stage waveform:
//!
//! ```text
//! X[k] = Σ x[n]·e^(-j2πkn/N)        k = 0 ..= ⌊N/2⌋
//! |X[k]| / N                        linear magnitude
//! f[k] = k·fs / N                   non-negative frequency axis
//! ```
//!
//! Normalizing by N makes a bin's value independent of the record length:
//! a unit cosine that falls exactly on a bin reads 0.5 there.
//!
//! The spreading gain of the link is visible by comparing snapshots: the
//! `source` stage concentrates its energy near DC at the symbol rate while
//! `spreader` spreads it over the chip rate, and `modulator` moves the
//! spread lobe up to the carrier.

use serde::{Deserialize, Serialize};

use crate::fft::{bin_frequency, FftProcessor};
use crate::stage::{StageName, StageWaveform};

/// Frequency-domain view of one stage's waveform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumSnapshot {
    pub stage: StageName,
    /// Ascending, non-negative bin frequencies in Hz
    pub frequencies: Vec<f64>,
    /// Linear magnitude per bin, normalized by the record length
    pub magnitudes: Vec<f64>,
    pub sample_rate: f64,
}

impl SpectrumSnapshot {
    /// Snapshot with no bins
    pub fn empty(stage: StageName, sample_rate: f64) -> Self {
        Self {
            stage,
            frequencies: Vec::new(),
            magnitudes: Vec::new(),
            sample_rate,
        }
    }

    pub fn num_bins(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }

    /// Frequency and magnitude of the strongest bin
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.magnitudes
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(k, &mag)| (self.frequencies[k], mag))
    }

    /// Copy reduced to at most `max_points` bins by stride decimation
    pub fn decimated(&self, max_points: usize) -> Self {
        Self {
            stage: self.stage,
            frequencies: decimate(&self.frequencies, max_points),
            magnitudes: decimate(&self.magnitudes, max_points),
            sample_rate: self.sample_rate,
        }
    }
}

/// Stateless FFT magnitude analyzer
#[derive(Debug, Clone, Copy, Default)]
pub struct SpectrumAnalyzer;

impl SpectrumAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Compute the one-sided magnitude spectrum of a waveform.
    ///
    /// An empty waveform yields an empty snapshot.
    pub fn analyze(&self, waveform: &StageWaveform) -> SpectrumSnapshot {
        let n = waveform.samples.len();
        if n == 0 {
            return SpectrumSnapshot::empty(waveform.stage, waveform.sample_rate);
        }

        let mut fft = FftProcessor::new(n);
        let spectrum = fft.fft_real(&waveform.samples);
        let bins = n / 2 + 1;
        let scale = 1.0 / n as f64;

        let frequencies = (0..bins)
            .map(|k| bin_frequency(k, n, waveform.sample_rate))
            .collect();
        let magnitudes = spectrum[..bins].iter().map(|c| c.norm() * scale).collect();

        SpectrumSnapshot {
            stage: waveform.stage,
            frequencies,
            magnitudes,
            sample_rate: waveform.sample_rate,
        }
    }
}

/// Keep every `ceil(len / max_points)`-th value so that at most
/// `max_points` remain. `max_points == 0` disables decimation.
pub fn decimate(values: &[f64], max_points: usize) -> Vec<f64> {
    if max_points == 0 || values.len() <= max_points {
        return values.to_vec();
    }
    let step = values.len().div_ceil(max_points);
    values.iter().step_by(step).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn tone(freq: f64, fs: f64, n: usize) -> StageWaveform {
        let samples = (0..n)
            .map(|i| (2.0 * PI * freq * i as f64 / fs).cos())
            .collect();
        StageWaveform::new(StageName::Modulator, samples, fs)
    }

    #[test]
    fn test_bin_count_and_axis() {
        for n in [1, 2, 7, 64, 100] {
            let snap = SpectrumAnalyzer.analyze(&tone(10.0, 1000.0, n));
            assert_eq!(snap.num_bins(), n / 2 + 1, "n = {n}");
            assert_eq!(snap.frequencies.len(), snap.magnitudes.len());
            assert_eq!(snap.frequencies[0], 0.0);
            assert!(snap.frequencies.windows(2).all(|w| w[0] < w[1]));
            assert!(snap.frequencies.iter().all(|&f| (0.0..=500.0).contains(&f)));
        }
    }

    #[test]
    fn test_tone_peak() {
        // 1 kHz at 8 kHz over 64 samples lands exactly in bin 8
        let snap = SpectrumAnalyzer.analyze(&tone(1000.0, 8000.0, 64));
        let (freq, mag) = snap.peak().unwrap();
        assert_eq!(freq, 1000.0);
        assert!((mag - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_dc_magnitude() {
        let wf = StageWaveform::new(StageName::Source, vec![1.0; 16], 100.0);
        let snap = SpectrumAnalyzer.analyze(&wf);
        assert!((snap.magnitudes[0] - 1.0).abs() < 1e-12);
        assert!(snap.magnitudes[1..].iter().all(|&m| m < 1e-12));
    }

    #[test]
    fn test_empty_waveform() {
        let wf = StageWaveform::new(StageName::Decoder, Vec::new(), 1e5);
        let snap = SpectrumAnalyzer.analyze(&wf);
        assert!(snap.is_empty());
        assert!(snap.frequencies.is_empty());
        assert!(snap.peak().is_none());
        assert_eq!(snap.stage, StageName::Decoder);
    }

    #[test]
    fn test_decimate() {
        let values: Vec<f64> = (0..10).map(f64::from).collect();
        assert_eq!(decimate(&values, 4), vec![0.0, 3.0, 6.0, 9.0]);
        assert_eq!(decimate(&values, 5), vec![0.0, 2.0, 4.0, 6.0, 8.0]);
        assert_eq!(decimate(&values, 10), values);
        assert_eq!(decimate(&values, 0), values);
        assert!(decimate(&[], 3).is_empty());
    }

    #[test]
    fn test_decimated_snapshot_stays_aligned() {
        let snap = SpectrumAnalyzer.analyze(&tone(10.0, 1000.0, 1000));
        let small = snap.decimated(100);
        assert!(small.num_bins() <= 100);
        assert_eq!(small.frequencies.len(), small.magnitudes.len());
        assert_eq!(small.sample_rate, snap.sample_rate);
    }
}
