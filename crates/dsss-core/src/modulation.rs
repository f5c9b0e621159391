//! Carrier Modulation
//!
//! BPSK upconversion of the chip stream. Each chip is held for
//! `oversampling` samples and multiplied by a cosine carrier:
//!
//! ```text
//! fs   = oversampling × chip_rate
//! s[n] = c[⌊n / oversampling⌋] · cos(2π · f_c · n / fs)
//! ```
//!
//! ## Aliasing
//!
//! Nothing forces `f_c < fs/2`. With the default parameters (1 MHz carrier,
//! 100 kchip/s, 8× oversampling) the sampled carrier sits at 200 kHz. The
//! receiver mixes with the very same sampled cosine, so coherent detection
//! is unaffected; only the spectrum shows the folded frequency.

use crate::fft::bin_abs_frequency;
use crate::types::{DspError, DspResult, Sample};
use std::f64::consts::PI;

/// Fold a frequency into the first Nyquist zone `[0, fs/2]`
pub fn fold_frequency(freq: f64, sample_rate: f64) -> f64 {
    if sample_rate <= 0.0 {
        return freq.abs();
    }
    let wrapped = freq.abs().rem_euclid(sample_rate);
    if wrapped > sample_rate / 2.0 {
        sample_rate - wrapped
    } else {
        wrapped
    }
}

/// Carrier and sampling parameters shared by modulator and correlator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Modulator {
    chip_rate: f64,
    carrier_freq: f64,
    oversampling: usize,
}

impl Modulator {
    /// Create a modulator.
    ///
    /// `chip_rate` and `carrier_freq` must be positive and finite,
    /// `oversampling` at least 2.
    pub fn new(chip_rate: f64, carrier_freq: f64, oversampling: usize) -> DspResult<Self> {
        if !(chip_rate.is_finite() && chip_rate > 0.0) {
            return Err(DspError::invalid(
                "chip_rate",
                format!("must be positive and finite, got {chip_rate}"),
            ));
        }
        if !(carrier_freq.is_finite() && carrier_freq > 0.0) {
            return Err(DspError::invalid(
                "carrier_freq",
                format!("must be positive and finite, got {carrier_freq}"),
            ));
        }
        if oversampling < 2 {
            return Err(DspError::invalid(
                "oversampling",
                format!("must be at least 2, got {oversampling}"),
            ));
        }

        let modulator = Self {
            chip_rate,
            carrier_freq,
            oversampling,
        };
        if modulator.is_aliased() {
            tracing::warn!(
                carrier_freq,
                sample_rate = modulator.sample_rate(),
                apparent_freq = modulator.apparent_carrier(),
                "carrier above Nyquist, sampled carrier aliases"
            );
        }
        Ok(modulator)
    }

    pub fn chip_rate(&self) -> f64 {
        self.chip_rate
    }

    pub fn carrier_freq(&self) -> f64 {
        self.carrier_freq
    }

    pub fn oversampling(&self) -> usize {
        self.oversampling
    }

    /// Passband sample rate (`oversampling × chip_rate`)
    pub fn sample_rate(&self) -> f64 {
        self.oversampling as f64 * self.chip_rate
    }

    /// True when the carrier lies above the Nyquist frequency
    pub fn is_aliased(&self) -> bool {
        self.carrier_freq > self.sample_rate() / 2.0
    }

    /// Carrier frequency as seen after sampling, in `[0, fs/2]`
    pub fn apparent_carrier(&self) -> f64 {
        fold_frequency(self.carrier_freq, self.sample_rate())
    }

    /// Carrier value at sample index `n`
    #[inline]
    pub fn carrier_at(&self, n: usize) -> Sample {
        (2.0 * PI * self.carrier_freq * n as f64 / self.sample_rate()).cos()
    }

    /// First `len` carrier samples
    pub fn carrier(&self, len: usize) -> Vec<Sample> {
        (0..len).map(|n| self.carrier_at(n)).collect()
    }

    /// Hold each chip for `oversampling` samples and apply the carrier
    pub fn modulate(&self, chips: &[Sample]) -> Vec<Sample> {
        chips
            .iter()
            .flat_map(|&chip| std::iter::repeat(chip).take(self.oversampling))
            .enumerate()
            .map(|(n, chip)| chip * self.carrier_at(n))
            .collect()
    }

    /// Index of the FFT bin closest to the apparent carrier in an
    /// `n`-point transform, counted on the non-negative half
    pub fn carrier_bin(&self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        let fs = self.sample_rate();
        let target = self.apparent_carrier();
        (0..=n / 2)
            .min_by(|&a, &b| {
                let da = (bin_abs_frequency(a, n, fs) - target).abs();
                let db = (bin_abs_frequency(b, n, fs) - target).abs();
                da.total_cmp(&db)
            })
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(Modulator::new(0.0, 1e6, 8).is_err());
        assert!(Modulator::new(1e5, -1.0, 8).is_err());
        assert!(Modulator::new(1e5, f64::NAN, 8).is_err());
        assert!(matches!(
            Modulator::new(1e5, 1e6, 1),
            Err(DspError::InvalidArgument { name: "oversampling", .. })
        ));
    }

    #[test]
    fn test_sample_rate_and_length() {
        let m = Modulator::new(1e5, 1e5, 8).unwrap();
        assert_eq!(m.sample_rate(), 8e5);
        let out = m.modulate(&[1.0, -1.0, 1.0]);
        assert_eq!(out.len(), 24);
        // First sample of every record is the chip value times cos(0)
        assert_eq!(out[0], 1.0);
    }

    #[test]
    fn test_chip_held_under_carrier() {
        let m = Modulator::new(1e3, 1e3, 4).unwrap();
        let out = m.modulate(&[-1.0, 1.0]);
        for n in 0..4 {
            assert!((out[n] + m.carrier_at(n)).abs() < 1e-12);
            assert!((out[n + 4] - m.carrier_at(n + 4)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_fold_frequency() {
        assert_eq!(fold_frequency(1e6, 8e5), 2e5);
        assert_eq!(fold_frequency(1e5, 8e5), 1e5);
        assert_eq!(fold_frequency(7e5, 8e5), 1e5);
        assert_eq!(fold_frequency(8e5, 8e5), 0.0);
    }

    #[test]
    fn test_aliasing_flag() {
        assert!(Modulator::new(1e5, 1e6, 8).unwrap().is_aliased());
        assert!(!Modulator::new(1e5, 2e5, 8).unwrap().is_aliased());
        assert_eq!(Modulator::new(1e5, 1e6, 8).unwrap().apparent_carrier(), 2e5);
    }

    #[test]
    fn test_carrier_bin() {
        // fs = 800 kHz, 800 points -> 1 kHz bins, carrier folds to 200 kHz
        let m = Modulator::new(1e5, 1e6, 8).unwrap();
        assert_eq!(m.carrier_bin(800), 200);
        assert_eq!(m.carrier_bin(0), 0);
    }
}
