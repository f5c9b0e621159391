//! Band-Limited AWGN Channel
//!
//! The only impairment modelled is Gaussian noise confined to a band around
//! the carrier, which lets the spectrum views show an interferer sitting on
//! top of the spread signal.
//!
//! ## Noise Shaping
//!
//! ```text
//! w[n] ~ N(0, 1)                      white noise, one draw per sample
//! W[k] = FFT(w)
//! W[k] = 0  unless | |f_k| − f_c' | ≤ B/2
//! v[n] = Re(IFFT(W))
//! y[n] = x[n] + v[n] · sqrt(P) / std(v)
//! ```
//!
//! `f_c'` is the carrier folded into `[0, fs/2]`, so the band follows the
//! carrier as it appears in the sampled passband. Masking by absolute
//! frequency keeps the spectrum Hermitian and the shaped noise real. When
//! the band is narrower than one FFT bin, the bin closest to the carrier
//! (with its mirror) is kept.
//!
//! The rescale makes the sample variance of the added noise exactly `P`.

use dsss_core::fft::{bin_abs_frequency, FftProcessor};
use dsss_core::modulation::fold_frequency;
use dsss_core::types::{Complex, Sample};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

/// Below this standard deviation the shaped noise is treated as absent
const MIN_NOISE_STD: f64 = 1e-12;

/// Channel configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Noise variance added to the signal
    pub noise_power: f64,
    /// Width of the noise band in Hz
    pub noise_bandwidth: f64,
    /// Band center before folding (the link's carrier) in Hz
    pub carrier_freq: f64,
    /// Sample rate of the passband signal in Hz
    pub sample_rate: f64,
}

/// Band-limited Gaussian noise channel
#[derive(Debug)]
pub struct Channel {
    config: ChannelConfig,
    rng: StdRng,
}

impl Channel {
    /// Channel drawing noise from OS entropy
    pub fn new(config: ChannelConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Channel with a reproducible noise stream
    pub fn with_seed(config: ChannelConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// Band center as it appears after sampling
    pub fn band_center(&self) -> f64 {
        fold_frequency(self.config.carrier_freq, self.config.sample_rate)
    }

    /// Pass a signal through the channel.
    ///
    /// With `noise_power == 0` (or an empty signal) the output is an exact
    /// copy of the input.
    pub fn apply(&mut self, signal: &[Sample]) -> Vec<Sample> {
        if self.config.noise_power <= 0.0 || signal.is_empty() {
            return signal.to_vec();
        }

        let noise = self.band_limited_noise(signal.len());
        let std = std_dev(&noise);
        if std < MIN_NOISE_STD {
            tracing::debug!(std, "shaped noise vanished, passing signal through");
            return signal.to_vec();
        }

        let scale = self.config.noise_power.sqrt() / std;
        signal
            .iter()
            .zip(&noise)
            .map(|(&x, &v)| x + v * scale)
            .collect()
    }

    /// Unit-variance white noise of length `n` filtered to the channel band
    /// (not yet rescaled)
    fn band_limited_noise(&mut self, n: usize) -> Vec<Sample> {
        let mut buffer: Vec<Complex> = (0..n)
            .map(|_| Complex::new(StandardNormal.sample(&mut self.rng), 0.0))
            .collect();

        let mut fft = FftProcessor::new(n);
        fft.fft_inplace(&mut buffer);

        let mask = self.band_mask(n);
        for (bin, keep) in buffer.iter_mut().zip(&mask) {
            if !keep {
                *bin = Complex::new(0.0, 0.0);
            }
        }

        fft.ifft_inplace(&mut buffer);
        buffer.iter().map(|c| c.re).collect()
    }

    /// Which of the `n` FFT bins fall inside the noise band
    fn band_mask(&self, n: usize) -> Vec<bool> {
        let fs = self.config.sample_rate;
        let center = self.band_center();
        let half_bw = self.config.noise_bandwidth / 2.0;
        let distance = |k: usize| (bin_abs_frequency(k, n, fs) - center).abs();

        let mut mask: Vec<bool> = (0..n).map(|k| distance(k) <= half_bw).collect();
        if !mask.iter().any(|&m| m) {
            let nearest = (0..=n / 2)
                .min_by(|&a, &b| distance(a).total_cmp(&distance(b)))
                .unwrap_or(0);
            mask[nearest] = true;
            mask[(n - nearest) % n] = true;
        }
        mask
    }
}

/// Population standard deviation (0 for empty input)
fn std_dev(values: &[Sample]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt()
}
