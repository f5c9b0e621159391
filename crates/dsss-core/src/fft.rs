//! FFT helpers shared by the spectrum analyzer and the channel's noise
//! shaping.
//!
//! ```text
//! real samples ──► complex buffer ──► forward FFT ──► X[k], k = 0..N-1
//!
//!   bin k ↔ frequency k·fs/N          (k ≤ N/2)
//!   bin k ↔ frequency (k-N)·fs/N      (k > N/2, negative half)
//! ```
//!
//! A processor is planned for one size and reused; plans are cheap to
//! share but scratch space is per instance.

use rustfft::{Fft, FftPlanner};
use std::fmt;
use std::sync::Arc;

use crate::types::{Complex, Sample};

/// Planned forward/inverse FFT of a fixed size
pub struct FftProcessor {
    size: usize,
    fft_forward: Arc<dyn Fft<f64>>,
    fft_inverse: Arc<dyn Fft<f64>>,
    scratch: Vec<Complex>,
}

impl fmt::Debug for FftProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FftProcessor")
            .field("size", &self.size)
            .finish()
    }
}

impl FftProcessor {
    /// Plan transforms of length `size`
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft_forward = planner.plan_fft_forward(size);
        let fft_inverse = planner.plan_fft_inverse(size);
        let scratch_len = fft_forward
            .get_inplace_scratch_len()
            .max(fft_inverse.get_inplace_scratch_len());

        Self {
            size,
            fft_forward,
            fft_inverse,
            scratch: vec![Complex::new(0.0, 0.0); scratch_len],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Forward FFT in place (unnormalized)
    ///
    /// `buffer.len()` must equal `size()`.
    pub fn fft_inplace(&mut self, buffer: &mut [Complex]) {
        debug_assert_eq!(buffer.len(), self.size);
        if self.size == 0 {
            return;
        }
        self.fft_forward.process_with_scratch(buffer, &mut self.scratch);
    }

    /// Inverse FFT in place, normalized by 1/N so that
    /// `ifft(fft(x)) == x`
    pub fn ifft_inplace(&mut self, buffer: &mut [Complex]) {
        debug_assert_eq!(buffer.len(), self.size);
        if self.size == 0 {
            return;
        }
        self.fft_inverse.process_with_scratch(buffer, &mut self.scratch);

        let scale = 1.0 / self.size as f64;
        for sample in buffer.iter_mut() {
            *sample *= scale;
        }
    }

    /// Forward FFT of a real signal, zero-padded or truncated to `size()`
    pub fn fft_real(&mut self, input: &[Sample]) -> Vec<Complex> {
        let mut buffer: Vec<Complex> = input
            .iter()
            .take(self.size)
            .map(|&x| Complex::new(x, 0.0))
            .collect();
        buffer.resize(self.size, Complex::new(0.0, 0.0));
        self.fft_inplace(&mut buffer);
        buffer
    }
}

/// Frequency of bin `k` in an `n`-point FFT at sample rate `fs`, on the
/// non-negative half (`k ≤ n/2`)
#[inline]
pub fn bin_frequency(k: usize, n: usize, fs: f64) -> f64 {
    k as f64 * fs / n as f64
}

/// Absolute frequency represented by bin `k`, folding the negative half
/// of the spectrum onto `[0, fs/2]`
#[inline]
pub fn bin_abs_frequency(k: usize, n: usize, fs: f64) -> f64 {
    let folded = if k > n / 2 { n - k } else { k };
    bin_frequency(folded, n, fs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_fft_ifft_roundtrip() {
        let mut proc = FftProcessor::new(16);
        let input: Vec<Sample> = (0..16).map(|i| (i as f64 * 0.3).sin()).collect();
        let mut spectrum = proc.fft_real(&input);
        proc.ifft_inplace(&mut spectrum);
        for (a, b) in input.iter().zip(&spectrum) {
            assert!((a - b.re).abs() < 1e-10);
            assert!(b.im.abs() < 1e-10);
        }
    }

    #[test]
    fn test_tone_lands_in_expected_bin() {
        // 4 cycles over 64 samples -> bin 4 and its mirror bin 60
        let n = 64;
        let mut proc = FftProcessor::new(n);
        let input: Vec<Sample> = (0..n)
            .map(|i| (2.0 * PI * 4.0 * i as f64 / n as f64).cos())
            .collect();
        let spectrum = proc.fft_real(&input);
        assert!((spectrum[4].norm() - 32.0).abs() < 1e-9);
        assert!((spectrum[60].norm() - 32.0).abs() < 1e-9);
        assert!(spectrum[5].norm() < 1e-9);
    }

    #[test]
    fn test_bin_frequencies() {
        assert_eq!(bin_frequency(4, 64, 6400.0), 400.0);
        assert_eq!(bin_abs_frequency(60, 64, 6400.0), 400.0);
        assert_eq!(bin_abs_frequency(32, 64, 6400.0), 3200.0);
    }
}
