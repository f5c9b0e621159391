//! Spreading Codes for the DSSS Link
//!
//! The chip sequence is derived from a secret phrase rather than taken from
//! a fixed code family. Transmitter and receiver each regenerate it from
//! their own secret; when the secrets differ the two sequences are
//! statistically independent, so the correlator output collapses toward
//! zero and the decisions become coin flips.
//!
//! ## Properties
//!
//! ```text
//! ┌──────────────────────┬──────────────────────────────────────────┐
//! │ Seed                 │ SHA-256(secret UTF-8 bytes), 32 bytes    │
//! │ Generator            │ ChaCha12, one fair coin per chip         │
//! │ Chips per symbol     │ max(8, 4 × characters in secret)         │
//! │ Processing gain (dB) │ 10 · log10(chips per symbol)             │
//! └──────────────────────┴──────────────────────────────────────────┘
//! ```
//!
//! The secret only seeds a pseudo-random generator. It is not a key and the
//! sequence provides no confidentiality.

pub mod secret;

pub use secret::{chips_per_symbol, ChipSeed, ChipSequence, ChipSequenceGenerator};

/// Minimum number of chips spread over one symbol
pub const MIN_CHIPS_PER_SYMBOL: usize = 8;

/// Chips added per character of the secret
pub const CHIPS_PER_SECRET_CHAR: usize = 4;

/// Correlation of two chip slices at zero lag
pub fn correlation(seq_a: &[i8], seq_b: &[i8]) -> i64 {
    seq_a
        .iter()
        .zip(seq_b.iter())
        .map(|(&a, &b)| a as i64 * b as i64)
        .sum()
}

/// Zero-lag correlation normalized by length, in `[-1, 1]`.
///
/// Returns 0 for empty input.
pub fn normalized_correlation(seq_a: &[i8], seq_b: &[i8]) -> f64 {
    let n = seq_a.len().min(seq_b.len());
    if n == 0 {
        return 0.0;
    }
    correlation(&seq_a[..n], &seq_b[..n]) as f64 / n as f64
}

/// Processing gain in dB for a given number of chips per symbol
pub fn processing_gain_db(chips_per_symbol: usize) -> f64 {
    if chips_per_symbol == 0 {
        return 0.0;
    }
    10.0 * (chips_per_symbol as f64).log10()
}
