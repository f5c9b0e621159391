//! # DSSS Core DSP Library
//!
//! Building blocks for simulating a Direct-Sequence Spread-Spectrum link:
//! line coding and error correction, secret-derived chip sequences,
//! spreading, BPSK carrier modulation, coherent correlation and spectrum
//! analysis. Channel impairments and run orchestration live in `dsss-sim`.
//!
//! ## Signal Flow
//!
//! ```text
//! TX: text → coding → NRZ symbols → spread (tx chips) → carrier → passband
//! RX: passband → mix down → chip integrate → despread (rx chips) → decide → decode → text
//! ```
//!
//! ## Example
//!
//! ```rust
//! use dsss_core::coding::{self, CodingScheme};
//! use dsss_core::correlator::Correlator;
//! use dsss_core::modulation::Modulator;
//! use dsss_core::spreader::{nrz_symbols, Spreader};
//! use dsss_core::spreading::{chips_per_symbol, ChipSequenceGenerator};
//!
//! let coded = coding::encode("HI", CodingScheme::Hamming74);
//! let cps = chips_per_symbol("TEST");
//! let chips = ChipSequenceGenerator::generate("TEST", cps, coded.len());
//!
//! let modulator = Modulator::new(1e5, 1e6, 8).unwrap();
//! let tx = modulator.modulate(&Spreader::new(chips.clone()).spread(&nrz_symbols(&coded)));
//!
//! let metrics = Correlator::new(modulator, chips).correlate(&tx);
//! let (text, _stats) = coding::decode(&coding::decide(&metrics), CodingScheme::Hamming74);
//! assert_eq!(text, "HI");
//! ```

pub mod coding;
pub mod config;
pub mod correlator;
pub mod fft;
pub mod modulation;
pub mod observe;
pub mod spectrum;
pub mod spreader;
pub mod spreading;
pub mod stage;
pub mod types;

pub use coding::{CodingScheme, DecodeStats};
pub use config::{ConfigError, DsssConfig, EngineConfig};
pub use correlator::Correlator;
pub use modulation::Modulator;
pub use spectrum::{SpectrumAnalyzer, SpectrumSnapshot};
pub use spreader::Spreader;
pub use spreading::{ChipSeed, ChipSequence, ChipSequenceGenerator};
pub use stage::{StageName, StageWaveform};
pub use types::{Bit, BitStream, Complex, DspError, DspResult, Sample};
