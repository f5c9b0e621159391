//! End-to-end DSSS link pipeline
//!
//! [`simulate`] is a pure function of its parameters (plus the noise draw,
//! which is reproducible when a seed is set). It runs every stage in order
//! and keeps each stage's waveform:
//!
//! ```text
//! message ─► encode ─► source ─► spreader ─► modulator ─► channel
//!                                                            │
//! decoded ◄─ decode ◄─ decoder ◄─ decide ◄─ correlator ◄─────┘
//! ```
//!
//! The receiver regenerates its chips from `rx_secret` but with the
//! transmitter's chips-per-symbol, since the spreading factor is a property
//! of the transmitted signal.

use dsss_core::coding::{self, DecodeStats};
use dsss_core::correlator::Correlator;
use dsss_core::modulation::Modulator;
use dsss_core::spreader::{nrz_symbols, Spreader};
use dsss_core::spreading::{chips_per_symbol, ChipSeed, ChipSequenceGenerator};
use dsss_core::stage::{StageName, StageWaveform};
use serde::Serialize;

use crate::channel::{Channel, ChannelConfig};
use crate::error::SimResult;
use crate::params::SimulationParameters;

/// Link-level figures of one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkSummary {
    /// Chips spread over each coded symbol
    pub chips_per_symbol: usize,
    /// Message bits before coding
    pub payload_bits: usize,
    /// Coded symbols sent over the link
    pub coded_symbols: usize,
    /// Processing gain of the spreading in dB
    pub processing_gain_db: f64,
    /// Carrier after sampling, in `[0, fs/2]`
    pub apparent_carrier: f64,
    pub decode_stats: DecodeStats,
}

/// Everything a pipeline run produces
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// One waveform per stage, in pipeline order
    pub stages: Vec<StageWaveform>,
    pub decoded_message: String,
    /// The receiver despread with a different chip sequence
    pub mismatch: bool,
    pub summary: LinkSummary,
}

impl PipelineOutput {
    pub fn stage(&self, stage: StageName) -> &StageWaveform {
        &self.stages[stage.index()]
    }
}

/// Run the full link for one parameter set.
pub fn simulate(params: &SimulationParameters) -> SimResult<PipelineOutput> {
    let modulator = Modulator::new(params.chip_rate, params.carrier_freq, params.oversampling)?;
    let sample_rate = modulator.sample_rate();

    // Transmitter
    let payload_bits = coding::text_to_bits(&params.message);
    let coded = coding::encode_bits(&payload_bits, params.coding_scheme);
    let cps = chips_per_symbol(&params.tx_secret);
    let symbol_rate = params.chip_rate / cps as f64;

    let source = nrz_symbols(&coded);
    let tx_chips = ChipSequenceGenerator::generate(&params.tx_secret, cps, coded.len());
    let spread = Spreader::new(tx_chips).spread(&source);
    let passband = modulator.modulate(&spread);
    tracing::debug!(
        payload_bits = payload_bits.len(),
        coded_symbols = coded.len(),
        chips_per_symbol = cps,
        samples = passband.len(),
        "transmitter stages complete"
    );

    // Channel
    let channel_config = ChannelConfig {
        noise_power: params.noise_power,
        noise_bandwidth: params.noise_bandwidth,
        carrier_freq: params.carrier_freq,
        sample_rate,
    };
    let mut channel = match params.noise_seed {
        Some(seed) => Channel::with_seed(channel_config, seed),
        None => Channel::new(channel_config),
    };
    let received = channel.apply(&passband);
    tracing::debug!(
        noise_power = params.noise_power,
        noise_bandwidth = params.noise_bandwidth,
        band_center = channel.band_center(),
        "channel applied"
    );

    // Receiver
    let rx_chips = ChipSequenceGenerator::generate(&params.rx_secret, cps, coded.len());
    let metrics = Correlator::new(modulator, rx_chips).correlate(&received);
    let decisions = coding::decide(&metrics);
    let (decoded_message, decode_stats) = coding::decode(&decisions, params.coding_scheme);
    let decoder = nrz_symbols(&decisions);

    let mismatch = ChipSeed::from_secret(&params.tx_secret) != ChipSeed::from_secret(&params.rx_secret);
    tracing::debug!(
        symbols = metrics.len(),
        corrected = decode_stats.corrected_errors,
        detected = decode_stats.detected_errors,
        mismatch,
        "receiver stages complete"
    );

    let summary = LinkSummary {
        chips_per_symbol: cps,
        payload_bits: payload_bits.len(),
        coded_symbols: coded.len(),
        processing_gain_db: dsss_core::spreading::processing_gain_db(cps),
        apparent_carrier: modulator.apparent_carrier(),
        decode_stats,
    };

    let stages = vec![
        StageWaveform::new(StageName::Source, source, symbol_rate),
        StageWaveform::new(StageName::Spreader, spread, params.chip_rate),
        StageWaveform::new(StageName::Modulator, passband, sample_rate),
        StageWaveform::new(StageName::Channel, received, sample_rate),
        StageWaveform::new(StageName::Correlator, metrics, symbol_rate),
        StageWaveform::new(StageName::Decoder, decoder, symbol_rate),
    ];

    Ok(PipelineOutput {
        stages,
        decoded_message,
        mismatch,
        summary,
    })
}
