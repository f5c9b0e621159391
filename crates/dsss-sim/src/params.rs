//! Simulation requests and validated parameters
//!
//! A [`SimulationRequest`] is what a caller sends (JSON field names are part
//! of the contract). It becomes a [`SimulationParameters`] snapshot only
//! after [`SimulationRequest::validate`] accepts it; the pipeline never sees
//! unchecked input.

use dsss_core::CodingScheme;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Longest accepted message, in characters
pub const MAX_MESSAGE_CHARS: usize = 256;
/// Longest accepted secret, in characters
pub const MAX_SECRET_CHARS: usize = 64;
/// Largest accepted noise variance
pub const MAX_NOISE_POWER: f64 = 100.0;
/// Largest accepted oversampling factor
pub const MAX_OVERSAMPLING: usize = 64;

fn default_chip_rate() -> f64 {
    1e5
}

fn default_carrier_freq() -> f64 {
    1e6
}

fn default_noise_bandwidth() -> f64 {
    5e3
}

fn default_oversampling() -> usize {
    8
}

/// A simulation request as received from a caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub message: String,
    pub tx_secret: String,
    pub rx_secret: String,
    /// Chips per second
    #[serde(default = "default_chip_rate")]
    pub chip_rate: f64,
    /// Carrier frequency in Hz
    #[serde(default = "default_carrier_freq")]
    pub carrier_freq: f64,
    /// Variance of the added noise
    #[serde(default)]
    pub noise_power: f64,
    /// Width of the noise band in Hz
    #[serde(default = "default_noise_bandwidth")]
    pub noise_bandwidth: f64,
    /// Samples per chip
    #[serde(default = "default_oversampling")]
    pub oversampling: usize,
    #[serde(default)]
    pub coding_scheme: CodingScheme,
    /// Seed for the channel noise; omitted means a fresh draw per run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise_seed: Option<u64>,
}

impl SimulationRequest {
    /// Request with default link parameters
    pub fn new(
        message: impl Into<String>,
        tx_secret: impl Into<String>,
        rx_secret: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            tx_secret: tx_secret.into(),
            rx_secret: rx_secret.into(),
            chip_rate: default_chip_rate(),
            carrier_freq: default_carrier_freq(),
            noise_power: 0.0,
            noise_bandwidth: default_noise_bandwidth(),
            oversampling: default_oversampling(),
            coding_scheme: CodingScheme::default(),
            noise_seed: None,
        }
    }

    pub fn with_coding(mut self, scheme: CodingScheme) -> Self {
        self.coding_scheme = scheme;
        self
    }

    pub fn with_noise(mut self, noise_power: f64, noise_bandwidth: f64) -> Self {
        self.noise_power = noise_power;
        self.noise_bandwidth = noise_bandwidth;
        self
    }

    pub fn with_link(mut self, chip_rate: f64, carrier_freq: f64, oversampling: usize) -> Self {
        self.chip_rate = chip_rate;
        self.carrier_freq = carrier_freq;
        self.oversampling = oversampling;
        self
    }

    pub fn with_noise_seed(mut self, seed: u64) -> Self {
        self.noise_seed = Some(seed);
        self
    }

    /// Check every field and produce the immutable parameter snapshot.
    ///
    /// The first offending field is reported.
    pub fn validate(&self, min_secret_len: usize) -> SimResult<SimulationParameters> {
        let message_chars = self.message.chars().count();
        if message_chars > MAX_MESSAGE_CHARS {
            return Err(SimError::invalid(
                "message",
                format!("at most {MAX_MESSAGE_CHARS} characters, got {message_chars}"),
            ));
        }
        check_secret("tx_secret", &self.tx_secret, min_secret_len)?;
        check_secret("rx_secret", &self.rx_secret, min_secret_len)?;
        check_positive("chip_rate", self.chip_rate)?;
        check_positive("carrier_freq", self.carrier_freq)?;
        if !self.noise_power.is_finite() || self.noise_power < 0.0 {
            return Err(SimError::invalid(
                "noise_power",
                format!("must be finite and >= 0, got {}", self.noise_power),
            ));
        }
        if self.noise_power > MAX_NOISE_POWER {
            return Err(SimError::invalid(
                "noise_power",
                format!("must be <= {MAX_NOISE_POWER}, got {}", self.noise_power),
            ));
        }
        check_positive("noise_bandwidth", self.noise_bandwidth)?;
        if !(2..=MAX_OVERSAMPLING).contains(&self.oversampling) {
            return Err(SimError::invalid(
                "oversampling",
                format!("must be in 2..={MAX_OVERSAMPLING}, got {}", self.oversampling),
            ));
        }

        Ok(SimulationParameters {
            message: self.message.clone(),
            tx_secret: self.tx_secret.clone(),
            rx_secret: self.rx_secret.clone(),
            chip_rate: self.chip_rate,
            carrier_freq: self.carrier_freq,
            noise_power: self.noise_power,
            noise_bandwidth: self.noise_bandwidth,
            oversampling: self.oversampling,
            coding_scheme: self.coding_scheme,
            noise_seed: self.noise_seed,
        })
    }
}

fn check_positive(field: &'static str, value: f64) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::invalid(
            field,
            format!("must be positive and finite, got {value}"),
        ))
    }
}

fn check_secret(field: &'static str, secret: &str, min_len: usize) -> SimResult<()> {
    let chars = secret.chars().count();
    if chars < min_len {
        return Err(SimError::invalid(
            field,
            format!("at least {min_len} characters, got {chars}"),
        ));
    }
    if chars > MAX_SECRET_CHARS {
        return Err(SimError::invalid(
            field,
            format!("at most {MAX_SECRET_CHARS} characters, got {chars}"),
        ));
    }
    Ok(())
}

/// Validated, immutable inputs of one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationParameters {
    pub message: String,
    pub tx_secret: String,
    pub rx_secret: String,
    pub chip_rate: f64,
    pub carrier_freq: f64,
    pub noise_power: f64,
    pub noise_bandwidth: f64,
    pub oversampling: usize,
    pub coding_scheme: CodingScheme,
    pub noise_seed: Option<u64>,
}

impl SimulationParameters {
    /// Passband sample rate (`oversampling × chip_rate`)
    pub fn sample_rate(&self) -> f64 {
        self.oversampling as f64 * self.chip_rate
    }

    /// Same parameters with a noise seed filled in, unless one is set
    pub fn with_default_seed(mut self, seed: Option<u64>) -> Self {
        if self.noise_seed.is_none() {
            self.noise_seed = seed;
        }
        self
    }
}
