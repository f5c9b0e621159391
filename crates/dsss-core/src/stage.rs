//! Pipeline Stages
//!
//! Every run retains the waveform produced at each of six stages, in a
//! fixed order:
//!
//! ```text
//! source ─► spreader ─► modulator ─► channel ─► correlator ─► decoder
//!  (TX symbols)          (passband)              (per-symbol metric)
//! ```
//!
//! | Stage      | Samples                          | Sample rate            |
//! |------------|----------------------------------|------------------------|
//! | source     | ±1 per coded symbol              | chip_rate / cps        |
//! | spreader   | ±1 per chip                      | chip_rate              |
//! | modulator  | chip × carrier, `os` per chip    | os × chip_rate         |
//! | channel    | modulator + band-limited noise   | os × chip_rate         |
//! | correlator | despread metric per symbol       | chip_rate / cps        |
//! | decoder    | ±1 hard decision per symbol      | chip_rate / cps        |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::{DspError, Sample};

/// One of the six pipeline stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageName {
    Source,
    Spreader,
    Modulator,
    Channel,
    Correlator,
    Decoder,
}

impl StageName {
    /// All stages in pipeline order
    pub const ALL: [StageName; 6] = [
        StageName::Source,
        StageName::Spreader,
        StageName::Modulator,
        StageName::Channel,
        StageName::Correlator,
        StageName::Decoder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StageName::Source => "source",
            StageName::Spreader => "spreader",
            StageName::Modulator => "modulator",
            StageName::Channel => "channel",
            StageName::Correlator => "correlator",
            StageName::Decoder => "decoder",
        }
    }

    /// Position in the pipeline (0 for `source`)
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StageName {
    type Err = DspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StageName::ALL
            .into_iter()
            .find(|stage| stage.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DspError::UnknownStage(s.to_string()))
    }
}

/// Samples captured at one stage together with their sample rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageWaveform {
    pub stage: StageName,
    pub samples: Vec<Sample>,
    /// Sample rate in Hz
    pub sample_rate: f64,
}

impl StageWaveform {
    pub fn new(stage: StageName, samples: Vec<Sample>, sample_rate: f64) -> Self {
        Self {
            stage,
            samples,
            sample_rate,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration covered by the samples in seconds
    pub fn duration(&self) -> f64 {
        if self.sample_rate > 0.0 {
            self.samples.len() as f64 / self.sample_rate
        } else {
            0.0
        }
    }

    /// Mean power of the samples (0 for an empty waveform)
    pub fn mean_power(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().map(|s| s * s).sum::<f64>() / self.samples.len() as f64
    }
}
