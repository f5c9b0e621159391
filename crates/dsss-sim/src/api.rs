//! Response shapes returned to callers
//!
//! Field names are load-bearing: a front end reads them directly from the
//! JSON.

use dsss_core::spectrum::SpectrumSnapshot;
use dsss_core::stage::{StageName, StageWaveform};
use dsss_core::CodingScheme;
use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Waveform of one stage as sent to callers (`stage`, `samples`,
/// `sample_rate`)
pub type WaveformSnapshot = StageWaveform;

/// Outcome marker carried by responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationStatus {
    Complete,
    Error,
}

/// Result of `run_simulation`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResponse {
    pub simulation_id: String,
    pub decoded_message: String,
    pub status: SimulationStatus,
    pub mismatch: bool,
    pub coding_scheme: CodingScheme,
    pub noise_bandwidth: f64,
    /// Stages retrievable with `get_stage_detail`, in pipeline order
    pub available_stages: Vec<StageName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_spectra: Option<Vec<SpectrumSnapshot>>,
}

/// Result of `get_stage_detail`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageDetailResponse {
    pub stage: StageName,
    pub waveform: WaveformSnapshot,
    pub spectrum: SpectrumSnapshot,
}

/// Failure report for transports that answer in-band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: SimulationStatus,
    pub detail: String,
}

impl From<&SimError> for ErrorResponse {
    fn from(err: &SimError) -> Self {
        Self {
            status: SimulationStatus::Error,
            detail: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_field_names() {
        let response = SimulationResponse {
            simulation_id: "abc".into(),
            decoded_message: "HI".into(),
            status: SimulationStatus::Complete,
            mismatch: false,
            coding_scheme: CodingScheme::Manchester,
            noise_bandwidth: 2e4,
            available_stages: StageName::ALL.to_vec(),
            inline_spectra: None,
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["status"], "complete");
        assert_eq!(value["coding_scheme"], "manchester");
        assert_eq!(value["available_stages"][0], "source");
        assert_eq!(value["available_stages"][5], "decoder");
        // Absent inline spectra are omitted entirely
        assert!(value.get("inline_spectra").is_none());
    }

    #[test]
    fn test_stage_detail_shape() {
        let detail = StageDetailResponse {
            stage: StageName::Channel,
            waveform: StageWaveform::new(StageName::Channel, vec![0.5], 8e5),
            spectrum: SpectrumSnapshot::empty(StageName::Channel, 8e5),
        };
        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["stage"], "channel");
        assert_eq!(value["waveform"]["stage"], "channel");
        assert_eq!(value["waveform"]["samples"][0], 0.5);
        assert_eq!(value["spectrum"]["sample_rate"], 8e5);
        assert!(value["spectrum"]["frequencies"].as_array().unwrap().is_empty());
        assert!(value["spectrum"]["magnitudes"].is_array());
    }

    #[test]
    fn test_error_response() {
        let err = SimError::RunNotFound("deadbeef".into());
        let body = ErrorResponse::from(&err);
        assert_eq!(body.status, SimulationStatus::Error);
        assert!(body.detail.contains("deadbeef"));
    }
}
