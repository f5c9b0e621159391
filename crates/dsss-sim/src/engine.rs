//! Simulation engine
//!
//! The two operations a front end needs:
//!
//! - [`SimulationEngine::run_simulation`] validates a request, runs the
//!   pipeline, stores the run and answers with the decoded message plus
//!   spectra for the configured inline stages.
//! - [`SimulationEngine::get_stage_detail`] looks a stored run up and
//!   returns one stage's waveform with its (memoized) spectrum.
//!
//! The engine is `Send + Sync`; share it behind an `Arc` and call it from
//! any number of threads. Pipeline runs execute outside the store lock.

use dsss_core::config::EngineConfig;
use dsss_core::spectrum::decimate;
use dsss_core::stage::{StageName, StageWaveform};
use std::sync::Arc;
use std::time::Instant;

use crate::api::{SimulationResponse, SimulationStatus, StageDetailResponse};
use crate::error::{SimError, SimResult};
use crate::params::SimulationRequest;
use crate::pipeline::simulate;
use crate::store::{SimulationRun, SimulationStore};

/// Entry point for running and inspecting simulations
#[derive(Debug)]
pub struct SimulationEngine {
    config: EngineConfig,
    store: SimulationStore,
}

impl SimulationEngine {
    pub fn new(config: EngineConfig) -> Self {
        let store = SimulationStore::new(config.store_capacity, config.store_ttl());
        Self { config, store }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &SimulationStore {
        &self.store
    }

    /// Validate, simulate and store one run.
    pub fn run_simulation(&self, request: &SimulationRequest) -> SimResult<SimulationResponse> {
        let params = request
            .validate(self.config.min_secret_len)?
            .with_default_seed(self.config.noise_seed);

        let started = Instant::now();
        let output = simulate(&params)?;
        let coding_scheme = params.coding_scheme;
        let noise_bandwidth = params.noise_bandwidth;

        let (id, run) = self.store.insert(SimulationRun::new(params, output));

        let inline: Vec<_> = self
            .config
            .inline_stages
            .iter()
            .filter_map(|&stage| run.spectrum(stage))
            .map(|spectrum| spectrum.decimated(self.config.max_points))
            .collect();

        tracing::info!(
            simulation_id = %id,
            coding_scheme = %coding_scheme,
            mismatch = run.mismatch(),
            chips_per_symbol = run.summary().chips_per_symbol,
            elapsed_ms = started.elapsed().as_secs_f64() * 1e3,
            "simulation complete"
        );

        Ok(SimulationResponse {
            simulation_id: id.to_string(),
            decoded_message: run.decoded_message().to_string(),
            status: SimulationStatus::Complete,
            mismatch: run.mismatch(),
            coding_scheme,
            noise_bandwidth,
            available_stages: run.available_stages(),
            inline_spectra: (!inline.is_empty()).then_some(inline),
        })
    }

    /// Waveform and spectrum of one stage of a stored run.
    pub fn get_stage_detail(
        &self,
        simulation_id: &str,
        stage: StageName,
    ) -> SimResult<StageDetailResponse> {
        let run = self.lookup(simulation_id)?;
        let waveform = run
            .stage(stage)
            .ok_or_else(|| SimError::UnknownStage(stage.to_string()))?;
        let spectrum = run
            .spectrum(stage)
            .ok_or_else(|| SimError::UnknownStage(stage.to_string()))?;

        let max_points = self.config.max_points;
        Ok(StageDetailResponse {
            stage,
            waveform: StageWaveform::new(
                stage,
                decimate(&waveform.samples, max_points),
                waveform.sample_rate,
            ),
            spectrum: spectrum.decimated(max_points),
        })
    }

    /// [`get_stage_detail`](Self::get_stage_detail) with the stage given by
    /// name
    pub fn get_stage_detail_by_name(
        &self,
        simulation_id: &str,
        stage: &str,
    ) -> SimResult<StageDetailResponse> {
        let stage: StageName = stage.parse()?;
        self.get_stage_detail(simulation_id, stage)
    }

    /// Shared handle to a stored run (full-resolution waveforms)
    pub fn lookup(&self, simulation_id: &str) -> SimResult<Arc<SimulationRun>> {
        self.store
            .get(simulation_id)
            .ok_or_else(|| SimError::RunNotFound(simulation_id.to_string()))
    }
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
