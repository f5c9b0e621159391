//! # DSSS Link Simulation
//!
//! Orchestrates the `dsss-core` blocks into a complete link, adds the
//! band-limited noise channel, and keeps finished runs so their stages can
//! be inspected afterwards.
//!
//! ```rust
//! use dsss_sim::{SimulationEngine, SimulationRequest};
//! use dsss_core::StageName;
//!
//! let engine = SimulationEngine::default();
//! let response = engine
//!     .run_simulation(&SimulationRequest::new("HI", "TEST", "TEST"))
//!     .unwrap();
//! assert_eq!(response.decoded_message, "HI");
//!
//! let detail = engine
//!     .get_stage_detail(&response.simulation_id, StageName::Spreader)
//!     .unwrap();
//! assert_eq!(detail.waveform.samples.len(), 16 * 16);
//! ```

pub mod api;
pub mod channel;
pub mod engine;
pub mod error;
pub mod params;
pub mod pipeline;
pub mod store;

pub use api::{ErrorResponse, SimulationResponse, SimulationStatus, StageDetailResponse, WaveformSnapshot};
pub use channel::{Channel, ChannelConfig};
pub use engine::SimulationEngine;
pub use error::{SimError, SimResult};
pub use params::{SimulationParameters, SimulationRequest};
pub use pipeline::{simulate, LinkSummary, PipelineOutput};
pub use store::{RunId, SimulationRun, SimulationStore};
