//! Run store
//!
//! Every completed simulation is kept under a random id so that stage
//! details can be fetched later. Runs are immutable and shared as
//! `Arc<SimulationRun>`; the only interior mutability is the per-stage
//! spectrum, computed on first request and then reused.
//!
//! The store is bounded: past `capacity` runs the oldest insertion is
//! evicted, and with a TTL configured, runs older than the TTL stop being
//! served and are purged on the next insert.

use dsss_core::spectrum::{SpectrumAnalyzer, SpectrumSnapshot};
use dsss_core::stage::{StageName, StageWaveform};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use crate::params::SimulationParameters;
use crate::pipeline::{LinkSummary, PipelineOutput};

/// Opaque run identifier: 128 random bits as 32 lowercase hex characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    fn random() -> Self {
        Self(format!("{:032x}", rand::random::<u128>()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RunId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A completed simulation: its inputs, every stage waveform and the
/// decoded result
#[derive(Debug)]
pub struct SimulationRun {
    params: SimulationParameters,
    stages: Vec<StageWaveform>,
    spectra: [OnceLock<SpectrumSnapshot>; 6],
    decoded_message: String,
    mismatch: bool,
    summary: LinkSummary,
}

impl SimulationRun {
    pub fn new(params: SimulationParameters, output: PipelineOutput) -> Self {
        Self {
            params,
            stages: output.stages,
            spectra: Default::default(),
            decoded_message: output.decoded_message,
            mismatch: output.mismatch,
            summary: output.summary,
        }
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    pub fn decoded_message(&self) -> &str {
        &self.decoded_message
    }

    pub fn mismatch(&self) -> bool {
        self.mismatch
    }

    pub fn summary(&self) -> &LinkSummary {
        &self.summary
    }

    /// Stages held by this run, in pipeline order
    pub fn available_stages(&self) -> Vec<StageName> {
        self.stages.iter().map(|s| s.stage).collect()
    }

    pub fn stage(&self, stage: StageName) -> Option<&StageWaveform> {
        self.stages.iter().find(|s| s.stage == stage)
    }

    /// Spectrum of a stage, computed on first use. Concurrent callers
    /// block on the same computation rather than repeating it.
    pub fn spectrum(&self, stage: StageName) -> Option<&SpectrumSnapshot> {
        let waveform = self.stage(stage)?;
        Some(self.spectra[stage.index()].get_or_init(|| {
            tracing::debug!(%stage, samples = waveform.len(), "computing spectrum");
            SpectrumAnalyzer.analyze(waveform)
        }))
    }

    /// Whether a stage's spectrum has been computed already
    pub fn has_spectrum(&self, stage: StageName) -> bool {
        self.spectra[stage.index()].get().is_some()
    }
}

struct StoredRun {
    run: Arc<SimulationRun>,
    inserted: Instant,
}

#[derive(Default)]
struct StoreInner {
    runs: HashMap<RunId, StoredRun>,
    /// Insertion order, oldest first
    order: VecDeque<RunId>,
}

/// Thread-safe run cache with FIFO eviction and optional TTL
pub struct SimulationStore {
    inner: RwLock<StoreInner>,
    capacity: usize,
    ttl: Option<Duration>,
}

impl SimulationStore {
    /// Store keeping at most `capacity` runs (at least one)
    pub fn new(capacity: usize, ttl: Option<Duration>) -> Self {
        Self {
            inner: RwLock::new(StoreInner::default()),
            capacity: capacity.max(1),
            ttl,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Insert a run under a fresh id and return the id.
    pub fn create(&self, run: SimulationRun) -> RunId {
        self.insert(run).0
    }

    /// Insert a run, returning its id and the shared handle
    pub fn insert(&self, run: SimulationRun) -> (RunId, Arc<SimulationRun>) {
        let run = Arc::new(run);
        let mut inner = self.inner.write();

        let mut id = RunId::random();
        while inner.runs.contains_key(&id) {
            id = RunId::random();
        }

        self.purge_expired(&mut inner);
        while inner.runs.len() >= self.capacity {
            match inner.order.pop_front() {
                Some(oldest) => {
                    inner.runs.remove(&oldest);
                    tracing::debug!(run_id = %oldest, "evicted oldest run");
                }
                None => break,
            }
        }

        inner.order.push_back(id.clone());
        inner.runs.insert(
            id.clone(),
            StoredRun {
                run: Arc::clone(&run),
                inserted: Instant::now(),
            },
        );
        (id, run)
    }

    /// Look up a run. Expired runs are reported as absent.
    pub fn get(&self, id: &str) -> Option<Arc<SimulationRun>> {
        let inner = self.inner.read();
        let stored = inner.runs.get(&RunId::from(id))?;
        if self.is_expired(stored) {
            return None;
        }
        Some(Arc::clone(&stored.run))
    }

    /// Number of runs held, expired ones included until purged
    pub fn len(&self) -> usize {
        self.inner.read().runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().runs.is_empty()
    }

    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.runs.clear();
        inner.order.clear();
    }

    fn is_expired(&self, stored: &StoredRun) -> bool {
        self.ttl
            .is_some_and(|ttl| stored.inserted.elapsed() >= ttl)
    }

    fn purge_expired(&self, inner: &mut StoreInner) {
        if self.ttl.is_none() {
            return;
        }
        // Insertion order is also age order: stop at the first live run
        while let Some(oldest) = inner.order.front() {
            let expired = inner
                .runs
                .get(oldest)
                .map_or(true, |stored| self.is_expired(stored));
            if !expired {
                break;
            }
            if let Some(id) = inner.order.pop_front() {
                inner.runs.remove(&id);
                tracing::debug!(run_id = %id, "purged expired run");
            }
        }
    }
}

impl Default for SimulationStore {
    fn default() -> Self {
        Self::new(16, None)
    }
}

impl fmt::Debug for SimulationStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationStore")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::SimulationRequest;
    use crate::pipeline::simulate;

    fn make_run(message: &str) -> SimulationRun {
        let params = SimulationRequest::new(message, "TEST", "TEST").validate(4).unwrap();
        let output = simulate(&params).unwrap();
        SimulationRun::new(params, output)
    }

    #[test]
    fn test_create_and_get() {
        let store = SimulationStore::default();
        let id = store.create(make_run("a"));
        assert_eq!(id.as_str().len(), 32);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

        let run = store.get(id.as_str()).unwrap();
        assert_eq!(run.decoded_message(), "a");
        assert!(store.get("0000").is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        let store = SimulationStore::new(64, None);
        let ids: std::collections::HashSet<RunId> =
            (0..32).map(|_| store.create(make_run("x"))).collect();
        assert_eq!(ids.len(), 32);
    }

    #[test]
    fn test_fifo_eviction() {
        let store = SimulationStore::new(2, None);
        let first = store.create(make_run("1"));
        let second = store.create(make_run("2"));
        let third = store.create(make_run("3"));

        assert_eq!(store.len(), 2);
        assert!(store.get(first.as_str()).is_none());
        assert!(store.get(second.as_str()).is_some());
        assert!(store.get(third.as_str()).is_some());
    }

    #[test]
    fn test_ttl_expiry() {
        let store = SimulationStore::new(8, Some(Duration::from_millis(20)));
        let old = store.create(make_run("old"));
        std::thread::sleep(Duration::from_millis(40));
        assert!(store.get(old.as_str()).is_none());

        let fresh = store.create(make_run("new"));
        assert_eq!(store.len(), 1);
        assert!(store.get(fresh.as_str()).is_some());
    }

    #[test]
    fn test_spectrum_memoized() {
        let run = make_run("memo");
        assert!(!run.has_spectrum(StageName::Channel));
        let first = run.spectrum(StageName::Channel).unwrap() as *const SpectrumSnapshot;
        assert!(run.has_spectrum(StageName::Channel));
        let second = run.spectrum(StageName::Channel).unwrap() as *const SpectrumSnapshot;
        assert_eq!(first, second);
        assert!(!run.has_spectrum(StageName::Source));
    }

    #[test]
    fn test_clear() {
        let store = SimulationStore::default();
        store.create(make_run("c"));
        assert!(!store.is_empty());
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_concurrent_spectrum_requests() {
        let run = Arc::new(make_run("threads"));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let run = Arc::clone(&run);
                std::thread::spawn(move || run.spectrum(StageName::Modulator).unwrap().num_bins())
            })
            .collect();
        let bins: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(bins.windows(2).all(|w| w[0] == w[1]));
    }
}
