//! Benchmarks for the DSSS link pipeline
//!
//! Run with: cargo bench -p dsss-sim --bench pipeline_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dsss_core::spectrum::SpectrumAnalyzer;
use dsss_core::stage::{StageName, StageWaveform};
use dsss_core::CodingScheme;
use dsss_sim::{simulate, SimulationEngine, SimulationRequest};
use std::time::Duration;

// ============================================================================
// Full pipeline
// ============================================================================

fn bench_pipeline_schemes(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.measurement_time(Duration::from_secs(5));

    for scheme in CodingScheme::ALL {
        let params = SimulationRequest::new("HELLO DSSS", "alpha", "alpha")
            .with_coding(scheme)
            .with_noise(0.5, 2e4)
            .with_noise_seed(1)
            .validate(4)
            .expect("valid request");

        group.bench_with_input(BenchmarkId::new("simulate", scheme), &params, |b, p| {
            b.iter(|| simulate(black_box(p)))
        });
    }

    group.finish();
}

fn bench_message_length(c: &mut Criterion) {
    let mut group = c.benchmark_group("message_length");

    for len in [4usize, 32, 128] {
        let message = "x".repeat(len);
        let params = SimulationRequest::new(message, "TEST", "TEST")
            .validate(4)
            .expect("valid request");
        group.throughput(Throughput::Elements((len * 8) as u64));
        group.bench_with_input(BenchmarkId::new("nrz_noiseless", len), &params, |b, p| {
            b.iter(|| simulate(black_box(p)))
        });
    }

    group.finish();
}

// ============================================================================
// Engine round trip
// ============================================================================

fn bench_engine(c: &mut Criterion) {
    let engine = SimulationEngine::default();
    let request = SimulationRequest::new("HI", "TEST", "TEST").with_noise(1.0, 2e4);

    c.bench_function("engine/run_simulation", |b| {
        b.iter(|| engine.run_simulation(black_box(&request)))
    });
}

// ============================================================================
// Spectrum
// ============================================================================

fn bench_spectrum(c: &mut Criterion) {
    let mut group = c.benchmark_group("spectrum");

    for n in [1024usize, 4096, 16384, 10_000] {
        let samples: Vec<f64> = (0..n).map(|i| (i as f64 * 0.01).sin()).collect();
        let waveform = StageWaveform::new(StageName::Channel, samples, 8e5);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("analyze", n), &waveform, |b, wf| {
            b.iter(|| SpectrumAnalyzer.analyze(black_box(wf)))
        });
    }

    group.finish();
}

criterion_group!(pipeline_benches, bench_pipeline_schemes, bench_message_length);
criterion_group!(engine_benches, bench_engine);
criterion_group!(spectrum_benches, bench_spectrum);
criterion_main!(pipeline_benches, engine_benches, spectrum_benches);
