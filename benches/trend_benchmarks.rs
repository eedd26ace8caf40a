//! Benchmarks for the trend engine
//!
//! Covers the O(n²) exact pair scan, the bounded sampled mode, and the
//! substitution path on censored data.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use trend_stats::{analyze, AnalysisConfig, MkTestMethod, Observation, SeasonSpec};

fn synthetic_series(n: usize, censored_share: f64) -> Vec<Observation> {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    (0..n)
        .map(|i| {
            let t = i as f64;
            let v = 10.0 + 0.05 * t + rng.gen_range(-2.0..2.0);
            if rng.gen_bool(censored_share) {
                Observation::left_censored(t, v)
            } else {
                Observation::exact(t, v)
            }
        })
        .collect()
}

fn bench_exact_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("exact_scan");
    for n in [100usize, 500, 1000] {
        let series = synthetic_series(n, 0.0);
        let config = AnalysisConfig::default();
        group.bench_with_input(BenchmarkId::from_parameter(n), &series, |b, series| {
            b.iter(|| analyze(black_box(series), &config).unwrap())
        });
    }
    group.finish();
}

fn bench_sampled_scan(c: &mut Criterion) {
    let series = synthetic_series(2000, 0.0);
    let config = AnalysisConfig::default().with_max_pairs(50_000).with_seed(1);
    c.bench_function("sampled_scan_2000", |b| {
        b.iter(|| analyze(black_box(&series), &config).unwrap())
    });
}

fn bench_censored_methods(c: &mut Criterion) {
    let series = synthetic_series(500, 0.3);
    let robust = AnalysisConfig::default();
    let substitution = AnalysisConfig::default().with_mk_test_method(MkTestMethod::Lwp);

    let mut group = c.benchmark_group("censored_methods");
    group.bench_function("robust", |b| {
        b.iter(|| analyze(black_box(&series), &robust).unwrap())
    });
    group.bench_function("substitution", |b| {
        b.iter(|| analyze(black_box(&series), &substitution).unwrap())
    });
    group.finish();
}

fn bench_seasonal(c: &mut Criterion) {
    let series = synthetic_series(600, 0.1);
    let config = AnalysisConfig::default().with_season(SeasonSpec::Cycle {
        period: 12.0,
        bins: 12,
    });
    c.bench_function("seasonal_600", |b| {
        b.iter(|| analyze(black_box(&series), &config).unwrap())
    });
}

criterion_group!(
    benches,
    bench_exact_scan,
    bench_sampled_scan,
    bench_censored_methods,
    bench_seasonal
);
criterion_main!(benches);
