use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use pal_research_core::bootstrap::bca::{bca_bootstrap, IntervalType};
use pal_research_core::decimal::Decimal;
use pal_research_core::executor::AnyExecutor;
use pal_research_core::universe::generator::{generate_universe, SearchMode};

fn bench_universe_generation(c: &mut Criterion) {
    let executor = AnyExecutor::single();
    let mut group = c.benchmark_group("generate_universe");
    for mode in [SearchMode::basic(), SearchMode::close()] {
        group.bench_with_input(BenchmarkId::from_parameter(mode.name), &mode, |b, mode| {
            b.iter(|| generate_universe(mode, &executor));
        });
    }
    group.finish();
}

fn mean(xs: &[f64]) -> f64 {
    xs.iter().sum::<f64>() / xs.len() as f64
}

fn iid_sampler(src: &[f64], seed_index: usize) -> Vec<f64> {
    let mut rng = Pcg64::seed_from_u64(seed_index as u64);
    (0..src.len()).map(|_| src[rng.gen_range(0..src.len())]).collect()
}

fn bench_bca_bootstrap(c: &mut Criterion) {
    let executor = AnyExecutor::single();
    let sample: Vec<Decimal> = (0..200)
        .map(|i| Decimal::from_f64(((i % 7) as f64 - 3.0) / 100.0).unwrap())
        .collect();

    c.bench_function("bca_bootstrap_500_replicates", |b| {
        b.iter(|| {
            bca_bootstrap(
                &sample,
                500,
                0.95,
                IntervalType::TwoSided,
                mean,
                iid_sampler,
                &executor,
            )
        });
    });
}

criterion_group!(benches, bench_universe_generation, bench_bca_bootstrap);
criterion_main!(benches);
