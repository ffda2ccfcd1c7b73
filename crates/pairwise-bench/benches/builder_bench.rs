//! Covering-set generation benchmarks.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use pairwise_bench::{MIXED_SIZES, sized_scenario, uniform_scenario};
use pairwise_core::{GeneratorConfig, Scenario, generate};

fn scenario_or_panic(built: pairwise_core::Result<Scenario<usize>>) -> Scenario<usize> {
    match built {
        Ok(scenario) => scenario,
        Err(err) => panic!("bench scenario failed to build: {err}"),
    }
}


fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    group.sample_size(20);

    let mixed = scenario_or_panic(sized_scenario(MIXED_SIZES));
    for pool_size in [1, 4, 16] {
        let config = GeneratorConfig::default().with_pool_size(pool_size);
        group.bench_with_input(BenchmarkId::new("mixed7_pairs", pool_size), &config, |b, cfg| {
            b.iter(|| criterion::black_box(generate(&mixed, cfg)));
        });
    }

    let config = GeneratorConfig::default().with_arity(3);
    group.bench_function("mixed7_triples", |b| {
        b.iter(|| criterion::black_box(generate(&mixed, &config)));
    });

    let wide = scenario_or_panic(uniform_scenario(20, 6));
    let config = GeneratorConfig::default();
    group.bench_function("uniform20x6_pairs", |b| {
        b.iter(|| criterion::black_box(generate(&wide, &config)));
    });

    group.finish();
}

criterion_group!(benches, bench_generate);
criterion_main!(benches);
