//! Criterion benchmarks for elastic-nn: incremental versus per-parameter table building.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use elastic_dist::{Counters, Measure, Sequence};
use elastic_nn::{Dataset, ParameterGrid, build_incremental, build_per_parameter};

fn make_dataset(n: usize, len: usize) -> Dataset {
    let sequences = (0..n)
        .map(|j| {
            let label = j % 2;
            let phase = if label == 0 { 0.0 } else { 1.5 };
            let values: Vec<f64> = (0..len)
                .map(|i| (i as f64 * 0.2 + phase + j as f64 * 0.05).sin())
                .collect();
            Sequence::new(values, label).unwrap()
        })
        .collect();
    Dataset::from_sequences(sequences)
}

fn bench_tables(c: &mut Criterion) {
    let data = make_dataset(30, 48);
    let mut group = c.benchmark_group("nn_table_30x48");
    group.sample_size(10);
    for measure in [Measure::Dtw, Measure::Erp, Measure::Lcss] {
        let grid = ParameterGrid::standard(measure, &data);
        group.bench_with_input(BenchmarkId::new("incremental_eap", measure), &grid, |b, g| {
            b.iter(|| build_incremental(&data, g, true, &mut Counters::new()).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("per_parameter_eap", measure), &grid, |b, g| {
            b.iter(|| build_per_parameter(&data, g, true, &mut Counters::new()).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_tables);
criterion_main!(benches);
