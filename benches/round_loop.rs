use criterion::{Criterion, black_box, criterion_group, criterion_main};
use sensechain::prelude::*;

fn full_runs(c: &mut Criterion) {
    let network = NetworkSnapshot::generate(&TopologyConfig::default(), 0);
    let config = SimConfig::default().without_wall_latency();

    let mut group = c.benchmark_group("run_100_rounds");
    for name in ["ssc", "pow", "leach"] {
        group.bench_function(name, |b| {
            b.iter(|| simulate(name, &config, black_box(network.clone()), 0))
        });
    }
    group.finish();
}

fn clustering(c: &mut Criterion) {
    let network = NetworkSnapshot::generate(&TopologyConfig::default(), 0);
    c.bench_function("form_clusters", |b| b.iter(|| form_clusters(black_box(&network))));
}

criterion_group!(benches, full_runs, clustering);
criterion_main!(benches);
