use std::path::PathBuf;

use criterion::{criterion_group, criterion_main, Criterion};
use sep_flow::{load_flowsheet, Orchestrator};

fn bench_run_once(c: &mut Criterion) {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("demos/steel_slag_minimal.yaml");
    let flowsheet = load_flowsheet(&path).expect("load demo flowsheet");
    let orchestrator = Orchestrator::new();
    c.bench_function("run_once_throughput", |b| {
        b.iter(|| {
            let report = orchestrator.run_once(&flowsheet);
            assert!(report.is_ok());
        });
    });
}

criterion_group!(benches, bench_run_once);
criterion_main!(benches);
