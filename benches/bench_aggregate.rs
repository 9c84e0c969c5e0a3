use std::time::Duration;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use queueplot::{
    ChartOptions, aggregate_log,
    bench_utils::{SyntheticLog, concurrent_identity, synthetic_log},
    catalog::{GroupOutcome, LogIndex},
    charts::build_charts,
};

const LOG_SEED: u64 = 0x5EED;
const SAMPLE_SIZE: usize = 20;
const WARM_UP: Duration = Duration::from_millis(300);
const MEASURE: Duration = Duration::from_millis(500);

fn bench_threads() -> &'static [u32] {
    #[cfg(feature = "bench-ci")]
    {
        &[1, 8]
    }
    #[cfg(not(feature = "bench-ci"))]
    {
        &[1, 8, 64]
    }
}

fn bench_repetitions() -> &'static [u32] {
    #[cfg(feature = "bench-ci")]
    {
        &[3]
    }
    #[cfg(not(feature = "bench-ci"))]
    {
        &[3, 30]
    }
}

fn bench_cases() -> Vec<(String, SyntheticLog)> {
    let mut cases = Vec::new();
    for &threads in bench_threads() {
        for &reps in bench_repetitions() {
            let identity = concurrent_identity("cas", threads, 10, 1, "mixed");
            cases.push((
                format!("t{threads}_r{reps}"),
                synthetic_log(&identity, reps, LOG_SEED + u64::from(threads)),
            ));
        }
    }
    cases
}

fn bench_aggregate_log(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate_log");
    group.sample_size(SAMPLE_SIZE);
    group.warm_up_time(WARM_UP);
    group.measurement_time(MEASURE);
    for (id, log) in bench_cases() {
        group.bench_function(BenchmarkId::from_parameter(id), |b| {
            b.iter(|| aggregate_log(&log.file_name, &log.content).expect("aggregate"));
        });
    }
    group.finish();
}

fn bench_build_charts(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("tempdir");
    let logs = queueplot::bench_utils::synthetic_dataset(
        &["cas", "conc"],
        &["mixed", "pairs"],
        bench_threads(),
        10,
        1,
        3,
        LOG_SEED,
    );
    for log in &logs {
        std::fs::write(dir.path().join(&log.file_name), &log.content).expect("write log");
    }
    let index = LogIndex::scan(dir.path()).expect("index");
    let catalog = index.catalog();
    let GroupOutcome::Ready(run_group) = index.load_group(1, 10, &catalog).expect("group") else {
        panic!("group incomplete");
    };
    let mut group = c.benchmark_group("build_charts");
    group.sample_size(SAMPLE_SIZE);
    group.warm_up_time(WARM_UP);
    group.measurement_time(MEASURE);
    group.bench_function("all_kinds", |b| {
        b.iter(|| {
            build_charts(
                &run_group,
                &catalog,
                ChartOptions {
                    include_all_ops: true,
                },
            )
            .expect("charts")
        });
    });
    group.finish();
}

criterion_group!(benches, bench_aggregate_log, bench_build_charts);
criterion_main!(benches);
