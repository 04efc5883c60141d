use criterion::{black_box, Criterion};
use modelfuzz_plots::stats::{parse_stats, FuzzStats};
use modelfuzz_plots::summary::format_run_summary;
use std::path::Path;

const ITERATION_COUNTS: [usize; 3] = [1_000, 10_000, 100_000];

/// A record shaped like a long fuzzing run: slowly growing series with plateaus.
fn make_record(iterations: usize) -> FuzzStats {
    let coverages: Vec<u64> = (0..iterations as u64).map(|i| 10 + i / 3).collect();
    let transitions: Vec<u64> = (0..iterations as u64).map(|i| 20 + i / 2).collect();
    let code_coverage = (0..iterations).map(|i| 100.0 + i as f64 * 0.25).collect();

    FuzzStats {
        coverages,
        transitions,
        random_traces: iterations as u64 / 4,
        mutated_traces: iterations as u64 - iterations as u64 / 4,
        code_coverage: Some(code_coverage),
    }
}

pub fn bench_parse_stats(c: &mut Criterion) {
    for &iterations in &ITERATION_COUNTS {
        let json = serde_json::to_string(&make_record(iterations)).unwrap();

        let id = &format!("parse_stats_{}", iterations);
        c.bench_function(id, |b| {
            b.iter(|| parse_stats(black_box(&json), Path::new("stats.json")).unwrap())
        });

        println!("[{}] Record size: {} bytes", id, json.len());
    }
}

pub fn bench_validate(c: &mut Criterion) {
    for &iterations in &ITERATION_COUNTS {
        let record = make_record(iterations);

        c.bench_function(&format!("validate_{}", iterations), |b| {
            b.iter(|| black_box(&record).validate())
        });
    }
}

pub fn bench_summary(c: &mut Criterion) {
    let record = make_record(ITERATION_COUNTS[1]);

    c.bench_function("format_run_summary", |b| {
        b.iter(|| format_run_summary(black_box(&record)))
    });
}
