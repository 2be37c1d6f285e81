//! Performance benchmarks for map/reduce operations
//! Measures grouping, summing and CSV parsing across input sizes

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use datadata::load::{format, Accessor, FileType};
use datadata::mapreduce::{emit, map, mapreduce};
use serde_json::{json, Value};
use std::hint::black_box;

/// Create records spread over `groups` distinct keys
fn create_records(count: usize, groups: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            json!({
                "group": format!("group_{}", i % groups),
                "units": i % 7,
                "revenue": (i as f64) * 0.25,
                "label": format!("item_{}", i)
            })
        })
        .collect()
}

fn create_csv(rows: usize) -> String {
    let mut csv = String::from("group,units,revenue,label\n");
    for i in 0..rows {
        csv.push_str(&format!("group_{},{},{},item_{}\n", i % 10, i % 7, i, i));
    }
    csv
}

fn bench_grouping(c: &mut Criterion) {
    let mut group = c.benchmark_group("grouping");

    for count in [100, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("ident", count), &count, |b, &count| {
            b.iter_batched(
                || create_records(count, 50),
                |records| {
                    let result =
                        mapreduce(records, &mut map::key("group"), Some(&mut emit::ident()));
                    black_box(result)
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_sum(c: &mut Criterion) {
    let mut group = c.benchmark_group("sum");

    for count in [100, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("patterns", count), &count, |b, &count| {
            b.iter_batched(
                || create_records(count, 50),
                |records| {
                    let mut sum = emit::sum(&["units", "rev*"], &["label"]).unwrap();
                    black_box(mapreduce(records, &mut map::key("group"), Some(&mut sum)))
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_csv_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("csv_parsing");

    for rows in [100, 10_000] {
        let content = create_csv(rows);
        for (name, accessor) in [("numeric", Accessor::Numeric), ("raw", Accessor::Raw)] {
            group.bench_with_input(BenchmarkId::new(name, rows), &content, |b, content| {
                b.iter(|| black_box(format::parse(content, FileType::Csv, &accessor, "bench.csv")));
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_grouping, bench_sum, bench_csv_parsing);
criterion_main!(benches);
