//! Benchmarks for whole-pipeline entry parsing.

use chrono::{TimeZone, Utc};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

use notelex::parser::Parser;

fn bench_simple_entry(c: &mut Criterion) {
    let parser = Parser::new();
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();

    c.bench_function("parse_simple", |bench| {
        bench.iter(|| black_box(parser.parse_at("Call John", now)))
    });
}

fn bench_dense_entry(c: &mut Criterion) {
    let parser = Parser::new();
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    let entry = "Call Fiona next wednesday re Project Cheesecake urgently \
                 with @robin and @ian #disaster at: the office for 2 hours \
                 remind me 15 minutes before https://example.com/agenda";

    c.bench_function("parse_dense", |bench| {
        bench.iter(|| black_box(parser.parse_at(entry, now)))
    });
}

fn bench_empty_entry(c: &mut Criterion) {
    let parser = Parser::new();
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();

    c.bench_function("parse_empty", |bench| {
        bench.iter(|| black_box(parser.parse_at("", now)))
    });
}

criterion_group!(
    benches,
    bench_simple_entry,
    bench_dense_entry,
    bench_empty_entry
);
criterion_main!(benches);
