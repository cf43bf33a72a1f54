//! Benchmark for the result pipeline
//!
//! Covers decode (parse + tagged decoding), unwrap and projection over a
//! result of vertex rows with 64-bit ids.
//!
//! Run: cargo bench --bench projection

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use studio_gql::{decode_response, project_with, stringify};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_body(row_count: usize) -> String {
    let rows: Vec<String> = (0..row_count)
        .map(|i| {
            let vid = 9_000_000_000_000_000_000u64 + i as u64;
            format!(
                r#"{{"vid":{{"raw":"{vid}","value":{vid}}},"v":{{"raw":"({vid} :player)","value":{{"vid":{{"raw":"{vid}","value":{vid}}},"tags":[{{"name":"player","props":{{"age":{{"raw":"{age}","value":{age}}},"name":{{"raw":"\"p{i}\"","value":"p{i}"}}}}}}]}}}},"extra":{i}}}"#,
                vid = vid,
                age = i % 90,
                i = i,
            )
        })
        .collect();

    format!(
        r#"{{"code":0,"message":"","data":{{"headers":["vid","v"],"tables":[{}],"timeCost":10}}}}"#,
        rows.join(",")
    )
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");

    for &row_count in &[100usize, 1_000, 10_000] {
        let body = make_body(row_count);
        let result = decode_response(&body).unwrap();

        group.bench_with_input(BenchmarkId::new("decode", row_count), &body, |b, body| {
            b.iter(|| decode_response(black_box(body)).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("project", row_count), &result, |b, result| {
            b.iter(|| project_with(result.headers(), black_box(result.tables()), false))
        });

        group.bench_with_input(BenchmarkId::new("raw_view", row_count), &result, |b, result| {
            b.iter(|| stringify(&result.project(true), Some(2)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
