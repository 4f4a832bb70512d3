use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use track_datum::converters::web::{encode_payload, parse_result_body};
use track_datum::models::LatLon;
use track_datum::utils::coordinates::{decode_sexagesimal, encode_sexagesimal};

// A track wandering around central Tokyo
fn create_test_points(count: usize) -> Vec<LatLon> {
    (0..count)
        .map(|i| {
            let step = i as f64 * 0.00037;
            LatLon::new(35.6812 + step.sin() * 0.05, 139.7671 + step.cos() * 0.05)
        })
        .collect()
}

fn benchmark_codec(c: &mut Criterion) {
    c.bench_function("encode_sexagesimal", |b| {
        b.iter(|| encode_sexagesimal(black_box(139.76712345)))
    });

    c.bench_function("decode_sexagesimal", |b| {
        b.iter(|| decode_sexagesimal(black_box("1394601.64442")))
    });
}

fn benchmark_payload(c: &mut Criterion) {
    let mut group = c.benchmark_group("payload");

    for size in [100, 1_000, 10_000] {
        let points = create_test_points(size);
        let body = encode_payload(&points).expect("encodable points");

        group.bench_with_input(BenchmarkId::new("encode", size), &points, |b, points| {
            b.iter(|| encode_payload(black_box(points)))
        });

        group.bench_with_input(BenchmarkId::new("parse", size), &body, |b, body| {
            b.iter(|| parse_result_body(black_box(body)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_codec, benchmark_payload);
criterion_main!(benches);
