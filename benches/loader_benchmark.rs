use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fastvecs_rs::{f16, half_tables, scan_f32, VectorLoader};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

/// Build an in-memory word-vector file
fn generate_vec_text(n_rows: usize, n_features: usize, seed: u64) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut out = format!("{} {}\n", n_rows, n_features);

    for i in 0..n_rows {
        let len = rng.gen_range(1..=24);
        out.extend((0..len).map(|_| rng.gen_range(b'a'..=b'z') as char));
        out.push_str(&format!("{}", i % 10));
        for _ in 0..n_features {
            out.push_str(&format!(" {:.6}", rng.gen_range(-1.0f32..1.0)));
        }
        out.push('\n');
    }

    out.into_bytes()
}

fn benchmark_parse_varying_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_rows");
    group.sample_size(10);
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_secs(2));

    let n_features = 300;
    let row_counts = [1_000, 10_000, 50_000];

    for n_rows in row_counts.iter() {
        let input = generate_vec_text(*n_rows, n_features, 42);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n_rows), &input, |b, input| {
            let loader = VectorLoader::new(32);
            b.iter(|| loader.parse::<f32>(black_box(input)).unwrap());
        });
    }
    group.finish();
}

fn benchmark_parse_storage(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_storage");
    group.sample_size(10);
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_secs(2));

    let input = generate_vec_text(20_000, 300, 7);
    group.throughput(Throughput::Bytes(input.len() as u64));
    let loader = VectorLoader::new(32);

    group.bench_function("f32", |b| {
        b.iter(|| loader.parse::<f32>(black_box(&input)).unwrap());
    });
    group.bench_function("f16", |b| {
        b.iter(|| loader.parse::<f16>(black_box(&input)).unwrap());
    });
    group.finish();
}

fn benchmark_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_f32");
    let numerals: [&[u8]; 4] = [b"42", b"-0.125", b"0.0123456789", b"-12345.678901"];

    for numeral in numerals.iter() {
        let name = String::from_utf8_lossy(numeral).into_owned();
        group.bench_with_input(BenchmarkId::from_parameter(name), numeral, |b, numeral| {
            b.iter(|| scan_f32(black_box(numeral)));
        });
    }
    group.finish();
}

fn benchmark_half_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("half_conversion");

    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let values: Vec<f32> = (0..100_000).map(|_| rng.gen_range(-8.0f32..8.0)).collect();
    group.throughput(Throughput::Elements(values.len() as u64));

    group.bench_function("table_truncate", |b| {
        b.iter(|| half_tables::quantize_slice(black_box(&values)));
    });
    group.bench_function("half_round_nearest", |b| {
        b.iter(|| {
            black_box(&values)
                .iter()
                .map(|&v| f16::from_f32(v))
                .collect::<Vec<_>>()
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    benchmark_parse_varying_rows,
    benchmark_parse_storage,
    benchmark_scan,
    benchmark_half_conversion,
);

criterion_main!(benches);
