use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use ironbrc::combiners::{LiftableCombiner, MinMeanMax, StationStats};
use ironbrc::parse::{parse_line, parse_measurement};
use ironbrc::testing::{MeasurementGenerator, generate_measurements};
use ironbrc::Runner;
use std::hint::black_box;

const ROWS: u64 = 1_000_000;

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    let values: [&[u8]; 4] = [b"-99.9", b"0.0", b"12.3", b"-4.5"];

    group.bench_function("fixed_point", |b| {
        b.iter(|| {
            for v in values {
                black_box(parse_measurement(black_box(v)).unwrap());
            }
        })
    });
    group.bench_function("std_f64", |b| {
        b.iter(|| {
            for v in values {
                let s = std::str::from_utf8(black_box(v)).unwrap();
                black_box(s.parse::<f64>().unwrap());
            }
        })
    });
    group.bench_function("line", |b| {
        b.iter(|| black_box(parse_line(black_box(b"Petropavlovsk-Kamchatsky;-12.3")).unwrap()))
    });
    group.finish();
}

fn bench_fold(c: &mut Criterion) {
    let mut generator = MeasurementGenerator::new(1);
    let values: Vec<f64> = (0..4096).map(|_| generator.next_measurement().1).collect();

    let mut group = c.benchmark_group("fold");
    group.throughput(Throughput::Elements(values.len() as u64));
    group.bench_function("one_by_one", |b| {
        b.iter(|| {
            let mut acc = StationStats::identity();
            for &v in &values {
                acc.fold(v);
            }
            black_box(acc)
        })
    });
    group.bench_function("lanes", |b| {
        b.iter(|| black_box(MinMeanMax.build_from_group(black_box(&values))))
    });
    group.finish();
}

fn bench_runner(c: &mut Criterion) {
    let input = generate_measurements(ROWS, 42);

    let mut group = c.benchmark_group("runner");
    group.throughput(Throughput::Bytes(input.len() as u64));
    group.sample_size(10);

    group.bench_function("sequential", |b| {
        let runner = Runner::sequential();
        b.iter(|| black_box(runner.run_bytes(&input).unwrap()))
    });
    for threads in [2usize, 4, 8] {
        group.bench_with_input(BenchmarkId::new("parallel", threads), &threads, |b, &t| {
            let runner = Runner::parallel(t);
            b.iter(|| black_box(runner.aggregate_bytes(&input, &MinMeanMax).unwrap()))
        });
    }
    group.bench_function("buffered", |b| {
        let runner = Runner::parallel(4);
        b.iter(|| black_box(runner.aggregate_bytes_lifted(&input, &MinMeanMax).unwrap()))
    });
    group.bench_function("reader", |b| {
        let runner = Runner::parallel(4).with_chunk_size(1 << 20);
        b.iter(|| black_box(runner.run_reader(input.as_bytes()).unwrap()))
    });
    group.finish();
}

criterion_group!(benches, bench_parse, bench_fold, bench_runner);
criterion_main!(benches);
