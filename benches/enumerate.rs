// Copyright (c) Addison Crump, 2025, licensed under the EUPL-1.2-or-later.

//! Benchmarks the exhaustive castle search on a few small grids.

use std::time::Duration;

use castles::Castle;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

#[derive(Clone, Copy)]
struct BenchCase {
    width: u8,
    height: u8,
    even: u64,
    odd: u64,
}

const CASES: &[BenchCase] = &[
    BenchCase {
        width: 4,
        height: 2,
        even: 10,
        odd: 5,
    },
    BenchCase {
        width: 2,
        height: 3,
        even: 0,
        odd: 5,
    },
    BenchCase {
        width: 3,
        height: 2,
        even: 6,
        odd: 1,
    },
];

const SWEEP: &[(u8, u8)] = &[(5, 4), (6, 4), (4, 6), (7, 3)];

fn bench_enumerate(c: &mut Criterion) {
    let mut group = c.benchmark_group("enumerate");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(4));
    group.sample_size(20);

    // Correctness guard before benchmarking.
    for case in CASES {
        let tally = castles::count((case.width, case.height)).expect("dimensions are valid");
        assert_eq!((case.even, case.odd), tally.into());
    }

    for &(width, height) in SWEEP {
        let total = castles::count((width, height))
            .expect("dimensions are valid")
            .total();
        group.throughput(Throughput::Elements(total));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{width}x{height}")),
            &total,
            |b, expected| {
                b.iter(|| {
                    let mut castle =
                        Castle::<u8>::new((black_box(width), black_box(height))).expect("valid");
                    let tally = castle.enumerator().enumerate(0);
                    assert_eq!(tally.total(), *expected);
                    black_box(tally)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(enumerate_benches, bench_enumerate);
criterion_main!(enumerate_benches);
