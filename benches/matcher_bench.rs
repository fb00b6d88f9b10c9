//! Linear scan vs prefix index over growing operator collections.

use callmatch::core::{Call, Operator};
use callmatch::matcher::{FixedOffsetExtractor, MatchStrategy, Matcher};
use callmatch::report::build_rows;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rust_decimal::Decimal;
use std::hint::black_box;

fn operators(count: usize) -> Vec<Operator> {
    // Leading characters cycle so the owner of '9' sits near the end.
    (0..count)
        .map(|i| Operator {
            id: format!("o{i}"),
            prefix: format!("{}{}", (b'a' + (i % 26) as u8) as char, i),
            operator: format!("Operator {i}"),
        })
        .chain(std::iter::once(Operator {
            id: "last".to_string(),
            prefix: "9".to_string(),
            operator: "Nine".to_string(),
        }))
        .collect()
}

fn calls(count: usize) -> Vec<Call> {
    (0..count)
        .map(|i| Call {
            id: format!("c{i}"),
            date: "2024-01-05T10:00:00".to_string(),
            number: format!("000{}{:06}", i % 10, i),
            risk_score: Decimal::new((i % 100) as i64, 2),
            green_list: false,
            red_list: i % 7 == 0,
        })
        .collect()
}

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_rows");
    let snapshot = calls(1_000);
    let extractor = FixedOffsetExtractor::default();

    for operator_count in [10, 100, 1_000] {
        let ops = operators(operator_count);
        for strategy in [MatchStrategy::Linear, MatchStrategy::Indexed] {
            group.bench_with_input(
                BenchmarkId::new(format!("{strategy:?}"), operator_count),
                &ops,
                |b, ops| {
                    b.iter(|| {
                        let matcher = Matcher::new(ops, &extractor, strategy);
                        black_box(build_rows(black_box(&snapshot), &matcher))
                    })
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_strategies);
criterion_main!(benches);
