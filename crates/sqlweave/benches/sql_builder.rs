use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlweave::{Dialect, QueryBuilder};

/// Build a SELECT with `n` columns and `n` WHERE conditions.
fn build_select(n: usize) -> QueryBuilder {
    let mut qb = QueryBuilder::new(Dialect::Postgres).from("t");
    for i in 0..n {
        qb = qb.select(&format!("col{i}")).and_where(&format!("col{i}"), i as i64);
    }
    qb
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/compile");

    for n in [1, 5, 10, 50, 100] {
        let qb = build_select(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &qb, |b, qb| {
            b.iter(|| black_box(qb.compile().unwrap()));
        });
    }

    group.finish();
}

fn bench_build_and_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/build_and_compile");

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let qb = build_select(n);
                black_box(qb.compile().unwrap());
            });
        });
    }

    group.finish();
}

fn bench_in_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/in_list");

    for n in [5, 20, 100, 500] {
        let values: Vec<i64> = (0..n).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, values| {
            b.iter(|| {
                let qb = QueryBuilder::new(Dialect::Postgres)
                    .from("t")
                    .where_in("id", values.iter().copied());
                black_box(qb.compile().unwrap());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compile, bench_build_and_compile, bench_in_list);
criterion_main!(benches);
