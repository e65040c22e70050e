use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pgfluent::{Assign, Builder, Placeholders};

/// SELECT col0, col1, ... FROM t WHERE col0 = $1 AND col1 = $2 ...
fn build_select(n: usize) -> Builder<'static> {
    let mut b = Builder::new();
    b.select((0..n).map(|i| format!("col{i}"))).from("t");
    for i in 0..n {
        b.where_(&format!("col{i} = ?"), [i as i64]);
    }
    b
}

fn bench_to_sql(c: &mut Criterion) {
    let mut group = c.benchmark_group("builder/to_sql");

    for n in [1, 5, 10, 50, 100] {
        let b = build_select(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &b, |bench, b| {
            bench.iter(|| black_box(b.to_sql()));
        });
    }

    group.finish();
}

fn bench_build_and_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("builder/build_and_render");

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |bench, &n| {
            bench.iter(|| {
                let b = build_select(n);
                black_box(b.to_sql());
            });
        });
    }

    group.finish();
}

fn bench_rewrite(c: &mut Criterion) {
    let mut group = c.benchmark_group("builder/rewrite");

    for n in [1, 10, 100] {
        let condition = vec!["x = ?"; n].join(" AND ");
        group.bench_with_input(BenchmarkId::from_parameter(n), &condition, |bench, cond| {
            bench.iter(|| {
                let mut p = Placeholders::new();
                black_box(p.rewrite(cond));
            });
        });
    }

    group.finish();
}

fn bench_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("builder/set");

    for n in [5, 20, 100] {
        let columns: Vec<String> = (0..n).map(|i| format!("col{i}")).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &columns, |bench, columns| {
            bench.iter(|| {
                let mut b = Builder::new();
                b.update("t")
                    .set(columns.iter().map(|c| (c, Assign::value(1_i32))))
                    .where_("id = ?", [1_i64]);
                black_box(b.to_sql());
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_to_sql,
    bench_build_and_render,
    bench_rewrite,
    bench_set
);
criterion_main!(benches);
