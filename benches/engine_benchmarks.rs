//! Engine benchmarks: simulated execution, NL2SQL and analytics.

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use erpsim::{Engine, GeneratorSettings, Variance};

fn make_bench_engine() -> Engine {
    let settings = GeneratorSettings {
        master_seed: 42,
        anchor: NaiveDate::from_ymd_opt(2025, 6, 30).expect("valid date"),
        window_days: 365,
    };
    Engine::new(settings, Variance::default(), 100).expect("engine")
}

fn bench_execute(c: &mut Criterion) {
    let engine = make_bench_engine();

    let mut group = c.benchmark_group("execute");
    for (name, sql) in [
        ("scan", "SELECT * FROM sales"),
        ("filter", "SELECT * FROM sales WHERE amount > 500 LIMIT 20"),
        ("count", "SELECT COUNT(*) FROM orders"),
        (
            "group_by",
            "SELECT region, SUM(amount) AS total FROM sales GROUP BY region",
        ),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &sql, |b, sql| {
            b.iter(|| engine.execute(black_box(sql)));
        });
    }
    group.finish();
}

fn bench_nl2sql(c: &mut Criterion) {
    let engine = make_bench_engine();

    let mut group = c.benchmark_group("nl2sql");
    for (name, question) in [
        ("revenue_by_region", "total revenue by region"),
        ("order_count", "how many orders were placed"),
        ("approval", "what is going on with inventory"),
        ("rejected", "what is the weather"),
    ] {
        group.bench_with_input(
            BenchmarkId::from_parameter(name),
            &question,
            |b, question| {
                b.iter(|| engine.generate_sql(black_box(question), None));
            },
        );
    }
    group.finish();
}

fn bench_analytics(c: &mut Criterion) {
    let engine = make_bench_engine();

    let mut group = c.benchmark_group("analytics");
    for period in ["day", "week", "month", "quarter"] {
        group.bench_with_input(BenchmarkId::from_parameter(period), &period, |b, period| {
            b.iter(|| engine.analytics(black_box(period), "revenue"));
        });
    }
    group.finish();
}

fn bench_generation(c: &mut Criterion) {
    c.bench_function("generate_row_store", |b| b.iter(make_bench_engine));
}

criterion_group!(
    benches,
    bench_execute,
    bench_nl2sql,
    bench_analytics,
    bench_generation
);
criterion_main!(benches);
