use criterion::{criterion_group, criterion_main, Criterion};
use funnelmap::{evaluate_scenario, BenchmarkRepository, CalculatorState, ConversionRates};
use std::hint::black_box;

fn bench_solve(c: &mut Criterion) {
    let state = CalculatorState::default();

    c.bench_function("solve_funnel_reverse", |b| {
        b.iter(|| funnelmap::solve_funnel(black_box(&state), black_box(0.73)))
    });
}

fn bench_full_pipeline(c: &mut Criterion) {
    let repo = BenchmarkRepository::builtin();
    // Underperforming rates so the suggestion generator does its re-solves
    let state = CalculatorState {
        rates: ConversionRates {
            visitor_to_lead: 0.01,
            mql_to_sql: 0.3,
            opportunity_to_close: 0.1,
            ..ConversionRates::default()
        },
        ..CalculatorState::default()
    };

    c.bench_function("evaluate_scenario", |b| {
        b.iter(|| evaluate_scenario(black_box(&state), black_box(&repo), None))
    });
}

criterion_group!(benches, bench_solve, bench_full_pipeline);
criterion_main!(benches);
