//! Criterion benchmarks for TradeSim hot paths.
//!
//! Benchmarks:
//! 1. Simulation loop (ledger + equity tracker per bar)
//! 2. Signal generation (MA crossover, RSI, Bollinger)
//! 3. Ledger execution (buy/sell round trips)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use tradesim_core::domain::{Bar, TradeSide};
use tradesim_core::engine::{run_simulation, Ledger, SimulationConfig};
use tradesim_core::signals::{BollingerBands, MaCrossover, RsiStrategy, SignalSource};
use tradesim_core::sizers::FixedFraction;

// ── Helpers ──────────────────────────────────────────────────────────

fn make_bars(n: usize) -> Vec<Bar> {
    let base = chrono::NaiveDate::from_ymd_opt(2020, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            Bar {
                timestamp: base + chrono::Duration::days(i as i64),
                open: close - 0.3,
                high: close + 1.5,
                low: close - 1.5,
                close,
                volume: 1_000_000.0 + (i % 500_000) as f64,
            }
        })
        .collect()
}

// ── 1. Simulation loop ───────────────────────────────────────────────

fn bench_simulation_loop(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation_loop");
    let config = SimulationConfig::new("SPY", 100_000.0, 0.001);
    let sizer = FixedFraction::default();

    for &n in &[252usize, 1260, 5040] {
        let bars = make_bars(n);
        let rows = MaCrossover::new(10, 50).generate(&bars);
        group.bench_with_input(BenchmarkId::new("ma_crossover", n), &rows, |b, rows| {
            b.iter(|| run_simulation(black_box(&config), black_box(rows), &sizer))
        });
    }
    group.finish();
}

// ── 2. Signal generation ─────────────────────────────────────────────

fn bench_signals(c: &mut Criterion) {
    let mut group = c.benchmark_group("signal_generation");
    let bars = make_bars(1260);
    let sources: Vec<Box<dyn SignalSource>> = vec![
        Box::new(MaCrossover::default()),
        Box::new(RsiStrategy::default()),
        Box::new(BollingerBands::new(20, 2.0, true)),
    ];
    for source in &sources {
        group.bench_function(source.name(), |b| b.iter(|| source.generate(black_box(&bars))));
    }
    group.finish();
}

// ── 3. Ledger execution ──────────────────────────────────────────────

fn bench_ledger(c: &mut Criterion) {
    let ts = chrono::NaiveDate::from_ymd_opt(2020, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    c.bench_function("ledger_round_trip_1000", |b| {
        b.iter(|| {
            let mut ledger = Ledger::new(1_000_000.0, 0.001).unwrap();
            for _ in 0..1000 {
                let _ = ledger.execute_trade("SPY", ts, 100.0, 10.0, TradeSide::Buy);
                let _ = ledger.execute_trade("SPY", ts, 100.0, 10.0, TradeSide::Sell);
            }
            black_box(ledger.cash())
        })
    });
}

criterion_group!(benches, bench_simulation_loop, bench_signals, bench_ledger);
criterion_main!(benches);
