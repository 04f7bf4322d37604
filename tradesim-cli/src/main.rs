//! TradeSim CLI: run, signals, sweep and config commands.
//!
//! Commands:
//! - `run`: execute a backtest from a TOML config file and save artifacts
//! - `signals`: count buy/sell edges per strategy over a data file
//! - `sweep`: parallel moving-average window sweep
//! - `init-config`: write the default config to a TOML file

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tradesim_core::domain::Bar;
use tradesim_core::signals::{BollingerBands, MaCrossover, RsiStrategy, SignalSource};
use tradesim_runner::data_loader::generate_synthetic_bars;
use tradesim_runner::export::{export_signals_csv, save_artifacts};
use tradesim_runner::{
    count_signals, load_bars, run_backtest_from_bars, BacktestConfig, BacktestResult,
    LoadOptions, ParamGrid, ParamSweep,
};

#[derive(Parser)]
#[command(name = "tradesim", about = "TradeSim CLI: signal-driven backtesting engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a backtest from a TOML config file.
    Run {
        /// Path to a TOML config file. Defaults are used when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the config's data file.
        #[arg(long)]
        data: Option<PathBuf>,

        /// Use synthetic random-walk data instead of a data file.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Output directory for artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,

        /// Print the summary only; write no artifacts.
        #[arg(long, default_value_t = false)]
        no_export: bool,
    },
    /// Count buy/sell signals per strategy over a data file.
    Signals {
        /// CSV data file with Date,Open,High,Low,Close,Volume columns.
        #[arg(long, required_unless_present = "synthetic")]
        data: Option<PathBuf>,

        /// Use synthetic random-walk data.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Symbol used to seed synthetic data.
        #[arg(long, default_value = "AAPL")]
        symbol: String,

        /// Strategy to evaluate with default parameters. All when omitted.
        #[arg(long, value_enum)]
        strategy: Option<StrategyKind>,

        /// Write the signal series with buy/sell markers to this CSV file.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Sweep moving-average crossover windows in parallel.
    Sweep {
        /// Base TOML config. Defaults are used when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Short windows, comma-separated.
        #[arg(long, value_delimiter = ',', default_value = "10,20,30")]
        short: Vec<usize>,

        /// Long windows, comma-separated.
        #[arg(long, value_delimiter = ',', default_value = "50,100,200")]
        long: Vec<usize>,

        /// Use synthetic random-walk data instead of a data file.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Number of best results to print.
        #[arg(long, default_value_t = 5)]
        top: usize,

        /// Run configurations one after another.
        #[arg(long, default_value_t = false)]
        sequential: bool,
    },
    /// Write the default configuration to a TOML file.
    InitConfig {
        path: PathBuf,

        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyKind {
    MaCrossover,
    Rsi,
    Bollinger,
}

impl StrategyKind {
    fn source(self) -> Box<dyn SignalSource> {
        match self {
            Self::MaCrossover => Box::new(MaCrossover::default()),
            Self::Rsi => Box::new(RsiStrategy::default()),
            Self::Bollinger => Box::new(BollingerBands::default()),
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            data,
            synthetic,
            output_dir,
            no_export,
        } => run_backtest_cmd(config, data, synthetic, &output_dir, no_export),
        Commands::Signals {
            data,
            synthetic,
            symbol,
            strategy,
            output,
        } => run_signals_cmd(data, synthetic, &symbol, strategy, output),
        Commands::Sweep {
            config,
            short,
            long,
            synthetic,
            top,
            sequential,
        } => run_sweep_cmd(config, short, long, synthetic, top, sequential),
        Commands::InitConfig { path, force } => run_init_config(&path, force),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<BacktestConfig> {
    match path {
        Some(path) => BacktestConfig::from_file(&path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(BacktestConfig::default()),
    }
}

/// Bars for a config: synthetic over the configured date range, or the CSV file.
fn load_config_bars(config: &BacktestConfig, synthetic: bool) -> Result<Vec<Bar>> {
    let b = &config.backtest;
    if synthetic {
        let (start, end) = synthetic_range(b.start_date, b.end_date);
        return Ok(generate_synthetic_bars(&config.data.symbol, start, end));
    }
    let opts = LoadOptions {
        start: b.start_date,
        end: b.end_date,
    };
    Ok(load_bars(&config.data.file_path, &opts)?)
}

fn synthetic_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> (NaiveDate, NaiveDate) {
    let end = end.unwrap_or_else(|| chrono::Local::now().date_naive());
    let start = start.unwrap_or(end - chrono::Duration::days(365 * 5));
    (start, end)
}

fn run_backtest_cmd(
    config_path: Option<PathBuf>,
    data: Option<PathBuf>,
    synthetic: bool,
    output_dir: &Path,
    no_export: bool,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(data) = data {
        config.data.file_path = data;
    }

    let bars = load_config_bars(&config, synthetic)?;
    let result = run_backtest_from_bars(&config, &bars, synthetic)?;

    print_summary(&result);

    if !no_export {
        let run_dir = save_artifacts(&result, output_dir)?;
        println!("Artifacts saved to: {}", run_dir.display());
    }

    Ok(())
}

fn run_signals_cmd(
    data: Option<PathBuf>,
    synthetic: bool,
    symbol: &str,
    strategy: Option<StrategyKind>,
    output: Option<PathBuf>,
) -> Result<()> {
    let bars = if synthetic {
        let (start, end) = synthetic_range(NaiveDate::from_ymd_opt(2020, 1, 1), None);
        generate_synthetic_bars(symbol, start, end)
    } else {
        let Some(path) = data else {
            bail!("--data is required unless --synthetic is set");
        };
        load_bars(&path, &LoadOptions::default())?
    };

    let kinds = match strategy {
        Some(kind) => vec![kind],
        None => vec![
            StrategyKind::MaCrossover,
            StrategyKind::Rsi,
            StrategyKind::Bollinger,
        ],
    };
    if output.is_some() && kinds.len() != 1 {
        bail!("--output needs a single --strategy");
    }

    println!("{:<18} {:>8} {:>8}", "Strategy", "Buys", "Sells");
    println!("{}", "-".repeat(36));
    for kind in kinds {
        let source = kind.source();
        let counts = count_signals(source.as_ref(), &bars)?;
        println!("{:<18} {:>8} {:>8}", source.name(), counts.buy, counts.sell);

        if let Some(path) = &output {
            let csv = export_signals_csv(&source.generate(&bars))?;
            std::fs::write(path, csv)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Signals saved to: {}", path.display());
        }
    }

    Ok(())
}

fn run_sweep_cmd(
    config_path: Option<PathBuf>,
    short: Vec<usize>,
    long: Vec<usize>,
    synthetic: bool,
    top: usize,
    sequential: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let bars = load_config_bars(&config, synthetic)?;
    let grid = ParamGrid {
        ma_short_periods: short,
        ma_long_periods: long,
    };

    let results = ParamSweep::new()
        .with_parallelism(!sequential)
        .sweep(&grid, &config, &bars, synthetic)?;
    if results.is_empty() {
        bail!("no valid (short, long) pairs in the grid; short must be < long");
    }

    println!();
    println!(
        "{:<14} {:>10} {:>10} {:>10} {:>8}",
        "Windows", "Return", "Sharpe", "MaxDD", "Trades"
    );
    println!("{}", "-".repeat(56));
    for r in results.top_n(top) {
        println!(
            "{:<14} {:>9.2}% {:>10.3} {:>9.2}% {:>8}",
            windows_label(r),
            r.metrics.total_return * 100.0,
            r.metrics.sharpe_ratio,
            r.metrics.max_drawdown * 100.0,
            r.metrics.trade_count
        );
    }
    println!();
    Ok(())
}

fn windows_label(result: &BacktestResult) -> String {
    match &result.config.strategy {
        tradesim_runner::StrategyConfig::MaCrossover(ma) => {
            format!("{}/{}", ma.short_window, ma.long_window)
        }
        other => other.name().to_string(),
    }
}

fn run_init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (pass --force to overwrite)", path.display());
    }
    BacktestConfig::default().save(path)?;
    println!("Default config written to: {}", path.display());
    Ok(())
}

fn print_summary(result: &BacktestResult) {
    let m = &result.metrics;
    let run = &result.run;
    println!();
    println!("=== Backtest Result ===");
    println!("Symbol:         {}", result.symbol);
    println!("Strategy:       {}", result.strategy);
    println!(
        "Period:         {} to {}",
        result.start_date, result.end_date
    );
    println!(
        "Bars:           {} ({} skipped)",
        result.bar_count, run.skipped_bars
    );
    println!(
        "Signals:        {} buy / {} sell",
        result.signals.buy, result.signals.sell
    );
    println!(
        "Trades:         {} ({} rejected)",
        run.total_trades,
        run.rejected.len()
    );
    println!();
    println!("--- Account ---");
    println!("Initial Capital:{:>14.2}", result.initial_capital());
    println!("Final Equity:   {:>14.2}", run.final_equity);
    println!("Final Cash:     {:>14.2}", run.final_cash);
    println!("Commission:     {:>14.2}", run.total_commission);
    for (symbol, quantity) in run.final_positions.iter() {
        println!("Position:       {symbol} x {quantity:.4}");
    }
    println!();
    println!("--- Performance ---");
    println!("Total Return:   {:.2}%", m.total_return * 100.0);
    println!("CAGR:           {:.2}%", m.cagr * 100.0);
    println!("Sharpe:         {:.3}", m.sharpe_ratio);
    println!("Max Drawdown:   {:.2}%", m.max_drawdown * 100.0);
    println!("Volatility:     {:.2}%", m.volatility * 100.0);
    println!("Win Rate:       {:.1}%", m.win_rate * 100.0);
    if result.has_synthetic {
        println!();
        println!("WARNING: Results based on SYNTHETIC data");
    }
    println!();
}
