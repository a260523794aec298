//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{DATE_FORMAT, MAX_LOOKBACK_DAYS, validate_config};
use crate::domain::error::ScreenerError;
use crate::domain::indicator::IndicatorParams;
use crate::domain::indicator::momentum::MomentumWindows;
use crate::domain::projection::{
    DashboardEntry, TrendFilter, explain, filter_entries, project_dashboard, project_rows,
    summarize,
};
use crate::domain::screening::{
    DEFAULT_LOOKBACK_DAYS, DEFAULT_WORKERS, ScreeningConfig, ScreeningRun, run_screen,
};
use crate::domain::scoring::{SCORE_CEILING, ScoringRules};
use crate::domain::universe::{Universe, parse_universe};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

pub const DEFAULT_TOP: usize = 5;

#[derive(Parser, Debug)]
#[command(name = "screener", about = "Technical stock screener for SGX instruments")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Screen the universe and write the ranked report
    Screen {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(long)]
        workers: Option<usize>,
        /// Only list instruments scoring at least this much
        #[arg(long, default_value_t = 0)]
        min_score: u32,
        /// all, uptrend or downtrend
        #[arg(long, default_value = "all")]
        trend: TrendFilter,
    },
    /// Validate a screener configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the rule breakdown for one instrument (top-ranked by default)
    Explain {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        code: Option<String>,
    },
    /// List instruments available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Screen {
            config,
            output,
            data_dir,
            workers,
            min_score,
            trend,
        } => {
            let overrides = Overrides {
                output,
                data_dir,
                workers,
            };
            run_screen_command(&config, &overrides, min_score, trend)
        }
        Command::Validate { config } => run_validate(&config),
        Command::Explain { config, code } => run_explain(&config, code.as_deref()),
        Command::ListSymbols { config, data_dir } => run_list_symbols(&config, data_dir),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = ScreenerError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Command-line values that take precedence over the `[screen]` section.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub output: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub workers: Option<usize>,
}

/// Run parameters that live outside the pure screening configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub data_dir: PathBuf,
    pub as_of: Option<NaiveDate>,
    pub output: PathBuf,
    pub top: usize,
}

pub fn build_indicator_params(config: &dyn ConfigPort) -> IndicatorParams {
    let defaults = IndicatorParams::default();
    let momentum = MomentumWindows::default();
    IndicatorParams {
        rsi_period: config.get_usize("indicators", "rsi_period", defaults.rsi_period),
        ma_short: config.get_usize("indicators", "ma_short", defaults.ma_short),
        ma_long: config.get_usize("indicators", "ma_long", defaults.ma_long),
        momentum: MomentumWindows {
            short: config.get_usize("indicators", "momentum_short", momentum.short),
            medium: config.get_usize("indicators", "momentum_medium", momentum.medium),
            long: config.get_usize("indicators", "momentum_long", momentum.long),
        },
        volume_window: config.get_usize("indicators", "volume_window", defaults.volume_window),
        high_volume_ratio: config.get_double(
            "indicators",
            "high_volume_ratio",
            defaults.high_volume_ratio,
        ),
        min_observations: config.get_usize(
            "indicators",
            "min_observations",
            defaults.min_observations,
        ),
        trading_days: config.get_double("indicators", "trading_days", defaults.trading_days),
    }
}

pub fn build_scoring_rules(config: &dyn ConfigPort) -> ScoringRules {
    let d = ScoringRules::default();
    ScoringRules {
        rsi_lower: config.get_double("scoring", "rsi_lower", d.rsi_lower),
        rsi_upper: config.get_double("scoring", "rsi_upper", d.rsi_upper),
        rsi_points: config.get_points("scoring", "rsi_points", d.rsi_points),
        above_ma_short_points: config.get_points(
            "scoring",
            "above_ma_short_points",
            d.above_ma_short_points,
        ),
        above_ma_long_points: config.get_points(
            "scoring",
            "above_ma_long_points",
            d.above_ma_long_points,
        ),
        ma_cross_points: config.get_points("scoring", "ma_cross_points", d.ma_cross_points),
        momentum_strong_pct: config.get_double(
            "scoring",
            "momentum_strong_pct",
            d.momentum_strong_pct,
        ),
        momentum_strong_points: config.get_points(
            "scoring",
            "momentum_strong_points",
            d.momentum_strong_points,
        ),
        momentum_positive_pct: config.get_double(
            "scoring",
            "momentum_positive_pct",
            d.momentum_positive_pct,
        ),
        momentum_positive_points: config.get_points(
            "scoring",
            "momentum_positive_points",
            d.momentum_positive_points,
        ),
        volume_ratio_threshold: config.get_double(
            "scoring",
            "volume_ratio_threshold",
            d.volume_ratio_threshold,
        ),
        volume_points: config.get_points("scoring", "volume_points", d.volume_points),
        max_score: config.get_points("scoring", "max_score", d.max_score),
    }
}

pub fn build_screening_config(
    config: &dyn ConfigPort,
    workers_override: Option<usize>,
) -> Result<ScreeningConfig, ScreenerError> {
    let workers = match workers_override {
        Some(0) => {
            return Err(ScreenerError::ConfigInvalid {
                section: "screen".into(),
                key: "workers".into(),
                reason: "--workers must be at least 1".into(),
            });
        }
        Some(n) => n,
        None => config.get_usize("screen", "workers", DEFAULT_WORKERS),
    };
    let lookback = config.get_int("screen", "lookback_days", i64::from(DEFAULT_LOOKBACK_DAYS));
    let lookback_days = u32::try_from(lookback)
        .ok()
        .filter(|days| (1..=MAX_LOOKBACK_DAYS).contains(&i64::from(*days)))
        .ok_or_else(|| ScreenerError::ConfigInvalid {
            section: "screen".into(),
            key: "lookback_days".into(),
            reason: format!("lookback_days must be within 1-{}", MAX_LOOKBACK_DAYS),
        })?;

    Ok(ScreeningConfig {
        indicators: build_indicator_params(config),
        scoring: build_scoring_rules(config),
        lookback_days,
        workers,
    })
}

/// `[universe] instruments`, or the built-in SGX list when absent.
pub fn build_universe(config: &dyn ConfigPort) -> Result<Universe, ScreenerError> {
    match config.get_string("universe", "instruments") {
        Some(list) => Ok(parse_universe(&list)?),
        None => Ok(Universe::sgx_default()),
    }
}

pub fn build_run_settings(
    config: &dyn ConfigPort,
    overrides: &Overrides,
) -> Result<RunSettings, ScreenerError> {
    let as_of = match config
        .get_string("screen", "as_of")
        .filter(|s| !s.trim().is_empty())
    {
        Some(s) => Some(NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| {
            ScreenerError::ConfigInvalid {
                section: "screen".into(),
                key: "as_of".into(),
                reason: "invalid date format (expected YYYY-MM-DD)".into(),
            }
        })?),
        None => None,
    };

    let data_dir = overrides.data_dir.clone().unwrap_or_else(|| {
        PathBuf::from(
            config
                .get_string("screen", "data_dir")
                .unwrap_or_else(|| "data".to_string()),
        )
    });
    let output = overrides.output.clone().unwrap_or_else(|| {
        PathBuf::from(
            config
                .get_string("screen", "output")
                .unwrap_or_else(|| "screen.csv".to_string()),
        )
    });

    Ok(RunSettings {
        data_dir,
        as_of,
        output,
        top: config.get_usize("screen", "top", DEFAULT_TOP),
    })
}

struct Prepared {
    screening: ScreeningConfig,
    universe: Universe,
    settings: RunSettings,
}

fn prepare(config_path: &Path, overrides: &Overrides) -> Result<Prepared, ExitCode> {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = load_config(config_path)?;

    let built = validate_config(&adapter).and_then(|()| {
        Ok(Prepared {
            screening: build_screening_config(&adapter, overrides.workers)?,
            universe: build_universe(&adapter)?,
            settings: build_run_settings(&adapter, overrides)?,
        })
    });
    built.map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

/// Run the pipeline and write the tabular report.
pub fn execute_screen(
    data_port: &dyn DataPort,
    report_port: &dyn ReportPort,
    universe: &Universe,
    config: &ScreeningConfig,
    output: &Path,
) -> Result<ScreeningRun, ScreenerError> {
    let run = run_screen(data_port, universe, config)?;
    report_port.write(&project_rows(&run.report), output)?;
    Ok(run)
}

fn print_entry(entry: &DashboardEntry) {
    println!(
        "{:>2}. {} ({})  score {}  {}  {}",
        entry.rank,
        entry.company,
        entry.symbol,
        entry.score,
        entry.grade,
        entry.recommendation
    );
    println!(
        "    price {:.2}  RSI {:.1} ({})  5D {:+.1}%  20D {:+.1}%  {}  {}",
        entry.price,
        entry.rsi,
        entry.rsi_status,
        entry.momentum_short,
        entry.momentum_medium,
        entry.trend,
        entry.risk
    );
}

fn run_screen_command(
    config_path: &Path,
    overrides: &Overrides,
    min_score: u32,
    trend: TrendFilter,
) -> ExitCode {
    let Prepared {
        screening,
        universe,
        settings,
    } = match prepare(config_path, overrides) {
        Ok(p) => p,
        Err(code) => return code,
    };

    eprintln!(
        "Screening {} instruments from {} ({} workers)",
        universe.count(),
        settings.data_dir.display(),
        screening.workers
    );

    let data_port = CsvAdapter::new(settings.data_dir.clone()).with_as_of(settings.as_of);
    let run = match execute_screen(
        &data_port,
        &CsvReportAdapter,
        &universe,
        &screening,
        &settings.output,
    ) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    for skip in &run.skipped {
        eprintln!(
            "warning: skipped {} ({}): {}",
            skip.instrument.name, skip.instrument.code, skip.reason
        );
    }
    eprintln!("{}", run.summary());
    eprintln!("Report written to: {}", settings.output.display());

    if run.report.is_empty() {
        println!("no data");
        return ExitCode::SUCCESS;
    }

    let entries = project_dashboard(&run.report, &screening.scoring);
    let summary = summarize(&run.report, &entries);
    println!("\n=== Market Summary ===");
    println!("Stocks analysed:      {}", summary.total);
    println!("Strong opportunities: {}", summary.strong_opportunities);
    println!(
        "Uptrend:              {} ({:.1}%)",
        summary.uptrend_count, summary.uptrend_pct
    );
    if let (Some(start), Some(end)) = (summary.data_start, summary.data_end) {
        println!("Data coverage:        {} to {}", start, end);
    }

    let listed = filter_entries(&entries, min_score, trend);
    println!("\n=== Top {} ===", settings.top.min(listed.len()));
    for entry in listed.iter().take(settings.top) {
        print_entry(entry);
    }

    print_explanation(&run, None)
}

fn print_explanation(run: &ScreeningRun, code: Option<&str>) -> ExitCode {
    match explain(&run.report, code) {
        Some(explanation) => {
            println!(
                "\n=== Score breakdown: {} ({}) ===",
                explanation.company, explanation.symbol
            );
            for line in explanation.lines() {
                println!("  {}", line);
            }
            println!(
                "  Total: {} (calculated {})",
                explanation.score, explanation.calculated_total
            );
            ExitCode::SUCCESS
        }
        None => match code {
            Some(code) => {
                let err = ScreenerError::Data {
                    code: code.to_string(),
                    reason: "instrument was not scored".into(),
                };
                eprintln!("error: {err}");
                (&err).into()
            }
            None => {
                println!("no data");
                ExitCode::SUCCESS
            }
        },
    }
}

fn run_explain(config_path: &Path, code: Option<&str>) -> ExitCode {
    let Prepared {
        screening,
        universe,
        settings,
    } = match prepare(config_path, &Overrides::default()) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let data_port = CsvAdapter::new(settings.data_dir).with_as_of(settings.as_of);
    let run = match run_screen(&data_port, &universe, &screening) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!("{}", run.summary());

    print_explanation(&run, code)
}

fn run_validate(config_path: &Path) -> ExitCode {
    let Prepared {
        screening,
        universe,
        settings,
    } = match prepare(config_path, &Overrides::default()) {
        Ok(p) => p,
        Err(code) => return code,
    };

    eprintln!("\nUniverse ({} instruments):", universe.count());
    for instrument in &universe.instruments {
        eprintln!("  {} ({})", instrument.name, instrument.code);
    }

    let params = &screening.indicators;
    eprintln!("\nIndicators:");
    eprintln!("  RSI({})", params.rsi_period);
    eprintln!("  SMA({}) / SMA({})", params.ma_short, params.ma_long);
    eprintln!(
        "  momentum {}/{}/{} days",
        params.momentum.short, params.momentum.medium, params.momentum.long
    );
    eprintln!("  volume window {}", params.volume_window);
    eprintln!("  minimum observations {}", params.min_observations);

    eprintln!(
        "\nScoring rules (raw total {}, capped at {}):",
        screening.scoring.max_raw_total(),
        screening.scoring.max_score.min(SCORE_CEILING)
    );
    for line in screening.scoring.describe() {
        eprintln!("  {}", line);
    }

    eprintln!("\nData directory: {}", settings.data_dir.display());
    if let Some(as_of) = settings.as_of {
        eprintln!("As of: {}", as_of);
    }
    eprintln!("Lookback: {} days", screening.lookback_days);

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_list_symbols(config_path: &Path, data_dir: Option<PathBuf>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let overrides = Overrides {
        data_dir,
        ..Overrides::default()
    };
    let settings = match build_run_settings(&config, &overrides) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let adapter = CsvAdapter::new(settings.data_dir.clone());
    let symbols = match adapter.list_symbols() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if symbols.is_empty() {
        eprintln!("No symbols found in {}", settings.data_dir.display());
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}
