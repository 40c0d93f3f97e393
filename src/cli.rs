//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::console_plot_adapter::ConsolePlotAdapter;
use crate::adapters::csv_adapter::CsvDataAdapter;
use crate::adapters::csv_plot_adapter::CsvPlotAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::algorithm::{Algorithm, StrategyConfig, UniverseStep};
use crate::domain::benchmark::SeriesPoint;
use crate::domain::config_validation::{validate_selection_config, validate_strategy_config};
use crate::domain::error::AlphaLegionError;
use crate::domain::selection::SelectionCriteria;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::plot_port::PlotPort;

#[derive(Parser, Debug)]
#[command(name = "alphalegion", about = "Fundamentals-driven universe selection strategy")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay all data snapshots through the strategy callbacks
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Write plot points to this CSV instead of stderr
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run universe selection for a single snapshot date
    Select {
        #[arg(short, long)]
        config: PathBuf,
        /// Snapshot date (YYYY-MM-DD); defaults to the first available
        #[arg(long)]
        date: Option<String>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show snapshot date range and per-date instrument counts
    Info {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run { config, output } => run_replay(&config, output.as_ref()),
        Command::Select { config, date } => run_select(&config, date.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config } => run_info(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = AlphaLegionError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn build_strategy_config(
    adapter: &dyn ConfigPort,
) -> Result<StrategyConfig, AlphaLegionError> {
    let start_str = adapter
        .get_string("strategy", "start_date")
        .ok_or_else(|| AlphaLegionError::ConfigMissing {
            section: "strategy".into(),
            key: "start_date".into(),
        })?;
    let end_str = adapter.get_string("strategy", "end_date").ok_or_else(|| {
        AlphaLegionError::ConfigMissing {
            section: "strategy".into(),
            key: "end_date".into(),
        }
    })?;

    let start_date = NaiveDate::parse_from_str(&start_str, "%Y-%m-%d").map_err(|_| {
        AlphaLegionError::ConfigInvalid {
            section: "strategy".into(),
            key: "start_date".into(),
            reason: "invalid date format (expected YYYY-MM-DD)".into(),
        }
    })?;
    let end_date = NaiveDate::parse_from_str(&end_str, "%Y-%m-%d").map_err(|_| {
        AlphaLegionError::ConfigInvalid {
            section: "strategy".into(),
            key: "end_date".into(),
            reason: "invalid date format (expected YYYY-MM-DD)".into(),
        }
    })?;

    Ok(StrategyConfig {
        start_date,
        end_date,
        initial_cash: adapter.get_double("strategy", "initial_cash", 10_000.0),
        benchmark_symbol: adapter
            .get_string("strategy", "benchmark")
            .unwrap_or_else(|| "SPY".to_string()),
    })
}

pub fn build_selection_criteria(adapter: &dyn ConfigPort) -> SelectionCriteria {
    let defaults = SelectionCriteria::default();

    let countries = match adapter.get_string("selection", "countries") {
        Some(list) => list
            .split(',')
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty())
            .collect(),
        None => defaults.countries,
    };

    SelectionCriteria {
        countries,
        min_market_cap: adapter.get_double("selection", "min_market_cap", defaults.min_market_cap),
        max_pe_ratio: adapter.get_double("selection", "max_pe_ratio", defaults.max_pe_ratio),
        max_ev_to_ebitda: adapter.get_double(
            "selection",
            "max_ev_to_ebitda",
            defaults.max_ev_to_ebitda,
        ),
        min_quick_ratio: adapter.get_double(
            "selection",
            "min_quick_ratio",
            defaults.min_quick_ratio,
        ),
        net_debt_ebitda_limit: adapter.get_double(
            "selection",
            "net_debt_ebitda_limit",
            defaults.net_debt_ebitda_limit,
        ),
        min_revenue_growth: adapter.get_double(
            "selection",
            "min_revenue_growth",
            defaults.min_revenue_growth,
        ),
        min_net_income_growth: adapter.get_double(
            "selection",
            "min_net_income_growth",
            defaults.min_net_income_growth,
        ),
        max_selection: adapter.get_int("selection", "max_selection", defaults.max_selection as i64)
            as usize,
        sector_cap: adapter.get_int("selection", "sector_cap", defaults.sector_cap as i64) as usize,
    }
}

fn build_data_adapter(adapter: &dyn ConfigPort) -> Result<CsvDataAdapter, AlphaLegionError> {
    let fundamentals = adapter.get_string("data", "fundamentals").ok_or_else(|| {
        AlphaLegionError::ConfigMissing {
            section: "data".into(),
            key: "fundamentals".into(),
        }
    })?;
    let series = adapter.get_string("data", "series");
    Ok(CsvDataAdapter::new(
        PathBuf::from(fundamentals),
        series.map(PathBuf::from),
    ))
}

fn run_replay(config_path: &PathBuf, output_path: Option<&PathBuf>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_strategy_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_selection_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let strategy_config = match build_strategy_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let criteria = build_selection_criteria(&adapter);

    let data_port = match build_data_adapter(&adapter) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let output = output_path
        .cloned()
        .or_else(|| adapter.get_string("plot", "output").map(PathBuf::from));

    match output {
        Some(path) => {
            let mut plot = CsvPlotAdapter::new(path.clone());
            if let Err(code) = replay(&data_port, &strategy_config, criteria, &mut plot) {
                return code;
            }
            match plot.flush() {
                Ok(()) => {
                    eprintln!("Plot points written to: {}", path.display());
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("error: {e}");
                    (&e).into()
                }
            }
        }
        None => {
            match replay(&data_port, &strategy_config, criteria, &mut ConsolePlotAdapter) {
                Ok(()) => ExitCode::SUCCESS,
                Err(code) => code,
            }
        }
    }
}

/// Drive every snapshot date and series row through the strategy
/// callbacks, in date order, the way the host platform would.
fn replay(
    data_port: &dyn DataPort,
    strategy_config: &StrategyConfig,
    criteria: SelectionCriteria,
    plot: &mut dyn PlotPort,
) -> Result<(), ExitCode> {
    let dates = match data_port.snapshot_dates() {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return Err((&e).into());
        }
    };
    let dates: Vec<NaiveDate> = dates
        .into_iter()
        .filter(|d| *d >= strategy_config.start_date && *d <= strategy_config.end_date)
        .collect();
    if dates.is_empty() {
        eprintln!("error: no snapshots within the configured date range");
        return Err(ExitCode::from(5));
    }

    let series = match data_port.series() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return Err((&e).into());
        }
    };
    let series: Vec<SeriesPoint> = series
        .into_iter()
        .filter(|p| p.date >= strategy_config.start_date && p.date <= strategy_config.end_date)
        .collect();

    eprintln!(
        "Replaying {} snapshots, {} series rows, {} to {}",
        dates.len(),
        series.len(),
        strategy_config.start_date,
        strategy_config.end_date,
    );

    let mut algo = Algorithm::new(strategy_config, criteria);
    let mut series_iter = series.iter().peekable();

    for snapshot in &dates {
        // Series rows strictly before the snapshot fire first; the row
        // on the snapshot date itself fires after selection, matching
        // the host's callback order.
        while let Some(point) = series_iter.peek() {
            if point.date >= *snapshot {
                break;
            }
            algo.on_data(point, plot);
            series_iter.next();
        }

        let coarse = match data_port.coarse_universe(*snapshot) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("error: {e}");
                return Err((&e).into());
            }
        };
        let fundamentals = match data_port.fundamentals(*snapshot) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("error: {e}");
                return Err((&e).into());
            }
        };

        match algo.select_universe(*snapshot, &coarse, &fundamentals, plot) {
            UniverseStep::Unchanged => {
                eprintln!("{}: universe unchanged", snapshot);
                continue;
            }
            UniverseStep::Selected(symbols) => {
                eprintln!("{}: selected {} symbols", snapshot, symbols.len());
            }
        }

        let targets = algo.rebalance(*snapshot);
        for target in targets {
            println!("{},{},{:.6}", snapshot, target.symbol, target.weight);
        }
    }

    for point in series_iter {
        algo.on_data(point, plot);
    }

    Ok(())
}

fn run_select(config_path: &PathBuf, date_arg: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_selection_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let data_port = match build_data_adapter(&adapter) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let date = match date_arg {
        Some(s) => match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            Ok(d) => d,
            Err(_) => {
                eprintln!("error: invalid --date (expected YYYY-MM-DD)");
                return ExitCode::from(2);
            }
        },
        None => match data_port.snapshot_dates() {
            Ok(dates) => match dates.first() {
                Some(d) => *d,
                None => {
                    eprintln!("error: no snapshots found");
                    return ExitCode::from(5);
                }
            },
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        },
    };

    let coarse = match data_port.coarse_universe(date) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let fundamentals = match data_port.fundamentals(date) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let strategy_config = StrategyConfig {
        start_date: date,
        end_date: date,
        initial_cash: adapter.get_double("strategy", "initial_cash", 10_000.0),
        benchmark_symbol: adapter
            .get_string("strategy", "benchmark")
            .unwrap_or_else(|| "SPY".to_string()),
    };
    let criteria = build_selection_criteria(&adapter);
    let mut algo = Algorithm::new(&strategy_config, criteria);

    match algo.select_universe(date, &coarse, &fundamentals, &mut ConsolePlotAdapter) {
        UniverseStep::Unchanged => {
            eprintln!("{}: universe unchanged", date);
        }
        UniverseStep::Selected(symbols) => {
            for symbol in &symbols {
                println!("{}", symbol);
            }
            eprintln!("{} symbols selected for {}", symbols.len(), date);
        }
    }
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_strategy_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_selection_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let criteria = build_selection_criteria(&adapter);
    eprintln!("\nSelection criteria:");
    eprintln!("  countries:             {}", criteria.countries.join(","));
    eprintln!("  min_market_cap:        {}", criteria.min_market_cap);
    eprintln!("  max_pe_ratio:          {}", criteria.max_pe_ratio);
    eprintln!("  max_ev_to_ebitda:      {}", criteria.max_ev_to_ebitda);
    eprintln!("  min_quick_ratio:       {}", criteria.min_quick_ratio);
    eprintln!("  net_debt_ebitda_limit: {}", criteria.net_debt_ebitda_limit);
    eprintln!("  min_revenue_growth:    {}", criteria.min_revenue_growth);
    eprintln!("  min_net_income_growth: {}", criteria.min_net_income_growth);
    eprintln!("  max_selection:         {}", criteria.max_selection);
    eprintln!("  sector_cap:            {}", criteria.sector_cap);

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_info(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let data_port = match build_data_adapter(&adapter) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let dates = match data_port.snapshot_dates() {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if dates.is_empty() {
        eprintln!("No snapshots found");
        return ExitCode::from(5);
    }

    for date in &dates {
        let coarse = match data_port.coarse_universe(*date) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };
        let with_data = coarse.iter().filter(|e| e.has_fundamental_data).count();
        println!(
            "{}: {} instruments, {} with fundamentals",
            date,
            coarse.len(),
            with_data
        );
    }
    eprintln!(
        "{} snapshots, {} to {}",
        dates.len(),
        dates.first().unwrap(),
        dates.last().unwrap()
    );
    ExitCode::SUCCESS
}
