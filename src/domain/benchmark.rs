//! Benchmark-relative performance plotting.
//!
//! Tracks the benchmark's period-over-period return, rescaled so the
//! series starts at the initial portfolio value, and plots both series
//! at most once per calendar month.

use crate::ports::plot_port::PlotPort;
use chrono::{Datelike, NaiveDate};

pub const CHART_NAME: &str = "Strategy vs Benchmark";
pub const PORTFOLIO_SERIES: &str = "Portfolio Value";
pub const BENCHMARK_SERIES: &str = "Benchmark";

/// One externally supplied step of plotting inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub portfolio_value: f64,
    pub benchmark: f64,
}

/// Monthly plotter of portfolio value against a rescaled benchmark.
#[derive(Debug, Clone)]
pub struct BenchmarkTracker {
    last_plotted_month: Option<u32>,
    last_benchmark: Option<f64>,
    benchmark_performance: f64,
}

impl BenchmarkTracker {
    /// `initial_value` anchors the benchmark series at the starting
    /// portfolio value so the two series share a scale.
    pub fn new(initial_value: f64) -> Self {
        BenchmarkTracker {
            last_plotted_month: None,
            last_benchmark: None,
            benchmark_performance: initial_value,
        }
    }

    /// Per-step callback. Skips steps while the portfolio is not
    /// invested and plots at most once per calendar month.
    pub fn on_data(
        &mut self,
        date: NaiveDate,
        invested: bool,
        portfolio_value: f64,
        benchmark: f64,
        plot: &mut dyn PlotPort,
    ) {
        if !invested {
            return;
        }
        let month = date.month();
        if self.last_plotted_month == Some(month) {
            return;
        }
        self.last_plotted_month = Some(month);

        if let Some(last) = self.last_benchmark {
            self.benchmark_performance *= benchmark / last;
        }
        self.last_benchmark = Some(benchmark);

        plot.plot(CHART_NAME, PORTFOLIO_SERIES, date, portfolio_value);
        plot.plot(CHART_NAME, BENCHMARK_SERIES, date, self.benchmark_performance);
    }
}
