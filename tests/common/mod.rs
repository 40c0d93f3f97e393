#![allow(dead_code)]

use alphalegion::domain::algorithm::StrategyConfig;
use alphalegion::domain::benchmark::SeriesPoint;
use alphalegion::domain::error::AlphaLegionError;
pub use alphalegion::domain::fundamentals::{CoarseEntry, FundamentalRecord};
use alphalegion::ports::data_port::DataPort;
use alphalegion::ports::plot_port::PlotPort;
use chrono::NaiveDate;
use std::collections::BTreeMap;

pub struct MockDataPort {
    pub coarse: BTreeMap<NaiveDate, Vec<CoarseEntry>>,
    pub fundamentals: BTreeMap<NaiveDate, Vec<FundamentalRecord>>,
    pub series: Vec<SeriesPoint>,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            coarse: BTreeMap::new(),
            fundamentals: BTreeMap::new(),
            series: Vec::new(),
            error: None,
        }
    }

    pub fn with_snapshot(
        mut self,
        date: NaiveDate,
        records: Vec<FundamentalRecord>,
    ) -> Self {
        let entries = records
            .iter()
            .map(|r| CoarseEntry {
                symbol: r.symbol.clone(),
                has_fundamental_data: true,
            })
            .collect();
        self.coarse.insert(date, entries);
        self.fundamentals.insert(date, records);
        self
    }

    pub fn with_series(mut self, series: Vec<SeriesPoint>) -> Self {
        self.series = series;
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }

    fn check_error(&self) -> Result<(), AlphaLegionError> {
        match &self.error {
            Some(reason) => Err(AlphaLegionError::Data {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl DataPort for MockDataPort {
    fn snapshot_dates(&self) -> Result<Vec<NaiveDate>, AlphaLegionError> {
        self.check_error()?;
        Ok(self.coarse.keys().copied().collect())
    }

    fn coarse_universe(&self, date: NaiveDate) -> Result<Vec<CoarseEntry>, AlphaLegionError> {
        self.check_error()?;
        Ok(self.coarse.get(&date).cloned().unwrap_or_default())
    }

    fn fundamentals(&self, date: NaiveDate) -> Result<Vec<FundamentalRecord>, AlphaLegionError> {
        self.check_error()?;
        Ok(self.fundamentals.get(&date).cloned().unwrap_or_default())
    }

    fn series(&self) -> Result<Vec<SeriesPoint>, AlphaLegionError> {
        self.check_error()?;
        Ok(self.series.clone())
    }
}

/// Plot sink that records everything for assertions.
#[derive(Default)]
pub struct RecordingPlot {
    pub points: Vec<(String, String, NaiveDate, f64)>,
    pub lines: Vec<String>,
}

impl PlotPort for RecordingPlot {
    fn plot(&mut self, chart: &str, series: &str, date: NaiveDate, value: f64) {
        self.points
            .push((chart.to_string(), series.to_string(), date, value));
    }

    fn debug(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A record passing every default filter predicate.
pub fn make_record(symbol: &str, ev_to_ebitda: f64, sector_code: u32) -> FundamentalRecord {
    FundamentalRecord {
        symbol: symbol.to_string(),
        country_code: "USA".to_string(),
        market_cap: 5_000_000_000.0,
        pe_ratio: 15.0,
        ev_to_ebitda,
        quick_ratio: 1.5,
        net_debt: 100.0,
        ebitda: 1_000.0,
        revenue_growth: 0.10,
        net_income_growth: 0.05,
        sector_code,
    }
}

pub fn make_point(date: NaiveDate, portfolio_value: f64, benchmark: f64) -> SeriesPoint {
    SeriesPoint {
        date,
        portfolio_value,
        benchmark,
    }
}

pub fn sample_strategy_config() -> StrategyConfig {
    StrategyConfig {
        start_date: date(1997, 1, 1),
        end_date: date(2020, 12, 31),
        initial_cash: 10_000.0,
        benchmark_symbol: "SPY".to_string(),
    }
}
