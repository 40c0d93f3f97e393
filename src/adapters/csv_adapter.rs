//! CSV file data adapter.
//!
//! Fundamentals file columns:
//! `date,symbol,country,market_cap,pe_ratio,ev_to_ebitda,quick_ratio,net_debt,ebitda,revenue_growth,net_income_growth,sector`
//!
//! A row with any empty fundamental field contributes a coarse entry
//! without fundamental data. Series file columns:
//! `date,portfolio_value,benchmark`.

use crate::domain::benchmark::SeriesPoint;
use crate::domain::error::AlphaLegionError;
use crate::domain::fundamentals::{CoarseEntry, FundamentalRecord};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvDataAdapter {
    fundamentals_path: PathBuf,
    series_path: Option<PathBuf>,
}

struct Row {
    date: NaiveDate,
    entry: CoarseEntry,
    record: Option<FundamentalRecord>,
}

impl CsvDataAdapter {
    pub fn new(fundamentals_path: PathBuf, series_path: Option<PathBuf>) -> Self {
        Self {
            fundamentals_path,
            series_path,
        }
    }

    fn load_rows(&self) -> Result<Vec<Row>, AlphaLegionError> {
        let path = &self.fundamentals_path;
        let content = fs::read_to_string(path).map_err(|e| AlphaLegionError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut rows = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| AlphaLegionError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let date = parse_date(get_field(&record, 0, "date")?)?;
            let symbol = get_field(&record, 1, "symbol")?.to_string();

            // Any empty fundamental field marks the instrument as
            // tradable but without fundamental data on this date.
            let has_data = (2..12).all(|i| {
                record
                    .get(i)
                    .map(|v| !v.trim().is_empty())
                    .unwrap_or(false)
            });

            let fundamental = if has_data {
                Some(FundamentalRecord {
                    symbol: symbol.clone(),
                    country_code: get_field(&record, 2, "country")?.to_string(),
                    market_cap: parse_number(&record, 3, "market_cap")?,
                    pe_ratio: parse_number(&record, 4, "pe_ratio")?,
                    ev_to_ebitda: parse_number(&record, 5, "ev_to_ebitda")?,
                    quick_ratio: parse_number(&record, 6, "quick_ratio")?,
                    net_debt: parse_number(&record, 7, "net_debt")?,
                    ebitda: parse_number(&record, 8, "ebitda")?,
                    revenue_growth: parse_number(&record, 9, "revenue_growth")?,
                    net_income_growth: parse_number(&record, 10, "net_income_growth")?,
                    sector_code: get_field(&record, 11, "sector")?.parse().map_err(|e| {
                        AlphaLegionError::Data {
                            reason: format!("invalid sector value: {}", e),
                        }
                    })?,
                })
            } else {
                None
            };

            rows.push(Row {
                date,
                entry: CoarseEntry {
                    symbol,
                    has_fundamental_data: fundamental.is_some(),
                },
                record: fundamental,
            });
        }

        Ok(rows)
    }
}

fn get_field<'a>(
    record: &'a csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<&'a str, AlphaLegionError> {
    record.get(index).ok_or_else(|| AlphaLegionError::Data {
        reason: format!("missing {} column", name),
    })
}

fn parse_date(value: &str) -> Result<NaiveDate, AlphaLegionError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| AlphaLegionError::Data {
        reason: format!("invalid date format: {}", e),
    })
}

fn parse_number(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<f64, AlphaLegionError> {
    get_field(record, index, name)?
        .trim()
        .parse()
        .map_err(|e| AlphaLegionError::Data {
            reason: format!("invalid {} value: {}", name, e),
        })
}

impl DataPort for CsvDataAdapter {
    fn snapshot_dates(&self) -> Result<Vec<NaiveDate>, AlphaLegionError> {
        let rows = self.load_rows()?;
        let mut dates: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect();
        dates.sort();
        dates.dedup();
        Ok(dates)
    }

    fn coarse_universe(&self, date: NaiveDate) -> Result<Vec<CoarseEntry>, AlphaLegionError> {
        let rows = self.load_rows()?;
        Ok(rows
            .into_iter()
            .filter(|r| r.date == date)
            .map(|r| r.entry)
            .collect())
    }

    fn fundamentals(&self, date: NaiveDate) -> Result<Vec<FundamentalRecord>, AlphaLegionError> {
        let rows = self.load_rows()?;
        Ok(rows
            .into_iter()
            .filter(|r| r.date == date)
            .filter_map(|r| r.record)
            .collect())
    }

    fn series(&self) -> Result<Vec<SeriesPoint>, AlphaLegionError> {
        let path = match &self.series_path {
            Some(p) => p,
            None => return Ok(Vec::new()),
        };
        let content = fs::read_to_string(path).map_err(|e| AlphaLegionError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut points = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| AlphaLegionError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            points.push(SeriesPoint {
                date: parse_date(get_field(&record, 0, "date")?)?,
                portfolio_value: parse_number(&record, 1, "portfolio_value")?,
                benchmark: parse_number(&record, 2, "benchmark")?,
            });
        }

        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}
