//! Coarse and fine universe selection.
//!
//! The coarse stage reduces the tradable universe to instruments that
//! carry fundamental data, at most once per calendar year. The fine
//! stage applies the fundamental-health filter, sorts by EV/EBITDA and
//! greedily picks up to [`SelectionCriteria::max_selection`] symbols
//! with a per-sector cap.

use crate::domain::fundamentals::{CoarseEntry, FundamentalRecord};
use crate::ports::plot_port::PlotPort;
use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;

/// Thresholds for the fine-stage fundamental filter and the greedy pick.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionCriteria {
    pub countries: Vec<String>,
    pub min_market_cap: f64,
    pub max_pe_ratio: f64,
    pub max_ev_to_ebitda: f64,
    pub min_quick_ratio: f64,
    /// Net debt must stay below this multiple of trailing EBITDA.
    pub net_debt_ebitda_limit: f64,
    pub min_revenue_growth: f64,
    pub min_net_income_growth: f64,
    pub max_selection: usize,
    /// A record is skipped once its sector already holds more than this
    /// many accepted symbols, so at most `sector_cap + 1` per sector.
    pub sector_cap: usize,
}

impl Default for SelectionCriteria {
    fn default() -> Self {
        SelectionCriteria {
            countries: vec![
                "USA".to_string(),
                "GBR".to_string(),
                "DEU".to_string(),
                "FRA".to_string(),
            ],
            min_market_cap: 2_000_000_000.0,
            max_pe_ratio: 25.0,
            max_ev_to_ebitda: 25.0,
            min_quick_ratio: 1.0,
            net_debt_ebitda_limit: 3.5,
            min_revenue_growth: 0.07,
            min_net_income_growth: 0.0,
            max_selection: 20,
            sector_cap: 6,
        }
    }
}

/// Result of the coarse stage.
#[derive(Debug, Clone, PartialEq)]
pub enum CoarseSelection {
    /// Selection already ran this calendar year; the host keeps the
    /// previous universe and skips downstream work for this step.
    Unchanged,
    Symbols(Vec<String>),
}

/// Stateful two-stage universe selector.
///
/// Owns the last calendar year selection ran; `None` means never.
#[derive(Debug, Clone)]
pub struct UniverseSelector {
    pub criteria: SelectionCriteria,
    last_selection_year: Option<i32>,
}

impl UniverseSelector {
    pub fn new(criteria: SelectionCriteria) -> Self {
        UniverseSelector {
            criteria,
            last_selection_year: None,
        }
    }

    /// Coarse stage: every symbol carrying fundamental data, or
    /// [`CoarseSelection::Unchanged`] when this calendar year already
    /// produced a universe. The input is not inspected on the
    /// short-circuit path.
    pub fn select_coarse(&mut self, date: NaiveDate, coarse: &[CoarseEntry]) -> CoarseSelection {
        let year = date.year();
        if self.last_selection_year == Some(year) {
            return CoarseSelection::Unchanged;
        }
        self.last_selection_year = Some(year);

        let symbols = coarse
            .iter()
            .filter(|entry| entry.has_fundamental_data)
            .map(|entry| entry.symbol.clone())
            .collect();
        CoarseSelection::Symbols(symbols)
    }

    /// Fine stage: filter, sort ascending by EV/EBITDA (stable, so ties
    /// keep input order), then greedily accept past the per-sector cap
    /// until `max_selection` symbols are taken.
    ///
    /// Accepted symbols grouped by sector are written to the plot port's
    /// debug channel; nothing downstream consumes those lines.
    pub fn select_fine(
        &self,
        date: NaiveDate,
        fine: &[FundamentalRecord],
        plot: &mut dyn PlotPort,
    ) -> Vec<String> {
        let mut survivors: Vec<&FundamentalRecord> = fine
            .iter()
            .filter(|record| self.passes_filter(record))
            .collect();
        survivors.sort_by(|a, b| a.ev_to_ebitda.total_cmp(&b.ev_to_ebitda));

        let mut sector_counts: HashMap<u32, usize> = HashMap::new();
        let mut sector_symbols: HashMap<u32, Vec<String>> = HashMap::new();
        let mut sector_order: Vec<u32> = Vec::new();
        let mut selection = Vec::new();

        for record in survivors {
            if selection.len() == self.criteria.max_selection {
                break;
            }
            let count = sector_counts.entry(record.sector_code).or_insert(0);
            if *count > self.criteria.sector_cap {
                continue;
            }
            *count += 1;
            selection.push(record.symbol.clone());
            sector_symbols
                .entry(record.sector_code)
                .or_insert_with(|| {
                    sector_order.push(record.sector_code);
                    Vec::new()
                })
                .push(record.symbol.clone());
        }

        plot.debug(&format!("Time: {}", date));
        plot.debug("Companies by sector");
        for sector in &sector_order {
            plot.debug(&format!("{}: {}", sector, sector_symbols[sector].join(",")));
        }

        selection
    }

    /// Conjunction of the eight fundamental-health predicates.
    pub fn passes_filter(&self, record: &FundamentalRecord) -> bool {
        let c = &self.criteria;
        c.countries.iter().any(|country| *country == record.country_code)
            && record.market_cap > c.min_market_cap
            && record.pe_ratio > 0.0
            && record.pe_ratio <= c.max_pe_ratio
            && record.ev_to_ebitda > 0.0
            && record.ev_to_ebitda <= c.max_ev_to_ebitda
            && record.quick_ratio >= c.min_quick_ratio
            && record.net_debt < c.net_debt_ebitda_limit * record.ebitda
            && record.revenue_growth > c.min_revenue_growth
            && record.net_income_growth > c.min_net_income_growth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    struct NullPlot;

    impl PlotPort for NullPlot {
        fn plot(&mut self, _chart: &str, _series: &str, _date: NaiveDate, _value: f64) {}
        fn debug(&mut self, _line: &str) {}
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn qualifying(symbol: &str, ev_to_ebitda: f64, sector_code: u32) -> FundamentalRecord {
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

    fn entry(symbol: &str, has_data: bool) -> CoarseEntry {
        CoarseEntry {
            symbol: symbol.to_string(),
            has_fundamental_data: has_data,
        }
    }

    #[test]
    fn coarse_keeps_only_symbols_with_fundamental_data() {
        let mut selector = UniverseSelector::new(SelectionCriteria::default());
        let coarse = vec![entry("A", true), entry("B", false), entry("C", true)];

        let result = selector.select_coarse(date(2020, 1, 2), &coarse);
        assert_eq!(
            result,
            CoarseSelection::Symbols(vec!["A".to_string(), "C".to_string()])
        );
    }

    #[test]
    fn coarse_returns_unchanged_within_same_year() {
        let mut selector = UniverseSelector::new(SelectionCriteria::default());
        let first = selector.select_coarse(date(2020, 1, 2), &[entry("A", true)]);
        assert!(matches!(first, CoarseSelection::Symbols(_)));

        // Different input, same year: short-circuit without looking at it.
        let second = selector.select_coarse(date(2020, 11, 30), &[entry("B", true)]);
        assert_eq!(second, CoarseSelection::Unchanged);
    }

    #[test]
    fn coarse_runs_again_in_new_year() {
        let mut selector = UniverseSelector::new(SelectionCriteria::default());
        selector.select_coarse(date(2020, 6, 1), &[entry("A", true)]);

        let next_year = selector.select_coarse(date(2021, 1, 4), &[entry("B", true)]);
        assert_eq!(
            next_year,
            CoarseSelection::Symbols(vec!["B".to_string()])
        );
    }

    #[test]
    fn filter_accepts_qualifying_record() {
        let selector = UniverseSelector::new(SelectionCriteria::default());
        assert!(selector.passes_filter(&qualifying("A", 10.0, 311)));
    }

    #[test]
    fn filter_rejects_disallowed_country() {
        let selector = UniverseSelector::new(SelectionCriteria::default());
        let mut record = qualifying("A", 10.0, 311);
        record.country_code = "JPN".to_string();
        assert!(!selector.passes_filter(&record));
    }

    #[test]
    fn filter_rejects_small_market_cap() {
        let selector = UniverseSelector::new(SelectionCriteria::default());
        let mut record = qualifying("A", 10.0, 311);
        record.market_cap = 2_000_000_000.0;
        assert!(!selector.passes_filter(&record));
    }

    #[test]
    fn filter_rejects_nonpositive_or_high_pe() {
        let selector = UniverseSelector::new(SelectionCriteria::default());

        let mut negative = qualifying("A", 10.0, 311);
        negative.pe_ratio = -3.0;
        assert!(!selector.passes_filter(&negative));

        let mut high = qualifying("A", 10.0, 311);
        high.pe_ratio = 25.5;
        assert!(!selector.passes_filter(&high));

        let mut boundary = qualifying("A", 10.0, 311);
        boundary.pe_ratio = 25.0;
        assert!(selector.passes_filter(&boundary));
    }

    #[test]
    fn filter_rejects_nonpositive_or_high_ev_to_ebitda() {
        let selector = UniverseSelector::new(SelectionCriteria::default());

        let mut zero = qualifying("A", 0.0, 311);
        zero.ev_to_ebitda = 0.0;
        assert!(!selector.passes_filter(&zero));

        let boundary = qualifying("A", 25.0, 311);
        assert!(selector.passes_filter(&boundary));

        let high = qualifying("A", 25.1, 311);
        assert!(!selector.passes_filter(&high));
    }

    #[test]
    fn filter_rejects_low_quick_ratio() {
        let selector = UniverseSelector::new(SelectionCriteria::default());
        let mut record = qualifying("A", 10.0, 311);
        record.quick_ratio = 0.99;
        assert!(!selector.passes_filter(&record));

        record.quick_ratio = 1.0;
        assert!(selector.passes_filter(&record));
    }

    #[test]
    fn filter_rejects_excess_leverage() {
        let selector = UniverseSelector::new(SelectionCriteria::default());
        let mut record = qualifying("A", 10.0, 311);
        record.net_debt = 3.5 * record.ebitda;
        assert!(!selector.passes_filter(&record));

        record.net_debt = 3.5 * record.ebitda - 1.0;
        assert!(selector.passes_filter(&record));
    }

    #[test]
    fn filter_rejects_weak_growth() {
        let selector = UniverseSelector::new(SelectionCriteria::default());

        let mut revenue = qualifying("A", 10.0, 311);
        revenue.revenue_growth = 0.07;
        assert!(!selector.passes_filter(&revenue));

        let mut income = qualifying("A", 10.0, 311);
        income.net_income_growth = 0.0;
        assert!(!selector.passes_filter(&income));
    }

    #[test]
    fn fine_sorts_ascending_by_ev_to_ebitda() {
        let selector = UniverseSelector::new(SelectionCriteria::default());
        let fine = vec![
            qualifying("A", 12.0, 311),
            qualifying("B", 4.0, 312),
            qualifying("C", 8.0, 313),
        ];

        let selection = selector.select_fine(date(2020, 1, 2), &fine, &mut NullPlot);
        assert_eq!(selection, vec!["B", "C", "A"]);
    }

    #[test]
    fn fine_drops_non_qualifying_records() {
        let selector = UniverseSelector::new(SelectionCriteria::default());
        let mut bad = qualifying("BAD", 3.0, 311);
        bad.revenue_growth = 0.01;
        let fine = vec![bad, qualifying("GOOD", 9.0, 311)];

        let selection = selector.select_fine(date(2020, 1, 2), &fine, &mut NullPlot);
        assert_eq!(selection, vec!["GOOD"]);
    }

    #[test]
    fn fine_caps_selection_at_max() {
        let selector = UniverseSelector::new(SelectionCriteria::default());
        // Spread across sectors so the sector cap never bites.
        let fine: Vec<_> = (0..30)
            .map(|i| qualifying(&format!("S{i:02}"), 1.0 + i as f64 * 0.5, 300 + i))
            .collect();

        let selection = selector.select_fine(date(2020, 1, 2), &fine, &mut NullPlot);
        assert_eq!(selection.len(), 20);
        assert_eq!(selection[0], "S00");
        assert_eq!(selection[19], "S19");
    }

    #[test]
    fn fine_allows_seven_per_sector_then_skips() {
        let selector = UniverseSelector::new(SelectionCriteria::default());
        // Ten candidates in one sector, cheaper than the two outsiders.
        let mut fine: Vec<_> = (0..10)
            .map(|i| qualifying(&format!("X{i}"), 1.0 + i as f64, 311))
            .collect();
        fine.push(qualifying("Y0", 25.0, 312));
        fine.push(qualifying("Z0", 24.0, 313));

        let selection = selector.select_fine(date(2020, 1, 2), &fine, &mut NullPlot);
        let sector_x = selection.iter().filter(|s| s.starts_with('X')).count();
        assert_eq!(sector_x, 7);
        // The walk continues past capped records to later sectors.
        assert!(selection.contains(&"Y0".to_string()));
        assert!(selection.contains(&"Z0".to_string()));
    }

    #[test]
    fn fine_returns_fewer_when_few_qualify() {
        let selector = UniverseSelector::new(SelectionCriteria::default());
        let fine = vec![qualifying("A", 5.0, 311), qualifying("B", 6.0, 312)];

        let selection = selector.select_fine(date(2020, 1, 2), &fine, &mut NullPlot);
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn fine_stable_order_on_ev_to_ebitda_ties() {
        let selector = UniverseSelector::new(SelectionCriteria::default());
        let fine = vec![
            qualifying("FIRST", 10.0, 311),
            qualifying("SECOND", 10.0, 312),
        ];

        let selection = selector.select_fine(date(2020, 1, 2), &fine, &mut NullPlot);
        assert_eq!(selection, vec!["FIRST", "SECOND"]);
    }

    #[test]
    fn fine_emits_sector_grouping_diagnostics() {
        struct CapturePlot(Vec<String>);

        impl PlotPort for CapturePlot {
            fn plot(&mut self, _: &str, _: &str, _: NaiveDate, _: f64) {}
            fn debug(&mut self, line: &str) {
                self.0.push(line.to_string());
            }
        }

        let selector = UniverseSelector::new(SelectionCriteria::default());
        let fine = vec![
            qualifying("A", 4.0, 311),
            qualifying("B", 5.0, 311),
            qualifying("C", 6.0, 205),
        ];

        let mut capture = CapturePlot(Vec::new());
        selector.select_fine(date(2020, 1, 2), &fine, &mut capture);

        assert_eq!(capture.0[0], "Time: 2020-01-02");
        assert_eq!(capture.0[1], "Companies by sector");
        assert!(capture.0.contains(&"311: A,B".to_string()));
        assert!(capture.0.contains(&"205: C".to_string()));
    }
}
