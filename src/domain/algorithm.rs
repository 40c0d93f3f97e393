//! Strategy driver composing selection, rebalancing and plotting.
//!
//! Exposes the callback surface the host platform drives once per
//! simulated step: universe selection, target creation and the data
//! callback. The CLI replay harness stands in for the platform.

use crate::domain::benchmark::{BenchmarkTracker, SeriesPoint};
use crate::domain::fundamentals::{CoarseEntry, FundamentalRecord};
use crate::domain::rebalance::{
    EqualWeighting, Insight, PortfolioTarget, SecurityChanges, YearlyRebalanceGate,
};
use crate::domain::selection::{CoarseSelection, SelectionCriteria, UniverseSelector};
use crate::ports::plot_port::PlotPort;
use chrono::NaiveDate;
use std::collections::HashSet;

/// Run-level strategy parameters.
#[derive(Debug, Clone)]
pub struct StrategyConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_cash: f64,
    pub benchmark_symbol: String,
}

/// Outcome of one universe-selection step.
#[derive(Debug, Clone, PartialEq)]
pub enum UniverseStep {
    /// Selection already ran this year; the previous universe stands.
    Unchanged,
    Selected(Vec<String>),
}

/// One strategy instance: owns all per-run mutable state.
pub struct Algorithm {
    selector: UniverseSelector,
    gate: YearlyRebalanceGate<EqualWeighting>,
    tracker: BenchmarkTracker,
    selection: Vec<String>,
    invested: bool,
}

impl Algorithm {
    pub fn new(config: &StrategyConfig, criteria: SelectionCriteria) -> Self {
        Algorithm {
            selector: UniverseSelector::new(criteria),
            gate: YearlyRebalanceGate::new(EqualWeighting),
            tracker: BenchmarkTracker::new(config.initial_cash),
            selection: Vec::new(),
            invested: false,
        }
    }

    /// Currently selected symbols, in acceptance order.
    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    /// One selection step: coarse stage, then fine stage over the
    /// records of the instruments the coarse stage let through. On the
    /// coarse short-circuit the fine stage is skipped entirely for this
    /// step and the previous selection stands.
    pub fn select_universe(
        &mut self,
        date: NaiveDate,
        coarse: &[CoarseEntry],
        fundamentals: &[FundamentalRecord],
        plot: &mut dyn PlotPort,
    ) -> UniverseStep {
        let passed = match self.selector.select_coarse(date, coarse) {
            CoarseSelection::Unchanged => return UniverseStep::Unchanged,
            CoarseSelection::Symbols(symbols) => symbols,
        };

        let passed_set: HashSet<&str> = passed.iter().map(String::as_str).collect();
        let fine: Vec<FundamentalRecord> = fundamentals
            .iter()
            .filter(|record| passed_set.contains(record.symbol.as_str()))
            .cloned()
            .collect();

        let selected = self.selector.select_fine(date, &fine, plot);
        let changes = diff_selection(&self.selection, &selected);
        self.gate.on_securities_changed(date, &changes);
        self.selection = selected.clone();
        UniverseStep::Selected(selected)
    }

    /// Create targets from Up insights over the current selection. The
    /// gate decides whether the weighting model actually recomputes.
    pub fn rebalance(&mut self, date: NaiveDate) -> &[PortfolioTarget] {
        let insights: Vec<Insight> = self.selection.iter().map(|s| Insight::up(s)).collect();
        let targets = self.gate.create_targets(date, &insights);
        if !targets.is_empty() {
            self.invested = true;
        }
        targets
    }

    /// Per-step data callback: monthly benchmark-relative plotting.
    pub fn on_data(&mut self, point: &SeriesPoint, plot: &mut dyn PlotPort) {
        self.tracker.on_data(
            point.date,
            self.invested,
            point.portfolio_value,
            point.benchmark,
            plot,
        );
    }
}

fn diff_selection(previous: &[String], current: &[String]) -> SecurityChanges {
    let previous_set: HashSet<&String> = previous.iter().collect();
    let current_set: HashSet<&String> = current.iter().collect();

    SecurityChanges {
        added: current
            .iter()
            .filter(|s| !previous_set.contains(s))
            .cloned()
            .collect(),
        removed: previous
            .iter()
            .filter(|s| !current_set.contains(s))
            .cloned()
            .collect(),
    }
}
