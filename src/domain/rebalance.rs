//! Yearly rebalance gate over a pluggable weighting model.
//!
//! The gate throttles target (re)computation to once per calendar year
//! while always answering a request: within a year the cached target
//! list is returned as-is, across years the wrapped model recomputes.

use chrono::{Datelike, NaiveDate};
use std::collections::HashSet;

/// Directional signal for one symbol, produced by the host's alpha step.
#[derive(Debug, Clone, PartialEq)]
pub struct Insight {
    pub symbol: String,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Flat,
}

impl Insight {
    pub fn up(symbol: &str) -> Self {
        Insight {
            symbol: symbol.to_string(),
            direction: Direction::Up,
        }
    }
}

/// One (symbol, weight) portfolio target.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioTarget {
    pub symbol: String,
    pub weight: f64,
}

/// Universe membership changes forwarded from the host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SecurityChanges {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

/// Seam for the target-weight computation the gate wraps.
pub trait WeightingModel {
    fn on_securities_changed(&mut self, changes: &SecurityChanges);
    fn create_targets(&self, insights: &[Insight]) -> Vec<PortfolioTarget>;
}

/// Equal weighting: 1/N across distinct non-flat symbols.
///
/// Down insights receive negative weight. Duplicate symbols keep their
/// first insight. Weights sum to at most 1 in absolute terms.
#[derive(Debug, Clone, Default)]
pub struct EqualWeighting;

impl WeightingModel for EqualWeighting {
    fn on_securities_changed(&mut self, _changes: &SecurityChanges) {}

    fn create_targets(&self, insights: &[Insight]) -> Vec<PortfolioTarget> {
        let mut seen = HashSet::new();
        let active: Vec<&Insight> = insights
            .iter()
            .filter(|i| i.direction != Direction::Flat)
            .filter(|i| seen.insert(i.symbol.clone()))
            .collect();

        if active.is_empty() {
            return Vec::new();
        }

        let weight = 1.0 / active.len() as f64;
        active
            .iter()
            .map(|insight| PortfolioTarget {
                symbol: insight.symbol.clone(),
                weight: match insight.direction {
                    Direction::Up => weight,
                    Direction::Down => -weight,
                    Direction::Flat => unreachable!(),
                },
            })
            .collect()
    }
}

/// State machine gating a [`WeightingModel`] to one computation per
/// calendar year.
#[derive(Debug, Clone)]
pub struct YearlyRebalanceGate<W: WeightingModel> {
    model: W,
    last_changed_year: Option<i32>,
    last_target_year: Option<i32>,
    cached: Option<Vec<PortfolioTarget>>,
}

impl<W: WeightingModel> YearlyRebalanceGate<W> {
    pub fn new(model: W) -> Self {
        YearlyRebalanceGate {
            model,
            last_changed_year: None,
            last_target_year: None,
            cached: None,
        }
    }

    /// Forward a universe change to the model the first time it is seen
    /// within a calendar year; swallow repeats.
    pub fn on_securities_changed(&mut self, date: NaiveDate, changes: &SecurityChanges) {
        let year = date.year();
        if self.last_changed_year != Some(year) {
            self.last_changed_year = Some(year);
            self.model.on_securities_changed(changes);
        }
    }

    /// Return portfolio targets, recomputing through the model only when
    /// no cache exists or the calendar year moved on. The cached slice is
    /// returned verbatim otherwise.
    pub fn create_targets(&mut self, date: NaiveDate, insights: &[Insight]) -> &[PortfolioTarget] {
        let year = date.year();
        if self.cached.is_none() || self.last_target_year != Some(year) {
            self.last_target_year = Some(year);
            self.cached = Some(self.model.create_targets(insights));
        }
        self.cached.as_deref().unwrap_or(&[])
    }
}
