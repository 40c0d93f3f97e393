//! Data access port trait.
//!
//! The trading platform owns the live feed; this port is the seam the
//! replay harness and tests plug snapshot data into.

use crate::domain::benchmark::SeriesPoint;
use crate::domain::error::AlphaLegionError;
use crate::domain::fundamentals::{CoarseEntry, FundamentalRecord};
use chrono::NaiveDate;

pub trait DataPort {
    /// Distinct snapshot dates available, ascending.
    fn snapshot_dates(&self) -> Result<Vec<NaiveDate>, AlphaLegionError>;

    /// Every tradable instrument known on `date`, with its
    /// has-fundamental-data flag.
    fn coarse_universe(&self, date: NaiveDate) -> Result<Vec<CoarseEntry>, AlphaLegionError>;

    /// Fundamental records for instruments carrying data on `date`.
    fn fundamentals(&self, date: NaiveDate) -> Result<Vec<FundamentalRecord>, AlphaLegionError>;

    /// Per-step (date, portfolio value, benchmark close) rows, ascending
    /// by date. Empty when no series file is configured.
    fn series(&self) -> Result<Vec<SeriesPoint>, AlphaLegionError>;
}
