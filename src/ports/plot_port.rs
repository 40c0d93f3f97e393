//! Plot and diagnostic output port trait.
//!
//! Re-expresses the host platform's Plot/Debug surface so domain code
//! can emit chart points and diagnostic lines without knowing the sink.

use chrono::NaiveDate;

pub trait PlotPort {
    /// Record one point on a named series of a named chart.
    fn plot(&mut self, chart: &str, series: &str, date: NaiveDate, value: f64);

    /// Emit one write-only diagnostic line.
    fn debug(&mut self, line: &str);
}
