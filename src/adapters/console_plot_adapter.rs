//! Console plot adapter: diagnostics and plot points to stderr.

use crate::ports::plot_port::PlotPort;
use chrono::NaiveDate;

#[derive(Debug, Default)]
pub struct ConsolePlotAdapter;

impl PlotPort for ConsolePlotAdapter {
    fn plot(&mut self, chart: &str, series: &str, date: NaiveDate, value: f64) {
        eprintln!("[{}] {} / {}: {:.2}", date, chart, series, value);
    }

    fn debug(&mut self, line: &str) {
        eprintln!("{}", line);
    }
}
