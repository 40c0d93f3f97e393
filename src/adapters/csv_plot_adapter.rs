//! CSV plot adapter: buffers plot points and writes them as one file.
//!
//! Output columns: `date,chart,series,value`. Diagnostic lines go to
//! stderr, matching the console adapter.

use crate::domain::error::AlphaLegionError;
use crate::ports::plot_port::PlotPort;
use chrono::NaiveDate;
use std::path::PathBuf;

pub struct CsvPlotAdapter {
    output_path: PathBuf,
    points: Vec<(NaiveDate, String, String, f64)>,
}

impl CsvPlotAdapter {
    pub fn new(output_path: PathBuf) -> Self {
        Self {
            output_path,
            points: Vec::new(),
        }
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Write all buffered points. Call once after the replay finishes.
    pub fn flush(&self) -> Result<(), AlphaLegionError> {
        let mut wtr = csv::Writer::from_path(&self.output_path).map_err(|e| {
            AlphaLegionError::Data {
                reason: format!("failed to open {}: {}", self.output_path.display(), e),
            }
        })?;

        wtr.write_record(["date", "chart", "series", "value"])
            .map_err(|e| AlphaLegionError::Data {
                reason: format!("CSV write error: {}", e),
            })?;
        for (date, chart, series, value) in &self.points {
            wtr.write_record([
                date.to_string(),
                chart.clone(),
                series.clone(),
                value.to_string(),
            ])
            .map_err(|e| AlphaLegionError::Data {
                reason: format!("CSV write error: {}", e),
            })?;
        }
        wtr.flush().map_err(|e| AlphaLegionError::Data {
            reason: format!("CSV write error: {}", e),
        })?;
        Ok(())
    }
}

impl PlotPort for CsvPlotAdapter {
    fn plot(&mut self, chart: &str, series: &str, date: NaiveDate, value: f64) {
        self.points
            .push((date, chart.to_string(), series.to_string(), value));
    }

    fn debug(&mut self, line: &str) {
        eprintln!("{}", line);
    }
}
