//! CSV attachment

use std::io::Write;

use ::csv::Writer;
use tempfile::NamedTempFile;

use crate::error::Result;
use crate::models::{format_amount, CostReport};

/// Column names of the attachment
pub const CSV_HEADER: [&str; 2] = ["Time", "Cost"];

/// Writes a report as `Time,Cost` rows
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter;

impl CsvExporter {
    /// Create a new exporter
    pub fn new() -> Self {
        Self
    }

    /// Write the header and one row per record
    pub fn write<W: Write>(&self, report: &CostReport, writer: W) -> Result<()> {
        let mut wtr = Writer::from_writer(writer);

        wtr.write_record(CSV_HEADER)?;
        for record in report.records() {
            wtr.write_record([record.date.as_str(), format_amount(record.cost).as_str()])?;
        }

        wtr.flush()?;
        Ok(())
    }

    /// Write the report to a fresh temporary file, removed when dropped
    pub fn to_temp_file(&self, report: &CostReport) -> Result<NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix("cost_data")
            .suffix(".csv")
            .tempfile()?;

        self.write(report, file.as_file_mut())?;
        Ok(file)
    }
}
