//! Plain-text report file adapter.

use crate::domain::error::LowtideError;
use crate::domain::report::PerformanceReport;
use crate::ports::report_port::ReportPort;
use std::fs;
use std::path::Path;

pub struct TextReportAdapter;

impl ReportPort for TextReportAdapter {
    fn write(&self, report: &PerformanceReport, output_path: &Path) -> Result<(), LowtideError> {
        let mut text = report.to_string();
        text.push('\n');
        fs::write(output_path, text)?;
        Ok(())
    }
}
