//! Report output port trait.

use crate::domain::error::LowtideError;
use crate::domain::report::PerformanceReport;
use std::path::Path;

/// Sink for a computed performance report.
pub trait ReportPort {
    fn write(&self, report: &PerformanceReport, output_path: &Path) -> Result<(), LowtideError>;
}
