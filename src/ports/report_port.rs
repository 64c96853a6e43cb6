//! Report rendering port trait.

use crate::domain::error::JournalError;
use crate::domain::weekly_report::WeeklyReport;
use std::io::Write;

/// Port for presenting a weekly report.
pub trait ReportPort {
    fn render(&self, report: &WeeklyReport) -> String;

    /// Default implementation: writes the rendered text as-is.
    fn write(&self, report: &WeeklyReport, out: &mut dyn Write) -> Result<(), JournalError> {
        out.write_all(self.render(report).as_bytes())?;
        Ok(())
    }
}
