//! # Report Export
//!
//! Writes a report listing to disk.
//!
//! ```text
//! report --export csv --out march.csv
//!        │
//!        ▼
//! ReportDocument { heading, subtitle, entries }
//!        │
//!        ├── Csv ──► csv::Writer   one row per report row
//!        └── Pdf ──► lopdf          A4 pages, table paginated
//! ```
//!
//! Callers never export an empty report; the command prints the
//! "nothing to report" message instead and no file is created.

mod csv;
mod pdf;

use std::path::Path;

use chrono::{DateTime, Local, Utc};
use clap::ValueEnum;
use folio_core::ReportEntry;
use serde::Serialize;
use tracing::info;

use crate::error::AppError;

/// File formats understood by `report --export`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Pdf,
}

/// Everything an exporter needs to lay out a report.
#[derive(Debug, Clone)]
pub struct ReportDocument<'a> {
    /// "Bookshop Report (Sales)"
    pub heading: String,
    /// Store name and date range
    pub subtitle: String,
    pub entries: &'a [ReportEntry],
}

/// Writes `document` to `path` in the requested format.
pub fn export_report(
    format: ExportFormat,
    document: &ReportDocument<'_>,
    path: &Path,
) -> Result<(), AppError> {
    match format {
        ExportFormat::Csv => csv::write_csv(document.entries, path)?,
        ExportFormat::Pdf => pdf::write_pdf(document, path)?,
    }

    info!(
        ?format,
        path = %path.display(),
        rows = document.entries.len(),
        "Report exported"
    );
    Ok(())
}

/// Local wall-clock rendering used in printed and PDF reports.
pub(crate) fn display_date(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}
