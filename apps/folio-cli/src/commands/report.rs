//! # Report Command
//!
//! Lists report rows for a date range, summarises them and optionally
//! exports them.
//!
//! ## Report Flow
//! ```text
//! folio report --from 2024-03-01 --to 2024-03-31 --type sales --export pdf --out m.pdf
//!      │
//!      ▼
//! parse_date_bound: from = 2024-03-01 00:00:00 local
//!                   to   = 2024-03-31 23:59:59 local
//!      │
//!      ▼
//! ReportFilter::new (rejects from > to)
//!      │
//!      ▼
//! db.reports().list(&filter)  ── rows in [from, to], SALES only
//!      │
//!      ├── no rows ──► "There's nothing to report at the moment", no file
//!      │
//!      ▼
//! ReportSummary + export_report(Pdf, m.pdf)
//! ```

use std::path::PathBuf;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use folio_core::report::report_heading;
use folio_core::{ReportEntry, ReportFilter, ReportSummary, TransactionType, ValidationError};
use serde::Serialize;
use tracing::{debug, info};

use crate::cli::ReportArgs;
use crate::error::AppError;
use crate::export::{export_report, ReportDocument};
use crate::state::AppState;

/// Which end of a calendar day a date-only bound stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayBound {
    /// 00:00:00 local time
    Start,
    /// 23:59:59 local time
    End,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportDto {
    pub heading: String,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub transaction_type: TransactionType,
    pub entries: Vec<ReportEntry>,
    pub summary: ReportSummary,
    /// Set when a file was written
    pub exported_to: Option<PathBuf>,
}

impl ReportDto {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub async fn report(state: &AppState, args: &ReportArgs) -> Result<ReportDto, AppError> {
    let from = parse_date_bound("from", &args.from, DayBound::Start)?;
    let to = parse_date_bound("to", &args.to, DayBound::End)?;
    let filter = ReportFilter::new(from, to, args.transaction_type)?;

    debug!(%from, %to, kind = %args.transaction_type, "report command");
    let entries = state.db().reports().list(&filter).await?;
    let summary = ReportSummary::from_entries(&entries);
    let heading = report_heading(args.transaction_type);

    let exported_to = match (args.export, &args.out) {
        (Some(format), Some(path)) if !entries.is_empty() => {
            let document = ReportDocument {
                heading: heading.clone(),
                subtitle: subtitle(&state.config().store_name, from, to),
                entries: &entries,
            };
            export_report(format, &document, path)?;
            Some(path.clone())
        }
        (Some(_), Some(path)) => {
            info!(path = %path.display(), "Empty report, nothing exported");
            None
        }
        _ => None,
    };

    Ok(ReportDto {
        heading,
        from,
        to,
        transaction_type: args.transaction_type,
        entries,
        summary,
        exported_to,
    })
}

/// "Folio Books, 2024-03-01 to 2024-03-31" in local dates.
pub(crate) fn subtitle(store_name: &str, from: DateTime<Utc>, to: DateTime<Utc>) -> String {
    format!(
        "{}, {} to {}",
        store_name,
        from.with_timezone(&Local).format("%Y-%m-%d"),
        to.with_timezone(&Local).format("%Y-%m-%d")
    )
}

/// Parses a date given on the command line.
///
/// Accepts an RFC 3339 instant, or a `YYYY-MM-DD` day in local time which
/// stands for the start or the end of that day.
///
/// ## Example
/// ```text
/// "2024-03-31", DayBound::End    ──► 2024-03-31 23:59:59 local, as UTC
/// "2024-03-31T12:00:00Z", _      ──► exactly that instant
/// ```
pub fn parse_date_bound(
    field: &str,
    text: &str,
    bound: DayBound,
) -> Result<DateTime<Utc>, ValidationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Ok(instant.with_timezone(&Utc));
    }

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: reason.to_string(),
    };

    let day = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| invalid("expected YYYY-MM-DD or an RFC 3339 timestamp"))?;

    let (hour, minute, second) = match bound {
        DayBound::Start => (0, 0, 0),
        DayBound::End => (23, 59, 59),
    };
    let naive = day
        .and_hms_opt(hour, minute, second)
        .ok_or_else(|| invalid("time of day out of range"))?;

    let local = match bound {
        DayBound::Start => Local.from_local_datetime(&naive).earliest(),
        DayBound::End => Local.from_local_datetime(&naive).latest(),
    };

    local
        .map(|at| at.with_timezone(&Utc))
        .ok_or_else(|| invalid(&format!("{} does not exist in local time", naive)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::AddArgs;
    use crate::commands::{book, purchase};
    use crate::error::ErrorCode;
    use crate::export::ExportFormat;
    use crate::state::AppConfig;
    use folio_db::{Database, DbConfig};

    async fn test_state() -> AppState {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        AppState::new(db, AppConfig::default())
    }

    fn report_args(kind: TransactionType) -> ReportArgs {
        let today = Local::now().format("%Y-%m-%d").to_string();
        ReportArgs {
            from: today.clone(),
            to: today,
            transaction_type: kind,
            export: None,
            out: None,
        }
    }

    async fn stock_and_sell(state: &AppState) {
        let added = book::add(
            state,
            &AddArgs {
                title: "Things Fall Apart".to_string(),
                author: "Chinua Achebe".to_string(),
                publisher: "Heinemann".to_string(),
                location: "Shelf B".to_string(),
                stock: "10".to_string(),
                price: "9.99".to_string(),
                date: None,
                cover: None,
            },
        )
        .await
        .unwrap();
        purchase::buy(state, added.book.serial_number, "3").await.unwrap();
        purchase::buy(state, added.book.serial_number, "2").await.unwrap();
    }

    #[test]
    fn test_parse_rfc3339() {
        let at = parse_date_bound("from", "2024-03-05T10:15:00+02:00", DayBound::Start).unwrap();
        assert_eq!(at, Utc.with_ymd_and_hms(2024, 3, 5, 8, 15, 0).unwrap());
    }

    #[test]
    fn test_parse_day_bounds_cover_whole_day() {
        let start = parse_date_bound("from", "2024-03-05", DayBound::Start).unwrap();
        let end = parse_date_bound("to", "2024-03-05", DayBound::End).unwrap();

        let local_start = start.with_timezone(&Local);
        let local_end = end.with_timezone(&Local);
        assert_eq!(local_start.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-03-05 00:00:00");
        assert_eq!(local_end.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-03-05 23:59:59");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_date_bound("from", "", DayBound::Start),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            parse_date_bound("from", "05/03/2024", DayBound::Start),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(parse_date_bound("to", "2024-02-30", DayBound::End).is_err());
    }

    #[tokio::test]
    async fn test_sales_report_filters_type() {
        let state = test_state().await;
        stock_and_sell(&state).await;

        let sales = report(&state, &report_args(TransactionType::Sales)).await.unwrap();
        assert_eq!(sales.heading, "Bookshop Report (Sales)");
        assert_eq!(sales.entries.len(), 2);
        assert!(sales
            .entries
            .iter()
            .all(|e| e.transaction_type == TransactionType::Sales));
        assert_eq!(sales.summary.sales_revenue.cents(), 4995);

        let all = report(&state, &report_args(TransactionType::All)).await.unwrap();
        assert_eq!(all.entries.len(), 3);
        assert_eq!(all.heading, "Bookshop Report (All transactions)");
    }

    #[tokio::test]
    async fn test_reversed_range_is_rejected() {
        let state = test_state().await;
        let mut args = report_args(TransactionType::All);
        args.from = "2024-03-31".to_string();
        args.to = "2024-03-01".to_string();

        let err = report(&state, &args).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_export_writes_file() {
        let state = test_state().await;
        stock_and_sell(&state).await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.csv");

        let mut args = report_args(TransactionType::Sales);
        args.export = Some(ExportFormat::Csv);
        args.out = Some(path.clone());

        let result = report(&state, &args).await.unwrap();
        assert_eq!(result.exported_to, Some(path.clone()));

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().nth(1).unwrap().starts_with("Things Fall Apart,Chinua Achebe,3,9.99,29.97,"));
    }

    #[tokio::test]
    async fn test_empty_report_writes_no_file() {
        let state = test_state().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.pdf");

        let mut args = report_args(TransactionType::Deletions);
        args.export = Some(ExportFormat::Pdf);
        args.out = Some(path.clone());

        let result = report(&state, &args).await.unwrap();
        assert!(result.is_empty());
        assert_eq!(result.exported_to, None);
        assert!(!path.exists());
    }
}
