//! # Report Aggregation
//!
//! Summaries over a slice of report rows, printed under a report listing and
//! embedded in the JSON output.
//!
//! ```text
//! Bookshop Report (Sales)
//! ───────────────────────
//!   Sales      3 rows    7 units    69.93
//!   revenue                         69.93
//! ```

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{ReportEntry, TransactionType};

/// Title printed above a report and at the top of exported files.
pub fn report_heading(kind: TransactionType) -> String {
    format!("Bookshop Report ({})", kind.heading())
}

/// Message shown instead of an empty report.
pub const EMPTY_REPORT_MESSAGE: &str = "There's nothing to report at the moment";

/// Totals for one transaction kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeTotals {
    pub transaction_type: TransactionType,
    /// Number of report rows.
    pub entries: usize,
    /// Sum of the `stock` column.
    pub units: i64,
    /// Sum of the `total` column.
    pub value: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub entry_count: usize,
    /// One line per kind that occurs, in code order.
    pub by_type: Vec<TypeTotals>,
    /// Sum of SALES totals.
    pub sales_revenue: Money,
}

impl ReportSummary {
    pub fn from_entries(entries: &[ReportEntry]) -> ReportSummary {
        let by_type: Vec<TypeTotals> = TransactionType::RECORDED
            .iter()
            .filter_map(|&kind| {
                let rows: Vec<&ReportEntry> = entries
                    .iter()
                    .filter(|e| e.transaction_type == kind)
                    .collect();
                if rows.is_empty() {
                    return None;
                }
                Some(TypeTotals {
                    transaction_type: kind,
                    entries: rows.len(),
                    units: rows.iter().fold(0i64, |n, e| n.saturating_add(e.stock)),
                    value: rows.iter().map(|e| e.total()).sum(),
                })
            })
            .collect();

        let sales_revenue = by_type
            .iter()
            .find(|t| t.transaction_type == TransactionType::Sales)
            .map_or(Money::zero(), |t| t.value);

        ReportSummary {
            entry_count: entries.len(),
            by_type,
            sales_revenue,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }

    /// Totals for one kind, if any rows of it were summarised.
    pub fn totals_for(&self, kind: TransactionType) -> Option<&TypeTotals> {
        self.by_type.iter().find(|t| t.transaction_type == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(kind: TransactionType, stock: i64, total_cents: i64) -> ReportEntry {
        ReportEntry {
            serial_number: 0,
            book_title: "Dune".to_string(),
            author_name: "Frank Herbert".to_string(),
            stock,
            price_cents: 999,
            total_cents,
            date_performed: Utc::now(),
            transaction_type: kind,
        }
    }

    #[test]
    fn test_summary_groups_by_type() {
        let entries = vec![
            entry(TransactionType::Additions, 10, 9990),
            entry(TransactionType::Sales, 3, 2997),
            entry(TransactionType::Sales, 1, 999),
            entry(TransactionType::Updates, 2, 0),
        ];
        let summary = ReportSummary::from_entries(&entries);

        assert_eq!(summary.entry_count, 4);
        assert_eq!(summary.by_type.len(), 3);
        assert_eq!(summary.by_type[0].transaction_type, TransactionType::Sales);
        assert_eq!(summary.sales_revenue.cents(), 3996);

        let sales = summary.totals_for(TransactionType::Sales).unwrap();
        assert_eq!(sales.entries, 2);
        assert_eq!(sales.units, 4);
        assert!(summary.totals_for(TransactionType::Deletions).is_none());
    }

    #[test]
    fn test_empty_summary() {
        let summary = ReportSummary::from_entries(&[]);
        assert!(summary.is_empty());
        assert!(summary.sales_revenue.is_zero());
    }

    #[test]
    fn test_heading() {
        assert_eq!(report_heading(TransactionType::Sales), "Bookshop Report (Sales)");
        assert_eq!(
            report_heading(TransactionType::All),
            "Bookshop Report (All transactions)"
        );
    }
}
