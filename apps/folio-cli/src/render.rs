//! # Output Rendering
//!
//! Turns command results into terminal text, or JSON with `--json`.
//!
//! ```text
//! #12  Dune
//!      Frank Herbert, Chilton Books
//!      Stock: 3 (low)   Price: $9.99   Location: Shelf A
//!      Added: 2024-03-05 14:30   Cover: no
//! ```

use std::io::Write;

use folio_core::report::EMPTY_REPORT_MESSAGE;
use folio_core::LowStockAlert;
use serde::Serialize;

use crate::browse::BrowseSummary;
use crate::commands::book::{AddResult, BookDto, BookList, DeleteResult, LowStockReport, UpdateResult};
use crate::commands::purchase::PurchaseResult;
use crate::commands::report::{subtitle, ReportDto};
use crate::commands::session::SessionMessage;
use crate::error::AppError;
use crate::export::display_date;
use crate::state::AppConfig;

/// Human-readable form of a command result.
pub trait Render {
    fn render(&self, config: &AppConfig) -> String;
}

/// Writes `value` to `out` as text or pretty JSON.
pub fn emit<T, W>(value: &T, json: bool, config: &AppConfig, out: &mut W) -> Result<(), AppError>
where
    T: Serialize + Render,
    W: Write,
{
    if json {
        serde_json::to_writer_pretty(&mut *out, value)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}", value.render(config))?;
    }
    Ok(())
}

// =============================================================================
// Books
// =============================================================================

impl Render for BookDto {
    fn render(&self, config: &AppConfig) -> String {
        format!(
            "#{}  {}\n     {}, {}\n     Stock: {}{}   Price: {}   Location: {}\n     Added: {}   Cover: {}",
            self.serial_number,
            self.book_title,
            self.author_name,
            self.publisher,
            self.stock,
            if self.low_stock { " (low)" } else { "" },
            config.format_currency(self.price_cents),
            self.location,
            display_date(self.date_time),
            if self.has_cover { "yes" } else { "no" },
        )
    }
}

impl Render for BookList {
    fn render(&self, config: &AppConfig) -> String {
        if self.books.is_empty() {
            return "No books found".to_string();
        }

        let mut out = format!(
            "{:>6}  {:<30}  {:<22}  {:>5}  {:>10}  {}",
            "Serial", "Title", "Author", "Stock", "Price", "Location"
        );
        for book in &self.books {
            out.push('\n');
            out.push_str(&format!(
                "{:>6}  {:<30}  {:<22}  {:>5}  {:>10}  {}",
                book.serial_number,
                clip(&book.book_title, 30),
                clip(&book.author_name, 22),
                book.stock,
                config.format_currency(book.price_cents),
                book.location,
            ));
        }
        out.push_str(&format!("\n{} book(s)", self.books.len()));
        out
    }
}

impl Render for AddResult {
    fn render(&self, config: &AppConfig) -> String {
        with_alert(
            format!("Added book:\n{}", self.book.render(config)),
            &self.low_stock,
        )
    }
}

impl Render for UpdateResult {
    fn render(&self, config: &AppConfig) -> String {
        let mut text = format!("Updated book:\n{}", self.after.render(config));
        if self.before.stock != self.after.stock {
            text.push_str(&format!(
                "\nStock changed from {} to {} ({} units)",
                self.before.stock, self.after.stock, self.stock_delta
            ));
        }
        with_alert(text, &self.low_stock)
    }
}

impl Render for DeleteResult {
    fn render(&self, _config: &AppConfig) -> String {
        with_alert(
            format!(
                "Deleted #{} {} by {} ({} in stock)",
                self.removed.serial_number,
                self.removed.book_title,
                self.removed.author_name,
                self.removed.stock
            ),
            &self.low_stock,
        )
    }
}

impl Render for PurchaseResult {
    fn render(&self, config: &AppConfig) -> String {
        with_alert(
            format!(
                "Sold {} x {} at {} for {}, {} left",
                self.quantity,
                self.book.book_title,
                config.format_currency(self.unit_price_cents),
                config.format_currency(self.total_cents),
                self.book.stock
            ),
            &self.low_stock,
        )
    }
}

impl Render for LowStockReport {
    fn render(&self, _config: &AppConfig) -> String {
        match &self.alert {
            Some(alert) => alert.message(),
            None => "No books are low in stock".to_string(),
        }
    }
}

impl Render for SessionMessage {
    fn render(&self, _config: &AppConfig) -> String {
        self.message.clone()
    }
}

fn with_alert(mut text: String, alert: &Option<LowStockAlert>) -> String {
    if let Some(alert) = alert {
        text.push_str("\n\n");
        text.push_str(&alert.message());
    }
    text
}

// =============================================================================
// Reports
// =============================================================================

impl Render for ReportDto {
    fn render(&self, config: &AppConfig) -> String {
        if self.is_empty() {
            return EMPTY_REPORT_MESSAGE.to_string();
        }

        let mut out = format!(
            "{}\n{}\n\n{:<30}  {:<22}  {:>8}  {:>10}  {:>10}  {:<11}  {}",
            self.heading,
            subtitle(&config.store_name, self.from, self.to),
            "Title",
            "Author",
            "Quantity",
            "Price",
            "Total",
            "Transaction",
            "Date"
        );

        for entry in &self.entries {
            out.push_str(&format!(
                "\n{:<30}  {:<22}  {:>8}  {:>10}  {:>10}  {:<11}  {}",
                clip(&entry.book_title, 30),
                clip(&entry.author_name, 22),
                entry.stock,
                config.format_currency(entry.price_cents),
                config.format_currency(entry.total_cents),
                entry.transaction_type.label(),
                display_date(entry.date_performed),
            ));
        }

        out.push('\n');
        for totals in &self.summary.by_type {
            out.push_str(&format!(
                "\n{:<12} {:>4} row(s)  {:>6} units  {:>12}",
                totals.transaction_type.label(),
                totals.entries,
                totals.units,
                config.format_currency(totals.value.cents()),
            ));
        }
        if !self.summary.sales_revenue.is_zero() {
            out.push_str(&format!(
                "\nSales revenue: {}",
                config.format_currency(self.summary.sales_revenue.cents())
            ));
        }

        if let Some(path) = &self.exported_to {
            out.push_str(&format!("\n\nExported to {}", path.display()));
        }
        out
    }
}

impl Render for BrowseSummary {
    fn render(&self, _config: &AppConfig) -> String {
        format!(
            "Viewed {} record(s), sold {} copies, deleted {} record(s)",
            self.viewed, self.units_sold, self.deleted
        )
    }
}

/// Shortens `value` to `width` characters, marking the cut with "..".
pub(crate) fn clip(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let kept: String = value.chars().take(width.saturating_sub(2)).collect();
        format!("{}..", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use folio_core::inventory::LowStockLine;
    use folio_core::{ReportEntry, ReportSummary, TransactionType};

    fn book(stock: i64) -> BookDto {
        BookDto {
            serial_number: 12,
            book_title: "Dune".to_string(),
            author_name: "Frank Herbert".to_string(),
            publisher: "Chilton Books".to_string(),
            date_time: Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap(),
            stock,
            price: "9.99".to_string(),
            price_cents: 999,
            location: "Shelf A".to_string(),
            has_cover: false,
            low_stock: stock < 5,
        }
    }

    #[test]
    fn test_book_card() {
        let text = book(3).render(&AppConfig::default());
        assert!(text.starts_with("#12  Dune\n     Frank Herbert, Chilton Books"));
        assert!(text.contains("Stock: 3 (low)   Price: $9.99   Location: Shelf A"));
    }

    #[test]
    fn test_purchase_with_alert() {
        let result = PurchaseResult {
            book: book(2),
            quantity: 3,
            unit_price_cents: 999,
            total_cents: 2997,
            low_stock: Some(LowStockAlert {
                books: vec![LowStockLine {
                    serial_number: 12,
                    book_title: "Dune".to_string(),
                    author_name: "Frank Herbert".to_string(),
                    stock: 2,
                }],
            }),
        };

        let text = result.render(&AppConfig::default());
        assert_eq!(
            text,
            "Sold 3 x Dune at $9.99 for $29.97, 2 left\n\n\
             The following books are getting low in stock\n\
             Dune by Frank Herbert (2 left)"
        );
    }

    #[test]
    fn test_empty_report_message() {
        let now = Utc::now();
        let dto = ReportDto {
            heading: "Bookshop Report (Sales)".to_string(),
            from: now,
            to: now,
            transaction_type: TransactionType::Sales,
            entries: vec![],
            summary: ReportSummary::from_entries(&[]),
            exported_to: None,
        };
        assert_eq!(dto.render(&AppConfig::default()), EMPTY_REPORT_MESSAGE);
    }

    #[test]
    fn test_report_lists_rows_and_revenue() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap();
        let entries = vec![ReportEntry {
            serial_number: 1,
            book_title: "Dune".to_string(),
            author_name: "Frank Herbert".to_string(),
            stock: 3,
            price_cents: 999,
            total_cents: 2997,
            date_performed: at,
            transaction_type: TransactionType::Sales,
        }];
        let dto = ReportDto {
            heading: "Bookshop Report (Sales)".to_string(),
            from: at,
            to: at,
            transaction_type: TransactionType::Sales,
            summary: ReportSummary::from_entries(&entries),
            entries,
            exported_to: None,
        };

        let text = dto.render(&AppConfig::default());
        assert!(text.starts_with("Bookshop Report (Sales)\nFolio Books, "));
        assert!(text.contains("$29.97"));
        assert!(text.ends_with("Sales revenue: $29.97"));
    }

    #[test]
    fn test_emit_json() {
        let mut out = Vec::new();
        emit(&book(7), true, &AppConfig::default(), &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["serial_number"], 12);
        assert_eq!(value["price"], "9.99");
        assert_eq!(value["low_stock"], false);
    }
}
