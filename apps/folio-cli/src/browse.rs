//! # Browse Loop
//!
//! Steps through search results one record at a time, with purchase and
//! delete available on the record being shown.
//!
//! ```text
//! #3  Emma
//!     Jane Austen, John Murray
//!     ...
//! [2/5] n)ext p)revious b)uy <qty> d)elete q)uit >
//! ```
//!
//! Failed actions (bad quantity, not enough stock) are reported and the
//! loop carries on. Delete asks for a `y` before anything is removed.

use std::io::{BufRead, Write};

use folio_core::validation::{parse_quantity, validate_search_term};
use folio_core::{Book, RecordCursor};
use serde::Serialize;
use tracing::{debug, info};

use crate::cli::SearchArgs;
use crate::commands::book::BookDto;
use crate::commands::low_stock_alert;
use crate::error::AppError;
use crate::render::Render;
use crate::state::AppState;

/// What happened during one browse session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BrowseSummary {
    /// Distinct records shown
    pub viewed: usize,
    pub units_sold: i64,
    pub deleted: usize,
}

#[derive(Debug, PartialEq, Eq)]
enum Action {
    Next,
    Previous,
    Buy(String),
    Delete,
    Quit,
    Unknown(String),
}

impl Action {
    fn parse(line: &str) -> Action {
        let mut parts = line.split_whitespace();
        let verb = parts.next().unwrap_or("").to_ascii_lowercase();
        let rest: Vec<&str> = parts.collect();

        match verb.as_str() {
            "n" | "next" | "" => Action::Next,
            "p" | "prev" | "previous" => Action::Previous,
            "b" | "buy" => Action::Buy(rest.join(" ")),
            "d" | "delete" => Action::Delete,
            "q" | "quit" | "exit" => Action::Quit,
            _ => Action::Unknown(line.trim().to_string()),
        }
    }
}

/// Runs the pager until `q` or end of input.
pub async fn browse<R, W>(
    state: &AppState,
    args: &SearchArgs,
    mut input: R,
    mut out: W,
) -> Result<BrowseSummary, AppError>
where
    R: BufRead,
    W: Write,
{
    let title = validate_search_term("title", &args.title)?;
    let author = validate_search_term("author", &args.author)?;
    let limit = state.config().limit(args.limit);
    let books = state.db().books().search(&title, &author, limit).await?;
    let mut cursor = RecordCursor::new(books);
    let mut summary = BrowseSummary::default();
    let mut seen: Vec<i64> = Vec::new();
    let config = state.config();

    if cursor.is_empty() {
        writeln!(out, "No books found")?;
        return Ok(summary);
    }

    info!(records = cursor.len(), "Browse started");

    loop {
        let Some(current) = cursor.current().cloned() else {
            writeln!(out, "No more records")?;
            break;
        };
        if !seen.contains(&current.serial_number) {
            seen.push(current.serial_number);
        }

        writeln!(out, "{}", BookDto::from(current.clone()).render(config))?;
        write!(
            out,
            "[{}/{}] n)ext p)revious b)uy <qty> d)elete q)uit > ",
            cursor.position().unwrap_or(0),
            cursor.len()
        )?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }

        let action = Action::parse(&line);
        debug!(?action, serial = current.serial_number, "Browse action");

        match action {
            Action::Next => {
                if !cursor.next() {
                    writeln!(out, "Already at the last record")?;
                }
            }
            Action::Previous => {
                if !cursor.previous() {
                    writeln!(out, "Already at the first record")?;
                }
            }
            Action::Buy(quantity) => {
                match sell(state, current.serial_number, &quantity).await {
                    Ok((updated, message)) => {
                        summary.units_sold += current.stock - updated.stock;
                        cursor.replace_current(updated);
                        writeln!(out, "{}", message)?;
                    }
                    Err(e) => writeln!(out, "{}", e.message)?,
                }
            }
            Action::Delete if !confirm_delete(&mut input, &mut out, &current)? => {
                writeln!(out, "Kept {}", current.book_title)?;
            }
            Action::Delete => match state.db().books().delete(current.serial_number).await {
                Ok(removed) => {
                    cursor.remove_current();
                    summary.deleted += 1;
                    writeln!(out, "Deleted {}", removed.book_title)?;
                    if let Some(alert) = low_stock_alert(state.db()).await? {
                        writeln!(out, "{}", alert.message())?;
                    }
                }
                Err(e) => writeln!(out, "{}", AppError::from(e).message)?,
            },
            Action::Quit => break,
            Action::Unknown(text) => writeln!(out, "Unknown command: {}", text)?,
        }
        writeln!(out)?;
    }

    summary.viewed = seen.len();
    info!(
        viewed = summary.viewed,
        units_sold = summary.units_sold,
        deleted = summary.deleted,
        "Browse finished"
    );
    Ok(summary)
}

/// Asks before deleting. Only `y` or `yes` confirms; end of input declines.
fn confirm_delete<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    book: &Book,
) -> Result<bool, AppError> {
    write!(out, "Delete {} by {}? [y/N] ", book.book_title, book.author_name)?;
    out.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        writeln!(out)?;
        return Ok(false);
    }
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Sells from the current record. Returns the updated record and the
/// text to show (sale line plus any low-stock alert).
async fn sell(state: &AppState, serial: i64, quantity: &str) -> Result<(Book, String), AppError> {
    let quantity = parse_quantity(quantity)?;
    let outcome = state.db().books().purchase(serial, quantity).await?;

    let mut message = format!(
        "Sold {} x {} for {}, {} left",
        outcome.quote.quantity,
        outcome.book.book_title,
        state.config().format_currency(outcome.quote.total.cents()),
        outcome.book.stock
    );
    if let Some(alert) = low_stock_alert(state.db()).await? {
        message.push('\n');
        message.push_str(&alert.message());
    }
    Ok((outcome.book, message))
}
