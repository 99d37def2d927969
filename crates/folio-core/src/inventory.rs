//! # Inventory Rules
//!
//! Stock rules shared by the purchase workflow, the update workflow and the
//! low-stock announcement.
//!
//! ## Purchase Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Book (stock=5, price=9.99)  +  quantity=3                              │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  quote_purchase()  ← THIS MODULE                                        │
//! │        │                                                                │
//! │        ├── qty <= 0       ──► ValidationError                           │
//! │        ├── qty > stock    ──► InsufficientStock                         │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  PurchaseQuote { total: 29.97, remaining_stock: 2 }                     │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  folio-db applies it inside one transaction                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::Book;

/// Records with stock strictly below this are reported as low.
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// First line of the low-stock announcement.
pub const LOW_STOCK_HEADLINE: &str = "The following books are getting low in stock";

/// Returns true when the stock level should be announced.
#[inline]
pub const fn is_low_stock(stock: i64) -> bool {
    stock < LOW_STOCK_THRESHOLD
}

/// Units recorded in an UPDATES report row.
///
/// The absolute change in stock, or the new stock when it did not change.
///
/// ## Example
/// ```rust
/// use folio_core::inventory::stock_delta;
///
/// assert_eq!(stock_delta(10, 7), 3);
/// assert_eq!(stock_delta(7, 10), 3);
/// assert_eq!(stock_delta(8, 8), 8);
/// ```
#[inline]
pub const fn stock_delta(old: i64, new: i64) -> i64 {
    if old == new {
        new
    } else {
        (old - new).abs()
    }
}

// =============================================================================
// Purchase Quote
// =============================================================================

/// Priced result of a checked purchase request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseQuote {
    pub serial_number: i64,
    pub quantity: i64,
    pub unit_price: Money,
    pub total: Money,
    pub remaining_stock: i64,
}

impl PurchaseQuote {
    /// True when the sale leaves the book under the low-stock threshold.
    #[inline]
    pub fn leaves_low_stock(&self) -> bool {
        is_low_stock(self.remaining_stock)
    }
}

/// Checks a purchase request against the current record.
pub fn quote_purchase(book: &Book, quantity: i64) -> CoreResult<PurchaseQuote> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        }
        .into());
    }

    if quantity > book.stock {
        return Err(CoreError::InsufficientStock {
            title: book.book_title.clone(),
            available: book.stock,
            requested: quantity,
        });
    }

    let unit_price = book.price();
    Ok(PurchaseQuote {
        serial_number: book.serial_number,
        quantity,
        unit_price,
        total: unit_price.times(quantity),
        remaining_stock: book.stock - quantity,
    })
}

// =============================================================================
// Low Stock Alert
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockLine {
    pub serial_number: i64,
    pub book_title: String,
    pub author_name: String,
    pub stock: i64,
}

/// The books that need restocking, in the order they were given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockAlert {
    pub books: Vec<LowStockLine>,
}

impl LowStockAlert {
    /// Collects the low-stock books. Returns `None` when nothing is low.
    pub fn from_books<'a, I>(books: I) -> Option<LowStockAlert>
    where
        I: IntoIterator<Item = &'a Book>,
    {
        let lines: Vec<LowStockLine> = books
            .into_iter()
            .filter(|b| b.is_low_stock())
            .map(|b| LowStockLine {
                serial_number: b.serial_number,
                book_title: b.book_title.clone(),
                author_name: b.author_name.clone(),
                stock: b.stock,
            })
            .collect();

        if lines.is_empty() {
            None
        } else {
            Some(LowStockAlert { books: lines })
        }
    }

    /// Operator-facing text.
    ///
    /// ```text
    /// The following books are getting low in stock
    /// Dune by Frank Herbert (2 left)
    /// ```
    pub fn message(&self) -> String {
        let mut out = String::from(LOW_STOCK_HEADLINE);
        for line in &self.books {
            out.push('\n');
            out.push_str(&format!(
                "{} by {} ({} left)",
                line.book_title, line.author_name, line.stock
            ));
        }
        out
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
