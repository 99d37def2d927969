//! # Purchase Command
//!
//! Sells copies of one record.
//!
//! ## User Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  folio buy 12 3                                                 │
//! │           │                                                     │
//! │           ▼                                                     │
//! │  parse_quantity("3")  ── not a whole number > 0 ──► rejected    │
//! │           │                                                     │
//! │           ▼                                                     │
//! │  db.books().purchase(12, 3)                                     │
//! │     ├── 3 > stock ──► InsufficientStock, stock unchanged        │
//! │     └── stock -= 3, SALES row (3 × price), one transaction      │
//! │           │                                                     │
//! │           ▼                                                     │
//! │  "Sold 3 × Dune for $29.97, 2 left" + low-stock alert           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use folio_core::validation::parse_quantity;
use folio_core::LowStockAlert;
use serde::Serialize;
use tracing::debug;

use super::book::BookDto;
use super::low_stock_alert;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct PurchaseResult {
    /// The record after the sale
    pub book: BookDto,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub total_cents: i64,
    pub low_stock: Option<LowStockAlert>,
}

pub async fn buy(state: &AppState, serial: i64, quantity: &str) -> Result<PurchaseResult, AppError> {
    let quantity = parse_quantity(quantity)?;
    debug!(serial, quantity, "buy command");

    let outcome = state.db().books().purchase(serial, quantity).await?;

    Ok(PurchaseResult {
        quantity: outcome.quote.quantity,
        unit_price_cents: outcome.quote.unit_price.cents(),
        total_cents: outcome.quote.total.cents(),
        book: BookDto::from(outcome.book),
        low_stock: low_stock_alert(state.db()).await?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::AddArgs;
    use crate::commands::book;
    use crate::error::ErrorCode;
    use crate::state::AppConfig;
    use folio_core::TransactionType;
    use folio_db::{Database, DbConfig};

    async fn state_with_book(stock: &str) -> (AppState, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let state = AppState::new(db, AppConfig::default());
        let added = book::add(
            &state,
            &AddArgs {
                title: "Dune".to_string(),
                author: "Frank Herbert".to_string(),
                publisher: "Chilton Books".to_string(),
                location: "Window".to_string(),
                stock: stock.to_string(),
                price: "9.99".to_string(),
                date: None,
                cover: None,
            },
        )
        .await
        .unwrap();
        (state, added.book.serial_number)
    }

    #[tokio::test]
    async fn test_buy_decrements_and_logs_sale() {
        let (state, serial) = state_with_book("10").await;

        let result = buy(&state, serial, "3").await.unwrap();
        assert_eq!(result.book.stock, 7);
        assert_eq!(result.total_cents, 2997);
        assert!(result.low_stock.is_none());

        let sales: Vec<_> = state
            .db()
            .reports()
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .filter(|r| r.transaction_type == TransactionType::Sales)
            .collect();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].stock, 3);
        assert_eq!(sales[0].total_cents, 2997);
    }

    #[tokio::test]
    async fn test_buy_more_than_stock_is_rejected() {
        let (state, serial) = state_with_book("2").await;

        let err = buy(&state, serial, "3").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);

        let book = state.db().books().get(serial).await.unwrap().unwrap();
        assert_eq!(book.stock, 2);
        assert_eq!(state.db().reports().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_buy_rejects_bad_quantity() {
        let (state, serial) = state_with_book("6").await;

        for quantity in ["0", "-2", "two", ""] {
            let err = buy(&state, serial, quantity).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationError, "quantity={quantity:?}");
        }

        let err = buy(&state, 999, "1").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_buy_announces_low_stock() {
        let (state, serial) = state_with_book("6").await;

        let result = buy(&state, serial, "2").await.unwrap();
        assert_eq!(result.book.stock, 4);
        assert!(result.book.low_stock);
        assert_eq!(result.low_stock.unwrap().books[0].stock, 4);
    }
}
