//! # Money
//!
//! Prices and report totals as whole cents.
//!
//! ```text
//! "9.99"  ──Money::parse──►  999 cents
//! 999 × 3 ──times(3)──────►  2997 cents  ──Display──►  "29.97"
//! ```
//!
//! Summing a month of `f64` totals drifts by cents; integer cents never do.
//! The currency symbol is added by the front end, not here.
//!
//! ```rust
//! use folio_core::money::Money;
//!
//! let price = Money::parse("9.99").unwrap();
//! assert_eq!(price.times(3).to_string(), "29.97");
//! ```

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Amount in cents. Signed so that summaries can hold any total.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Line total for `quantity` copies at this unit price.
    ///
    /// Saturates at the `i64` limits; validated stock and prices never get
    /// near them.
    #[inline]
    pub const fn times(self, quantity: i64) -> Self {
        Money(self.0.saturating_mul(quantity))
    }

    /// Parses a price typed by the operator: `"9.99"`, `"10"`, `"0.5"`.
    ///
    /// Digits with at most one `.` and at most two digits after it. Signs,
    /// exponents and thousands separators are rejected.
    ///
    /// ```rust
    /// use folio_core::money::Money;
    ///
    /// assert_eq!(Money::parse("9.99").unwrap().cents(), 999);
    /// assert_eq!(Money::parse("0.5").unwrap().cents(), 50);
    /// assert!(Money::parse("9.999").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Money, ValidationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::required("price"));
        }

        let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
        let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());

        if !is_digits(whole) || !is_digits(fraction) || (whole.is_empty() && fraction.is_empty()) {
            return Err(ValidationError::invalid_format("price", "not a decimal number"));
        }
        if fraction.len() > 2 {
            return Err(ValidationError::invalid_format("price", "at most two decimal places"));
        }

        let overflow = || ValidationError::invalid_format("price", "amount is too large");

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };
        // Pad so "5" after the point reads as 50 cents
        let fraction: i64 = format!("{:0<2}", fraction).parse().map_err(|_| overflow())?;

        whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(fraction))
            .map(Money)
            .ok_or_else(overflow)
    }
}

/// Plain decimal with two places and no symbol: `29.97`, `-5.50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), Add::add)
    }
}
