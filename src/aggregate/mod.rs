//! Summary figures derived from raw record lists
//!
//! Everything here is pure and total: no I/O (except [`track_budget`], which
//! fetches the spending it then folds), no mutation of inputs, and empty
//! input yields zero or empty results.

mod breakdown;
mod dashboard;
mod expiry;
mod progress;

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::amount;
use crate::budgets::Budget;
use crate::expenses::Expense;
use crate::income::Income;

pub use breakdown::*;
pub use dashboard::*;
pub use expiry::*;
pub use progress::*;

/// A record carrying a monetary amount
pub trait Amounted {
    fn amount(&self) -> Decimal;
}

/// A record carrying a calendar date
pub trait Dated {
    /// The raw date as sent by the backend
    fn raw_date(&self) -> Option<&str>;

    /// The parsed date, `None` when missing or unparsable
    fn date(&self) -> Option<NaiveDate> {
        self.raw_date().and_then(amount::parse_date)
    }
}

impl Amounted for Budget {
    fn amount(&self) -> Decimal {
        self.amount
    }
}

impl Amounted for Expense {
    fn amount(&self) -> Decimal {
        self.amount
    }
}

impl Amounted for Income {
    fn amount(&self) -> Decimal {
        self.amount
    }
}

impl Dated for Expense {
    fn raw_date(&self) -> Option<&str> {
        self.date.as_deref()
    }
}

impl Dated for Income {
    fn raw_date(&self) -> Option<&str> {
        self.date.as_deref()
    }
}

/// Sum of the amounts of `items`
pub fn total<T: Amounted>(items: &[T]) -> Decimal {
    sum(items.iter().map(Amounted::amount))
}

/// Sum of `amounts`, saturating at the bounds of [`Decimal`]
pub fn sum<I: IntoIterator<Item = Decimal>>(amounts: I) -> Decimal {
    amounts
        .into_iter()
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// `part` as a percentage of `whole`; zero when `whole` is not positive
pub fn percentage(part: Decimal, whole: Decimal) -> f64 {
    if whole <= Decimal::ZERO {
        return 0.0;
    }
    match part.checked_div(whole) {
        Some(ratio) => ratio
            .saturating_mul(Decimal::ONE_HUNDRED)
            .to_f64()
            .unwrap_or(0.0),
        // quotient beyond Decimal range
        None => match (part.to_f64(), whole.to_f64()) {
            (Some(part), Some(whole)) => part / whole * 100.0,
            _ => 0.0,
        },
    }
}
