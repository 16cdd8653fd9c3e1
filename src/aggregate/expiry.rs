use chrono::NaiveDate;
use std::fmt;

use crate::amount;
use crate::budgets::Budget;

/// Days before the end date during which a budget counts as ending soon
pub const ENDING_SOON_DAYS: i64 = 7;

/// Where a budget stands relative to its end date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    Expired { days_ago: i64 },
    EndingSoon { days_left: i64 },
    Active { days_left: i64 },
    /// The end date is missing or unparsable
    Unknown,
}

impl Expiry {
    /// Days until the end date; negative once expired
    pub fn days_left(&self) -> Option<i64> {
        match *self {
            Expiry::Expired { days_ago } => Some(-days_ago),
            Expiry::EndingSoon { days_left } | Expiry::Active { days_left } => Some(days_left),
            Expiry::Unknown => None,
        }
    }
}

impl fmt::Display for Expiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expiry::Expired { .. } => write!(f, "expired"),
            Expiry::EndingSoon { .. } => write!(f, "ending-soon"),
            Expiry::Active { .. } => write!(f, "active"),
            Expiry::Unknown => write!(f, "unknown"),
        }
    }
}

/// Classify an end date against `today`
pub fn classify_expiry(end_date: Option<&str>, today: NaiveDate) -> Expiry {
    let Some(end) = end_date.and_then(amount::parse_date) else {
        return Expiry::Unknown;
    };

    let days = (end - today).num_days();
    if days < 0 {
        Expiry::Expired { days_ago: -days }
    } else if days <= ENDING_SOON_DAYS {
        Expiry::EndingSoon { days_left: days }
    } else {
        Expiry::Active { days_left: days }
    }
}

impl Budget {
    /// Expiry of this budget as of `today`
    pub fn expiry(&self, today: NaiveDate) -> Expiry {
        classify_expiry(self.end_date.as_deref(), today)
    }
}
