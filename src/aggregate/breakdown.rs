use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;

use super::{percentage, total, Amounted, Dated};
use crate::budgets::Budget;
use crate::categories::Category;
use crate::expenses::Expense;
use crate::income::Income;

pub const UNCATEGORIZED: &str = "Uncategorized";
pub const NO_BUDGET: &str = "No Budget";
pub const UNKNOWN: &str = "Unknown";

/// One group of a breakdown
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub label: String,
    pub amount: Decimal,
    /// Share of the breakdown total, 0 to 100
    pub percentage: f64,
}

/// A list grouped by a derived key
///
/// Percentages are always taken against `total`, the sum of the very list
/// that was grouped.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Breakdown {
    pub total: Decimal,
    pub buckets: Vec<Bucket>,
}

impl Breakdown {
    /// Group `items` by `key`, keeping buckets in order of first appearance
    pub fn group_by<T, F>(items: &[T], mut key: F) -> Self
    where
        T: Amounted,
        F: FnMut(&T) -> String,
    {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut sums: Vec<(String, Decimal)> = Vec::new();

        for item in items {
            let label = key(item);
            match index.get(&label) {
                Some(&i) => sums[i].1 = sums[i].1.saturating_add(item.amount()),
                None => {
                    index.insert(label.clone(), sums.len());
                    sums.push((label, item.amount()));
                }
            }
        }

        Self::from_sums(total(items), sums)
    }

    fn from_sums(total: Decimal, sums: Vec<(String, Decimal)>) -> Self {
        let buckets = sums
            .into_iter()
            .map(|(label, amount)| Bucket {
                percentage: percentage(amount, total),
                label,
                amount,
            })
            .collect();

        Self { total, buckets }
    }

    /// The bucket with `label`
    pub fn get(&self, label: &str) -> Option<&Bucket> {
        self.buckets.iter().find(|b| b.label == label)
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Buckets ordered from largest to smallest amount
    pub fn largest_first(&self) -> Vec<&Bucket> {
        let mut sorted: Vec<&Bucket> = self.buckets.iter().collect();
        sorted.sort_by(|a, b| b.amount.cmp(&a.amount));
        sorted
    }
}

/// Expenses grouped by category name
pub fn by_category(expenses: &[Expense], categories: &[Category]) -> Breakdown {
    let names: HashMap<&str, &str> = categories
        .iter()
        .map(|c| (c.id.as_str(), c.name.as_str()))
        .collect();

    Breakdown::group_by(expenses, |expense| {
        expense
            .category_id
            .as_deref()
            .and_then(|id| names.get(id))
            .filter(|name| !name.trim().is_empty())
            .map(|name| name.to_string())
            .unwrap_or_else(|| UNCATEGORIZED.to_string())
    })
}

/// Expenses grouped by the budget they were charged to
pub fn by_budget(expenses: &[Expense], budgets: &[Budget]) -> Breakdown {
    let names: HashMap<&str, &str> = budgets
        .iter()
        .map(|b| (b.id.as_str(), b.description.as_str()))
        .collect();

    Breakdown::group_by(expenses, |expense| {
        expense
            .budget_id
            .as_deref()
            .and_then(|id| names.get(id))
            .filter(|name| !name.trim().is_empty())
            .map(|name| name.to_string())
            .unwrap_or_else(|| NO_BUDGET.to_string())
    })
}

/// Income grouped by its source label
pub fn by_source(income: &[Income]) -> Breakdown {
    Breakdown::group_by(income, |entry| {
        let source = entry.source.trim();
        if source.is_empty() {
            UNKNOWN.to_string()
        } else {
            source.to_string()
        }
    })
}

/// Records grouped by calendar month, e.g. "Oct 2026"
///
/// Months are ordered chronologically by the earliest date seen in each;
/// undated records land in a trailing "Unknown" bucket.
pub fn by_month<T: Amounted + Dated>(items: &[T]) -> Breakdown {
    let mut months: HashMap<String, (NaiveDate, Decimal)> = HashMap::new();
    let mut undated: Option<Decimal> = None;

    for item in items {
        match item.date() {
            Some(date) => {
                let entry = months
                    .entry(month_label(date))
                    .or_insert((date, Decimal::ZERO));
                entry.0 = entry.0.min(date);
                entry.1 = entry.1.saturating_add(item.amount());
            }
            None => {
                let sum = undated.get_or_insert(Decimal::ZERO);
                *sum = sum.saturating_add(item.amount());
            }
        }
    }

    let mut dated: Vec<(String, NaiveDate, Decimal)> = months
        .into_iter()
        .map(|(label, (first, amount))| (label, first, amount))
        .collect();
    dated.sort_by_key(|(_, first, _)| *first);

    let mut sums: Vec<(String, Decimal)> = dated
        .into_iter()
        .map(|(label, _, amount)| (label, amount))
        .collect();
    if let Some(amount) = undated {
        sums.push((UNKNOWN.to_string(), amount));
    }

    Breakdown::from_sums(total(items), sums)
}

fn month_label(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}
