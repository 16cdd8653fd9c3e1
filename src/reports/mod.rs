//! Budget report generation and CSV export

use chrono::NaiveDate;
use reqwest::Method;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amount;
use crate::error::{Error, Result};
use crate::fields;
use crate::SpendTrack;

/// Request body of `/report/createReport`
#[derive(Debug, Clone, Serialize)]
pub struct ReportRequest {
    pub user_id: String,
    pub budget_id: String,
}

/// Income and expense totals over a budget's lifetime
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BudgetReport {
    #[serde(default, alias = "startDate", deserialize_with = "fields::date")]
    pub start_date: Option<String>,

    #[serde(default, alias = "endDate", deserialize_with = "fields::date")]
    pub end_date: Option<String>,

    #[serde(default, alias = "totalIncome", deserialize_with = "amount::deserialize")]
    pub total_income: Decimal,

    #[serde(default, alias = "totalExpenses", deserialize_with = "amount::deserialize")]
    pub total_expenses: Decimal,

    #[serde(default, deserialize_with = "amount::deserialize")]
    pub balance: Decimal,
}

impl BudgetReport {
    /// Two-column CSV export of the report
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(Vec::new());

        let rows = [
            ["Budget Report".to_string(), String::new()],
            ["Start Date".to_string(), self.start_date.clone().unwrap_or_default()],
            ["End Date".to_string(), self.end_date.clone().unwrap_or_default()],
            ["Total Income".to_string(), amount::display(self.total_income)],
            ["Total Expenses".to_string(), amount::display(self.total_expenses)],
            ["Balance".to_string(), amount::display(self.balance)],
        ];

        for row in &rows {
            writer.write_record(row)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|err| Error::Export(err.into_error().into()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Suggested file name for the export
    pub fn file_name(budget_id: &str, today: NaiveDate) -> String {
        format!("budget-report-{}-{}.csv", budget_id, today.format("%Y-%m-%d"))
    }
}

/// Accessor for report endpoints
pub struct Reports<'a> {
    client: &'a SpendTrack,
}

impl<'a> Reports<'a> {
    pub(crate) fn new(client: &'a SpendTrack) -> Self {
        Self { client }
    }

    /// Generate the report of one budget
    pub async fn create(&self, request: &ReportRequest) -> Result<BudgetReport> {
        if request.budget_id.trim().is_empty() {
            return Err(Error::validation("Please select a budget"));
        }
        self.client
            .request(Method::POST, "/report/createReport")
            .json(request)?
            .execute()
            .await
    }
}
