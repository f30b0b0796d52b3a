use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A spending limit for one category over a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BudgetPlan {
    #[serde(rename = "UUID")]
    pub uuid: String,
    pub username: String,
    pub category: String,
    pub budget_limit: f64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

