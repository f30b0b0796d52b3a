use crate::{BudgetPlan, Transaction};
use serde::{Deserialize, Serialize};

/// Every transaction and budget plan across all users, used for bulk export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FinanceSnapshot {
    #[serde(rename = "Transaction")]
    pub transactions: Vec<Transaction>,
    #[serde(rename = "BudgetPlan")]
    pub budget_plans: Vec<BudgetPlan>,
}

impl FinanceSnapshot {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty() && self.budget_plans.is_empty()
    }
}
