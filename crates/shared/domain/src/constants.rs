//! Collection and field names as they appear in the document store.

/// Collection holding [`crate::User`] documents.
pub const USERS: &str = "Users";
/// Collection holding [`crate::Transaction`] documents.
pub const TRANSACTIONS: &str = "Transaction";
/// Collection holding [`crate::BudgetPlan`] documents.
pub const BUDGET_PLANS: &str = "BudgetPlan";

/// Owner field shared by every record kind.
pub const USERNAME_FIELD: &str = "Username";

/// Legacy environment variable carrying the symmetric encryption key.
pub const ENCRYPTION_KEY_ENV: &str = "AES_ENCRYPTION_KEY";
/// Legacy environment variable carrying the MAC key.
pub const MAC_KEY_ENV: &str = "HMAC_KEY";
