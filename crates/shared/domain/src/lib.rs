//! # Domain Models
//!
//! Record types persisted by the finance data-access layer, plus the configuration models
//! shared across services. Keep it lean: no I/O, networking, or heavy logic, just data and
//! simple helpers.
//!
//! Persisted field names are PascalCase (`Username`, `Amount`, `IsRecurring`, ...) and must
//! stay that way for compatibility with stored documents.

pub mod budget;
pub mod config;
pub mod constants;
pub mod snapshot;
pub mod transaction;
pub mod user;

pub use budget::BudgetPlan;
pub use snapshot::FinanceSnapshot;
pub use transaction::Transaction;
pub use user::User;
