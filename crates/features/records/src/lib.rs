//! Record store feature slice: user accounts, transactions and budget plans.
//!
//! [`RecordStore`] works over any [`DocumentStore`]; in production that is the SurrealDB-backed
//! [`finman_database::Database`]. Reads of per-user financial data are bounded by a timeout
//! (5 seconds unless overridden) and cancelled when it expires.
//!
//! ```rust,no_run
//! use finman_database::Database;
//! use finman_records::{RecordStore, RecordsError};
//!
//! # async fn run() -> Result<(), RecordsError> {
//! let db = Database::builder().url("mem://").session("finman", "financeManagerDB").init().await?;
//! let records = RecordStore::new(db);
//!
//! let transactions = records.fetch_user_transactions("bob").await?;
//! let snapshot = records.fetch_collections().await?;
//! # let _ = (transactions, snapshot);
//! # Ok(())
//! # }
//! ```

mod error;

pub use error::{RecordsError, RecordsErrorExt};

use finman_database::{DatabaseError, DocumentStore, Filter};
use finman_domain::constants::{BUDGET_PLANS, TRANSACTIONS, USERNAME_FIELD, USERS};
use finman_domain::{BudgetPlan, FinanceSnapshot, Transaction, User};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Upper bound for deadline-bounded reads unless configured otherwise.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Repository operations over the `Users`, `Transaction` and `BudgetPlan` collections.
#[derive(Debug, Clone)]
pub struct RecordStore<S> {
    store: S,
    timeout: Duration,
}

impl<S: DocumentStore> RecordStore<S> {
    pub const fn new(store: S) -> Self {
        Self { store, timeout: DEFAULT_QUERY_TIMEOUT }
    }

    /// Overrides the bound applied to per-user reads.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Every user document, in storage order.
    #[instrument(skip(self), err)]
    pub async fn fetch_all_users(&self) -> Result<Vec<User>, RecordsError> {
        let users: Vec<User> =
            self.store.find(USERS, &Filter::All).await.context("Fetching all users")?;
        info!(count = users.len(), "Fetched users");
        Ok(users)
    }

    #[instrument(skip(self), err)]
    pub async fn fetch_user(&self, username: &str) -> Result<User, RecordsError> {
        self.store
            .find_one(USERS, &by_username(username))
            .await
            .context("Fetching user")?
            .ok_or_else(|| RecordsError::NotFound {
                message: format!("No user named '{username}'").into(),
                context: Some(USERS.into()),
            })
    }

    /// Stores a new user, refusing duplicates by username.
    ///
    /// # Errors
    /// * [`RecordsError::AlreadyExists`] if the username is taken, whether detected by the
    ///   pre-insert lookup or by the storage-level unique index.
    /// * [`RecordsError::Backend`] if the lookup or the insert fails otherwise.
    #[instrument(skip(self, user), fields(username = %user.username), err)]
    pub async fn create_user(&self, user: &User) -> Result<(), RecordsError> {
        let existing: Option<User> = self
            .store
            .find_one(USERS, &by_username(&user.username))
            .await
            .context("Checking for an existing user")?;
        if existing.is_some() {
            return Err(already_exists(&user.username));
        }

        match self.store.insert_one(USERS, user).await {
            Ok(()) => {
                info!("User created");
                Ok(())
            },
            Err(DatabaseError::Conflict { .. }) => {
                warn!("Username claimed by a concurrent insert");
                Err(already_exists(&user.username))
            },
            Err(e) => Err(e).context("Inserting user"),
        }
    }

    #[instrument(skip(self), err)]
    pub async fn delete_user(&self, username: &str) -> Result<(), RecordsError> {
        let deleted =
            self.store.delete_one(USERS, &by_username(username)).await.context("Deleting user")?;
        if deleted == 0 {
            return Err(RecordsError::NotFound {
                message: format!("No user named '{username}'").into(),
                context: Some("Nothing deleted".into()),
            });
        }

        info!(deleted, "User deleted");
        Ok(())
    }

    /// Transactions owned by `username`, bounded by [`RecordStore::timeout`].
    #[instrument(skip(self), err)]
    pub async fn fetch_user_transactions(
        &self,
        username: &str,
    ) -> Result<Vec<Transaction>, RecordsError> {
        let transactions: Vec<Transaction> =
            self.bounded(TRANSACTIONS, &by_username(username)).await?;
        info!(count = transactions.len(), "Fetched transactions");
        Ok(transactions)
    }

    /// Budget plans owned by `username`, bounded by [`RecordStore::timeout`].
    #[instrument(skip(self), err)]
    pub async fn fetch_user_budget_plans(
        &self,
        username: &str,
    ) -> Result<Vec<BudgetPlan>, RecordsError> {
        let plans: Vec<BudgetPlan> = self.bounded(BUDGET_PLANS, &by_username(username)).await?;
        info!(count = plans.len(), "Fetched budget plans");
        Ok(plans)
    }

    /// All transactions and budget plans, fetched concurrently. Fails as a whole if either
    /// read fails.
    #[instrument(skip(self), err)]
    pub async fn fetch_collections(&self) -> Result<FinanceSnapshot, RecordsError> {
        let (transactions, budget_plans) = tokio::try_join!(
            async {
                self.store
                    .find::<Transaction>(TRANSACTIONS, &Filter::All)
                    .await
                    .context("Fetching transactions")
            },
            async {
                self.store
                    .find::<BudgetPlan>(BUDGET_PLANS, &Filter::All)
                    .await
                    .context("Fetching budget plans")
            },
        )?;

        info!(
            transactions = transactions.len(),
            budget_plans = budget_plans.len(),
            "Fetched collections"
        );
        Ok(FinanceSnapshot { transactions, budget_plans })
    }

    async fn bounded<T>(
        &self,
        collection: &'static str,
        filter: &Filter,
    ) -> Result<Vec<T>, RecordsError>
    where
        T: DeserializeOwned + Send,
    {
        match tokio::time::timeout(self.timeout, self.store.find::<T>(collection, filter)).await {
            Ok(found) => found.context(format!("Fetching {collection}")),
            Err(_) => {
                debug!(collection, timeout = ?self.timeout, "Query cancelled");
                Err(RecordsError::Timeout {
                    elapsed: self.timeout,
                    context: Some(collection.into()),
                })
            },
        }
    }
}

fn by_username(username: &str) -> Filter {
    Filter::eq(USERNAME_FIELD, username)
}

fn already_exists(username: &str) -> RecordsError {
    RecordsError::AlreadyExists {
        message: format!("Username '{username}' is taken").into(),
        context: Some(USERS.into()),
    }
}
