//! Facade crate for the finance data-access layer.
//! Re-exports the shared primitives and wires storage, records and the vault from one
//! [`AppConfig`]. Keep this crate thin: it composes other crates, it does not implement
//! business logic.
//!
//! ## Usage
//! ```rust,no_run
//! # async fn run() -> Result<(), finman::FinmanError> {
//! let app = finman::Finman::load(Some("finman.toml")).await?;
//!
//! let plans = app.records().fetch_user_budget_plans("bob").await?;
//! let sealed = app.vault().seal(b"note")?;
//! # let _ = (plans, sealed);
//! # Ok(())
//! # }
//! ```

use std::borrow::Cow;
use std::path::Path;
use std::time::Duration;

pub use finman_database as database;
pub use finman_domain as domain;
pub use finman_kernel as kernel;
pub use finman_logger as logger;
pub use finman_records as records;
pub use finman_vault as vault;

use finman_database::{Database, DatabaseError};
use finman_domain::config::AppConfig;
use finman_kernel::config::{ConfigError, load_app_config};
use finman_logger::{Logger, LoggerError};
use finman_records::{RecordStore, RecordsError};
use finman_vault::{KeyProvider, Vault, VaultError};
use tracing::info;

/// Errors surfaced while assembling or using the facade.
#[derive(Debug, thiserror::Error)]
pub enum FinmanError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Logger(#[from] LoggerError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Records(#[from] RecordsError),

    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: Cow<'static, str> },
}

/// Initialized services sharing one configuration.
#[derive(Debug, Clone)]
pub struct Finman {
    config: AppConfig,
    records: RecordStore<Database>,
    vault: Vault,
}

impl Finman {
    /// Loads configuration from `path` (or `finman.*` in the working directory) and initializes.
    ///
    /// # Errors
    /// See [`load_app_config`] and [`Finman::init`].
    pub async fn load(path: Option<impl AsRef<Path>>) -> Result<Self, FinmanError> {
        let config = load_app_config(path)?;
        Self::init(&config).await
    }

    /// Resolves keys, connects to the database and builds the record store.
    ///
    /// Keys are resolved first, so a missing `AES_ENCRYPTION_KEY` or `HMAC_KEY` fails before any
    /// connection is opened.
    ///
    /// # Errors
    /// * [`FinmanError::Vault`] if either key is missing or unusable.
    /// * [`FinmanError::InvalidConfiguration`] if the query timeout is zero.
    /// * [`FinmanError::Database`] if the connection or schema bootstrap fails.
    pub async fn init(config: &AppConfig) -> Result<Self, FinmanError> {
        let keys = KeyProvider::resolve(&config.security)?;
        let vault = Vault::new(&keys)?;

        if config.database.query_timeout_secs == 0 {
            return Err(FinmanError::InvalidConfiguration {
                message: "database.query_timeout_secs must be greater than zero".into(),
            });
        }
        let timeout = Duration::from_secs(config.database.query_timeout_secs);

        let database = Database::connect(&config.database).await?;
        let records = RecordStore::new(database).with_timeout(timeout);

        info!(
            url = %config.database.url,
            database = %config.database.database,
            ?timeout,
            "Finance data layer ready"
        );
        Ok(Self { config: config.clone(), records, vault })
    }

    /// Installs the global logger described by the `logging` section.
    ///
    /// # Errors
    /// See [`Logger::from_config`].
    pub fn init_logging(config: &AppConfig) -> Result<Logger, FinmanError> {
        Ok(Logger::from_config(&config.logging)?)
    }

    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub const fn records(&self) -> &RecordStore<Database> {
        &self.records
    }

    #[must_use]
    pub const fn vault(&self) -> &Vault {
        &self.vault
    }

    #[must_use]
    pub fn database(&self) -> &Database {
        self.records.store()
    }
}
