//! # Database Infrastructure
//!
//! This crate provides a unified interface for initializing and managing [SurrealDB](https://surrealdb.com)
//! connections, and exposes them through the [`DocumentStore`] capability used by the records layer.
//!
//! ## Key Features
//! - **Engine Agnostic**: Supports `mem://`, `ws://`, and `http://` via the `any` engine.
//! - **Resilient Connectivity**: Built-in retry logic for health checks during engine startup.
//! - **Builder Pattern**: Fluent API for configuring connections and authentication.
//! - **Schema Bootstrap**: Idempotently defines the finman collections and indexes on connect.
//!
//! ## Example
//!
//! ```rust
//! use finman_database::{Database, DatabaseError, DocumentStore, Filter};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! #[serde(rename_all = "PascalCase")]
//! struct Note {
//!     username: String,
//!     text: String,
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), DatabaseError> {
//!     let db = Database::builder()
//!         .url("mem://")
//!         .session("finman", "financeManagerDB")
//!         .init()
//!         .await?;
//!
//!     db.insert_one("Notes", &Note { username: "ada".into(), text: "hi".into() }).await?;
//!     let notes: Vec<Note> = db.find("Notes", &Filter::eq("Username", "ada")).await?;
//!     assert_eq!(notes.len(), 1);
//!
//!     Ok(())
//! }
//! ```

mod error;
mod schema;
mod store;

pub use error::{DatabaseError, DatabaseErrorExt};
pub use store::{DocumentStore, Filter};

use finman_domain::config::DatabaseConfig;
use schema::SchemaRunner;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;
use surrealdb::Surreal;
use surrealdb::engine::any::{Any, connect};
use surrealdb::opt::auth::Root;
use tracing::{info, instrument, trace, warn};

/// Inner state of the [`Database`] wrapper.
#[derive(Debug)]
pub struct DatabaseInner {
    instance: Surreal<Any>,
    ns: String,
    db: String,
}

impl Drop for DatabaseInner {
    fn drop(&mut self) {
        info!(ns = %self.ns, db = %self.db, "SurrealDB session handle dropped");
    }
}

/// `SurrealDB` client wrapper that provides thread-safety and contextual error handling.
#[derive(Debug, Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
}

impl Database {
    /// Creates a new [`DatabaseBuilder`].
    pub fn builder() -> DatabaseBuilder {
        DatabaseBuilder::new()
    }

    /// Connects using a [`DatabaseConfig`].
    ///
    /// # Errors
    /// See [`DatabaseBuilder::init`].
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let mut builder =
            Self::builder().url(&config.url).session(&config.namespace, &config.database);
        if let Some(credentials) = &config.credentials {
            builder = builder.auth(&credentials.username, &credentials.password);
        }
        builder.init().await
    }

    /// Namespace this handle is bound to.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.inner.ns
    }

    /// Database name this handle is bound to.
    #[must_use]
    pub fn database(&self) -> &str {
        &self.inner.db
    }
}

impl Deref for Database {
    type Target = Surreal<Any>;

    fn deref(&self) -> &Self::Target {
        &self.inner.instance
    }
}

/// A fluent builder for configuring and establishing a `SurrealDB` connection.
///
/// This builder ensures that fundamental parameters like the connection URL,
/// namespace, and database name are provided upfront.
#[must_use = "builders do nothing unless you call .init()"]
#[derive(Default)]
pub struct DatabaseBuilder {
    url: Option<String>,
    ns: Option<String>,
    db: Option<String>,
    auth: Option<(String, String)>,
}

impl std::fmt::Debug for DatabaseBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseBuilder")
            .field("url", &self.url)
            .field("ns", &self.ns)
            .field("db", &self.db)
            .field("auth", &self.auth.as_ref().map(|(user, _)| user))
            .finish()
    }
}

impl DatabaseBuilder {
    /// Creates a new [`DatabaseBuilder`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the connection URL.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the namespace and database name.
    pub fn session(mut self, namespace: impl Into<String>, database: impl Into<String>) -> Self {
        self.ns = Some(namespace.into());
        self.db = Some(database.into());
        self
    }

    /// Add root credentials to the connection.
    pub fn auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some((username.into(), password.into()));
        self
    }

    /// Consumes the builder and attempts to establish a connection to the database.
    ///
    /// # Process
    /// 1. **Validation**: Ensures URL, Namespace, and Database name are provided.
    /// 2. **Engine Initialization**: Connects to the underlying `SurrealDB` engine (Any).
    /// 3. **Resilience**: Performs up to 3 health checks. If a check fails, it retries with
    ///    exponential backoff (starting at 500ms).
    /// 4. **Authentication**: If credentials were provided via [`Self::auth`], signs in as Root.
    /// 5. **Session Activation**: Sets the namespace and database for the connection.
    /// 6. **Schema**: Defines the finman collections and indexes if they are missing.
    ///
    /// # Errors
    /// * [`DatabaseError::Validation`] if required parameters are missing.
    /// * [`DatabaseError::Connection`] if the engine fails to start or remains unhealthy.
    /// * [`DatabaseError::Auth`] if the provided credentials are rejected.
    /// * [`DatabaseError::Surreal`] if the session activation (`use_ns`/`use_db`) fails.
    /// * [`DatabaseError::Schema`] if the schema bootstrap is rejected.
    #[instrument(skip(self), fields(url = self.url, ns = self.ns, db = self.db))]
    pub async fn init(self) -> Result<Database, DatabaseError> {
        let url = self.url.ok_or(DatabaseError::Validation {
            message: "URL is required".into(),
            context: None,
        })?;
        let ns = self.ns.ok_or(DatabaseError::Validation {
            message: "Namespace is required".into(),
            context: None,
        })?;
        let db = self.db.ok_or(DatabaseError::Validation {
            message: "Database is required".into(),
            context: None,
        })?;

        let instance = connect(&url).await.map_err(|e| DatabaseError::Connection {
            message: e.to_string().into(),
            context: Some("Initializing engine".into()),
        })?;

        let mut delay = Duration::from_millis(500);
        for attempt in 1..=3 {
            if instance.health().await.is_ok() {
                break;
            }
            if attempt == 3 {
                return Err(DatabaseError::Connection {
                    message: "Unhealthy after retries".into(),
                    context: Some(url.into()),
                });
            }
            warn!(attempt, ?delay, "Database not ready, retrying...");
            tokio::time::sleep(delay).await;
            delay *= 2;
        }

        if let Some((username, password)) = &self.auth {
            instance.signin(Root { username, password }).await.map_err(|e| {
                DatabaseError::Auth { message: e.to_string().into(), context: Some(url.into()) }
            })?;
        }

        instance.use_ns(&ns).use_db(&db).await.context("Activating session")?;

        let version =
            instance.version().await.map_or_else(|_| "unknown".to_owned(), |v| v.to_string());
        info!(namespace = %ns, database = %db, %version, "SurrealDB connection established");

        let steps = SchemaRunner::new(instance.clone()).run().await?;
        trace!(steps, "Schema bootstrap finished");

        Ok(Database { inner: Arc::new(DatabaseInner { instance, ns, db }) })
    }
}

const DOCUMENTS: &str = "* OMIT id";
const RECORD_IDS: &str = "VALUE id";

/// Selects matching documents, with `$table` and `$value` bound.
fn select_query(
    projection: &str,
    filter: &Filter,
    limit: Option<u32>,
) -> Result<String, DatabaseError> {
    filter.validate()?;
    let mut query = format!("SELECT {projection} FROM type::table($table)");
    if let Filter::Eq { field, .. } = filter {
        query.push_str(&format!(" WHERE {field} = $value"));
    }
    if let Some(limit) = limit {
        query.push_str(&format!(" LIMIT {limit}"));
    }
    Ok(query)
}

fn filter_value(filter: &Filter) -> Option<String> {
    match filter {
        Filter::All => None,
        Filter::Eq { value, .. } => Some(value.clone()),
    }
}

/// Attempts made by [`Database::insert_one`] when commits keep hitting write conflicts.
const WRITE_ATTEMPTS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteFailure {
    /// A unique index or record key already holds the value.
    Duplicate,
    /// The commit lost an optimistic read/write conflict and may be replayed.
    Retryable,
    Other,
}

fn classify(error: &surrealdb::Error) -> WriteFailure {
    use surrealdb::error::{Api, Db};

    match error {
        surrealdb::Error::Db(Db::IndexExists { .. } | Db::TxKeyAlreadyExists) => {
            WriteFailure::Duplicate
        },
        surrealdb::Error::Db(Db::TxRetryable) => WriteFailure::Retryable,
        // Remote engines only carry the rendered server error.
        surrealdb::Error::Api(Api::Query(message)) if message.contains("already contains") => {
            WriteFailure::Duplicate
        },
        surrealdb::Error::Api(Api::Query(message)) if message.contains("can be retried") => {
            WriteFailure::Retryable
        },
        _ => WriteFailure::Other,
    }
}

impl DocumentStore for Database {
    #[instrument(skip(self, filter), fields(%filter), err)]
    async fn find<T>(&self, collection: &str, filter: &Filter) -> Result<Vec<T>, DatabaseError>
    where
        T: DeserializeOwned + Send,
    {
        let query = select_query(DOCUMENTS, filter, None)?;
        let documents = self
            .query(query)
            .bind(("table", collection.to_owned()))
            .bind(("value", filter_value(filter)))
            .await
            .context(format!("Querying {collection}"))?
            .take::<Vec<T>>(0)
            .context(format!("Decoding {collection} documents"))?;

        trace!(count = documents.len(), "Documents fetched");
        Ok(documents)
    }

    #[instrument(skip(self, filter), fields(%filter), err)]
    async fn find_one<T>(&self, collection: &str, filter: &Filter) -> Result<Option<T>, DatabaseError>
    where
        T: DeserializeOwned + Send,
    {
        let query = select_query(DOCUMENTS, filter, Some(1))?;
        let mut documents = self
            .query(query)
            .bind(("table", collection.to_owned()))
            .bind(("value", filter_value(filter)))
            .await
            .context(format!("Querying {collection}"))?
            .take::<Vec<T>>(0)
            .context(format!("Decoding {collection} document"))?;

        Ok(documents.pop())
    }

    #[instrument(skip(self, document), err)]
    async fn insert_one<T>(&self, collection: &str, document: &T) -> Result<(), DatabaseError>
    where
        T: Serialize + Sync,
    {
        let content = serde_json::to_value(document).context(format!("Encoding {collection} document"))?;

        let mut delay = Duration::from_millis(10);
        let mut attempt = 1;
        loop {
            let outcome = match self
                .query("CREATE type::table($table) CONTENT $document RETURN NONE")
                .bind(("table", collection.to_owned()))
                .bind(("document", content.clone()))
                .await
            {
                Ok(response) => response.check().map(drop),
                Err(e) => Err(e),
            };
            let Err(e) = outcome else {
                return Ok(());
            };

            match classify(&e) {
                WriteFailure::Duplicate => {
                    return Err(DatabaseError::Conflict {
                        message: e.to_string().into(),
                        context: Some(format!("Inserting into {collection}").into()),
                    });
                },
                WriteFailure::Retryable if attempt < WRITE_ATTEMPTS => {
                    warn!(attempt, ?delay, "Write conflict, retrying insert");
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                    attempt += 1;
                },
                _ => {
                    return Err(DatabaseError::Surreal {
                        source: e,
                        context: Some(format!("Inserting into {collection}").into()),
                    });
                },
            }
        }
    }

    #[instrument(skip(self, filter), fields(%filter), err)]
    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64, DatabaseError> {
        let select = select_query(RECORD_IDS, filter, Some(1))?;
        let query = format!(
            "LET $ids = ({select});
            LET $deleted = (DELETE $ids RETURN BEFORE);
            RETURN array::len($deleted);"
        );

        let deleted = self
            .query(query)
            .bind(("table", collection.to_owned()))
            .bind(("value", filter_value(filter)))
            .await
            .context(format!("Deleting from {collection}"))?
            .take::<Option<u64>>(2)
            .context(format!("Counting deleted {collection} documents"))?
            .unwrap_or_default();

        trace!(deleted, "Documents deleted");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_query_shapes() {
        assert_eq!(
            select_query(DOCUMENTS, &Filter::All, None).unwrap(),
            "SELECT * OMIT id FROM type::table($table)"
        );
        assert_eq!(
            select_query(RECORD_IDS, &Filter::eq("Username", "x"), Some(1)).unwrap(),
            "SELECT VALUE id FROM type::table($table) WHERE Username = $value LIMIT 1"
        );
        assert!(select_query(DOCUMENTS, &Filter::eq("bad field", "x"), None).is_err());
    }

    #[test]
    fn test_classify_write_failures() {
        use surrealdb::error::{Api, Db};

        assert_eq!(classify(&Db::TxRetryable.into()), WriteFailure::Retryable);
        assert_eq!(classify(&Db::TxKeyAlreadyExists.into()), WriteFailure::Duplicate);
        assert_eq!(
            classify(&Api::Query("Database index `users_username` already contains 'x'".into()).into()),
            WriteFailure::Duplicate
        );
        assert_eq!(classify(&Api::Query("Parse error".into()).into()), WriteFailure::Other);
    }

    #[test]
    fn test_builder_debug_hides_password() {
        let builder = Database::builder().auth("root", "hunter2");
        let rendered = format!("{builder:?}");
        assert!(rendered.contains("root"));
        assert!(!rendered.contains("hunter2"));
    }
}
