use crate::error::DatabaseError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::fmt;

/// Selects documents within a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Every document in the collection.
    All,
    /// Documents whose top-level `field` equals `value`.
    Eq { field: Cow<'static, str>, value: String },
}

impl Filter {
    /// Shorthand for [`Filter::Eq`].
    pub fn eq(field: impl Into<Cow<'static, str>>, value: impl Into<String>) -> Self {
        Self::Eq { field: field.into(), value: value.into() }
    }

    /// Checks that the filter field is a plain identifier, so it can be spliced into a query.
    ///
    /// # Errors
    /// * [`DatabaseError::Validation`] for empty names or names with anything but ASCII
    ///   letters, digits and underscores (or a leading digit).
    pub fn validate(&self) -> Result<(), DatabaseError> {
        let Self::Eq { field, .. } = self else { return Ok(()) };

        let mut chars = field.chars();
        let valid_head = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        if valid_head && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            Ok(())
        } else {
            Err(DatabaseError::Validation {
                message: format!("Invalid filter field '{field}'").into(),
                context: Some("Filter fields must be plain identifiers".into()),
            })
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("*"),
            Self::Eq { field, value } => write!(f, "{field} = {value:?}"),
        }
    }
}

/// Minimal document-store capability: find, find one, insert, delete.
///
/// Collections hold schemaless documents; `T` decides how they are decoded. Implementations
/// carry no deadlines of their own, callers bound them by dropping the returned future.
pub trait DocumentStore: Send + Sync {
    fn find<T>(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> impl Future<Output = Result<Vec<T>, DatabaseError>> + Send
    where
        T: DeserializeOwned + Send;

    fn find_one<T>(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> impl Future<Output = Result<Option<T>, DatabaseError>> + Send
    where
        T: DeserializeOwned + Send;

    /// Stores `document` as a new entry.
    ///
    /// # Errors
    /// * [`DatabaseError::Conflict`] if a unique index rejects it.
    fn insert_one<T>(
        &self,
        collection: &str,
        document: &T,
    ) -> impl Future<Output = Result<(), DatabaseError>> + Send
    where
        T: Serialize + Sync;

    /// Removes at most one matching document and returns how many were removed.
    fn delete_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> impl Future<Output = Result<u64, DatabaseError>> + Send;
}
