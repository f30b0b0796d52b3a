use finman_database::DatabaseError;
use std::borrow::Cow;
use std::time::Duration;

/// A specialized [`RecordsError`] enum of this crate.
#[finman_derive::finman_error]
pub enum RecordsError {
    /// No record matched the lookup.
    #[error("Not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A record with the same key is already stored.
    #[error("Already exists{}: {message}", format_context(.context))]
    AlreadyExists { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A deadline-bounded read did not finish in time.
    #[error("Timed out after {elapsed:?}{}", format_context(.context))]
    Timeout { elapsed: Duration, context: Option<Cow<'static, str>> },

    /// The underlying document store failed.
    #[error("Storage error{}: {source}", format_context(.context))]
    Backend {
        #[source]
        source: DatabaseError,
        context: Option<Cow<'static, str>>,
    },
}

impl RecordsError {
    /// `true` for [`RecordsError::NotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
