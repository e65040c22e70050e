//! Error types for pgfluent

use thiserror::Error;

/// Result type alias for pgfluent operations
pub type FluentResult<T> = Result<T, FluentError>;

/// Errors surfaced while executing built statements.
///
/// Building and rendering never fail; every variant here originates from the
/// execution side (connection setup, the database, transaction control).
#[derive(Debug, Error)]
pub enum FluentError {
    /// Database connection or configuration error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Error reported by the database driver, passed through unmodified
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Transaction control (begin/commit/rollback) failed
    #[error("failed to {action} transaction: {source}")]
    Transaction {
        action: &'static str,
        #[source]
        source: tokio_postgres::Error,
    },

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),
}

impl FluentError {
    pub(crate) fn transaction(action: &'static str, source: tokio_postgres::Error) -> Self {
        Self::Transaction { action, source }
    }

    /// Check if this error came straight from the driver
    pub fn is_query(&self) -> bool {
        matches!(self, Self::Query(_))
    }

    /// The server-side error, if the database rejected the statement.
    pub fn as_db_error(&self) -> Option<&tokio_postgres::error::DbError> {
        match self {
            Self::Query(err) | Self::Transaction { source: err, .. } => err.as_db_error(),
            _ => None,
        }
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for FluentError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}
