//! Transactions a builder can be attached to.
//!
//! ```ignore
//! use pgfluent::{Builder, Transaction, FluentResult};
//!
//! # async fn demo(client: &mut tokio_postgres::Client) -> FluentResult<()> {
//! let tx = Transaction::begin(client).await?;
//! {
//!     let mut b = Builder::new();
//!     b.with_transaction(&tx)
//!         .insert("users", ["name", "email"])
//!         .values(["alice", "alice@example.com"]);
//!     b.prepare(&tx).execute().await?;
//! }
//! tx.commit().await?;
//! # Ok(()) }
//! ```

use crate::client::GenericClient;
use crate::error::{FluentError, FluentResult};
use std::fmt;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Row, Statement};

/// Runs the given block inside a database transaction.
///
/// - Begins a [`Transaction`] on `$client` (a `&mut tokio_postgres::Client`).
/// - Commits on `Ok(_)`.
/// - Rolls back on `Err(_)`.
///
/// The block must evaluate to `pgfluent::FluentResult<T>`.
#[macro_export]
macro_rules! transaction {
    ($client:expr, $tx:ident, $body:block) => {
        $crate::transaction!($client, $tx, $crate::TransactionOptions::new(), $body)
    };
    ($client:expr, $tx:ident, $opts:expr, $body:block) => {{
        let $tx = $crate::Transaction::begin_with($client, $opts).await?;

        let __pgfluent_tx_result = async { $body }.await;
        $tx.finish(__pgfluent_tx_result).await
    }};
}

/// Transaction isolation level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionIsolation {
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl From<TransactionIsolation> for tokio_postgres::IsolationLevel {
    fn from(level: TransactionIsolation) -> Self {
        match level {
            TransactionIsolation::ReadUncommitted => Self::ReadUncommitted,
            TransactionIsolation::ReadCommitted => Self::ReadCommitted,
            TransactionIsolation::RepeatableRead => Self::RepeatableRead,
            TransactionIsolation::Serializable => Self::Serializable,
        }
    }
}

/// Options for starting a transaction. Unset fields use the server default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionOptions {
    pub isolation: Option<TransactionIsolation>,
    pub read_only: Option<bool>,
    pub deferrable: Option<bool>,
}

impl TransactionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn isolation_level(mut self, level: TransactionIsolation) -> Self {
        self.isolation = Some(level);
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = Some(read_only);
        self
    }

    /// Only meaningful for `SERIALIZABLE READ ONLY` transactions.
    pub fn deferrable(mut self, deferrable: bool) -> Self {
        self.deferrable = Some(deferrable);
        self
    }
}

/// An open database transaction.
///
/// Commit or roll back explicitly; dropping an unfinished transaction rolls
/// it back (the driver's behavior) and logs a warning.
pub struct Transaction<'c> {
    inner: tokio_postgres::Transaction<'c>,
    guard: FinishGuard,
}

/// Warns on drop unless the owning transaction was finished.
#[derive(Debug)]
struct FinishGuard {
    armed: bool,
}

impl FinishGuard {
    fn new() -> Self {
        Self { armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for FinishGuard {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!(
                target: "pgfluent.tx",
                "transaction dropped without commit or rollback; rolling back",
            );
        }
    }
}

impl<'c> Transaction<'c> {
    /// Begin a transaction with server defaults.
    pub async fn begin(client: &'c mut tokio_postgres::Client) -> FluentResult<Self> {
        Self::begin_with(client, TransactionOptions::new()).await
    }

    /// Begin a transaction with explicit options.
    pub async fn begin_with(
        client: &'c mut tokio_postgres::Client,
        opts: TransactionOptions,
    ) -> FluentResult<Self> {
        let mut builder = client.build_transaction();
        if let Some(level) = opts.isolation {
            builder = builder.isolation_level(level.into());
        }
        if let Some(read_only) = opts.read_only {
            builder = builder.read_only(read_only);
        }
        if let Some(deferrable) = opts.deferrable {
            builder = builder.deferrable(deferrable);
        }

        let inner = builder
            .start()
            .await
            .map_err(|e| FluentError::transaction("begin", e))?;
        tracing::debug!(target: "pgfluent.tx", ?opts, "transaction started");
        Ok(Self {
            inner,
            guard: FinishGuard::new(),
        })
    }

    /// Commit the transaction.
    pub async fn commit(self) -> FluentResult<()> {
        let Self { inner, mut guard } = self;
        guard.disarm();
        inner
            .commit()
            .await
            .map_err(|e| FluentError::transaction("commit", e))?;
        tracing::debug!(target: "pgfluent.tx", "transaction committed");
        Ok(())
    }

    /// Roll the transaction back.
    pub async fn rollback(self) -> FluentResult<()> {
        let Self { inner, mut guard } = self;
        guard.disarm();
        inner
            .rollback()
            .await
            .map_err(|e| FluentError::transaction("rollback", e))?;
        tracing::debug!(target: "pgfluent.tx", "transaction rolled back");
        Ok(())
    }

    /// Commit if `result` is `Ok`, roll back if it is `Err`.
    ///
    /// The body's error wins over a failed rollback; the rollback failure is
    /// logged.
    pub async fn finish<T>(self, result: FluentResult<T>) -> FluentResult<T> {
        match result {
            Ok(value) => {
                self.commit().await?;
                Ok(value)
            }
            Err(error) => {
                if let Err(rollback_err) = self.rollback().await {
                    tracing::warn!(
                        target: "pgfluent.tx",
                        error = %rollback_err,
                        "rollback after failed transaction body also failed",
                    );
                }
                Err(error)
            }
        }
    }
}

impl fmt::Debug for Transaction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction").finish_non_exhaustive()
    }
}

impl GenericClient for Transaction<'_> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> FluentResult<Vec<Row>> {
        GenericClient::query(&self.inner, sql, params).await
    }

    async fn query_one(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> FluentResult<Row> {
        GenericClient::query_one(&self.inner, sql, params).await
    }

    async fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> FluentResult<Option<Row>> {
        GenericClient::query_opt(&self.inner, sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> FluentResult<u64> {
        GenericClient::execute(&self.inner, sql, params).await
    }

    async fn prepare(&self, sql: &str) -> FluentResult<Statement> {
        GenericClient::prepare(&self.inner, sql).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_default_to_server_settings() {
        let opts = TransactionOptions::new();
        assert_eq!(opts.isolation, None);
        assert_eq!(opts.read_only, None);
        assert_eq!(opts.deferrable, None);
    }

    #[test]
    fn options_builder_sets_fields() {
        let opts = TransactionOptions::new()
            .isolation_level(TransactionIsolation::Serializable)
            .read_only(true)
            .deferrable(true);
        assert_eq!(opts.isolation, Some(TransactionIsolation::Serializable));
        assert_eq!(opts.read_only, Some(true));
        assert_eq!(opts.deferrable, Some(true));
    }

    #[test]
    fn isolation_maps_to_driver_level() {
        let level: tokio_postgres::IsolationLevel = TransactionIsolation::RepeatableRead.into();
        assert!(matches!(level, tokio_postgres::IsolationLevel::RepeatableRead));
    }

    #[test]
    fn finish_guard_disarms() {
        let mut guard = FinishGuard::new();
        assert!(guard.armed);
        guard.disarm();
        assert!(!guard.armed);
    }
}
