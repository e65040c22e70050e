//! A rendered statement bound to a client.

use crate::client::{GenericClient, Route};
use crate::error::FluentResult;
use crate::log::{ExecKind, SqlLog};
use crate::param::Param;
use crate::transaction::Transaction;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// Snapshot of a builder's SQL and arguments, ready to run.
///
/// Created by [`Builder::prepare`](crate::Builder::prepare). When the builder
/// had a transaction attached, every call runs on that transaction; otherwise
/// it runs on the client passed to `prepare`.
pub struct Stmt<'a, C> {
    sql: String,
    params: Vec<Param>,
    db: &'a C,
    tx: Option<&'a Transaction<'a>>,
    log: SqlLog,
}

impl<'a, C: GenericClient> Stmt<'a, C> {
    pub(crate) fn new(
        sql: String,
        params: Vec<Param>,
        db: &'a C,
        tx: Option<&'a Transaction<'a>>,
        log: SqlLog,
    ) -> Self {
        Self {
            sql,
            params,
            db,
            tx,
            log,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Whether calls go to an attached transaction instead of the client.
    pub fn in_transaction(&self) -> bool {
        self.tx.is_some()
    }

    /// Replace the logging configuration for this statement.
    pub fn with_sql_log(mut self, log: SqlLog) -> Self {
        self.log = log;
        self
    }

    fn params_ref(&self, kind: ExecKind) -> Vec<&(dyn ToSql + Sync)> {
        self.log.emit(kind, &self.sql, self.params.len(), self.tx.is_some());
        self.params.iter().map(Param::as_to_sql).collect()
    }

    /// Run the statement and return all rows.
    pub async fn query(&self) -> FluentResult<Vec<Row>> {
        let params = self.params_ref(ExecKind::Query);
        Route::pick(self.tx, self.db)
            .query(&self.sql, &params)
            .await
    }

    /// Run the statement and return exactly one row.
    pub async fn query_one(&self) -> FluentResult<Row> {
        let params = self.params_ref(ExecKind::QueryOne);
        Route::pick(self.tx, self.db)
            .query_one(&self.sql, &params)
            .await
    }

    /// Run the statement and return at most one row.
    pub async fn query_opt(&self) -> FluentResult<Option<Row>> {
        let params = self.params_ref(ExecKind::QueryOpt);
        Route::pick(self.tx, self.db)
            .query_opt(&self.sql, &params)
            .await
    }

    /// Run the statement and return the number of affected rows.
    pub async fn execute(&self) -> FluentResult<u64> {
        let params = self.params_ref(ExecKind::Execute);
        Route::pick(self.tx, self.db)
            .execute(&self.sql, &params)
            .await
    }
}
