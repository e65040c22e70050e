//! Pass-through for hand-written SQL.

use crate::client::{GenericClient, Route};
use crate::error::FluentResult;
use crate::log::{ExecKind, SqlLog};
use crate::param::Param;
use crate::transaction::Transaction;
use std::fmt;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// Hand-written SQL and its arguments, stored as given.
///
/// No placeholder rewriting happens here: write `$1, $2, ...` yourself.
///
/// ```ignore
/// let rows = Builder::new()
///     .raw("SELECT * FROM users WHERE id = $1", [1_i64])
///     .query(&client)
///     .await?;
/// ```
#[derive(Clone)]
pub struct RawQuery<'a> {
    sql: String,
    args: Vec<Param>,
    tx: Option<&'a Transaction<'a>>,
    log: SqlLog,
}

impl<'a> RawQuery<'a> {
    pub fn new<I>(sql: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Param>,
    {
        Self {
            sql: sql.into(),
            args: args.into_iter().map(Into::into).collect(),
            tx: None,
            log: SqlLog::default(),
        }
    }

    /// Run on `tx` regardless of the client passed to the execution methods.
    pub fn with_tx(mut self, tx: &'a Transaction<'a>) -> Self {
        self.tx = Some(tx);
        self
    }

    pub fn with_sql_log(mut self, log: SqlLog) -> Self {
        self.log = log;
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn args(&self) -> &[Param] {
        &self.args
    }

    fn params_ref(&self, kind: ExecKind) -> Vec<&(dyn ToSql + Sync)> {
        self.log.emit(kind, &self.sql, self.args.len(), self.tx.is_some());
        self.args.iter().map(Param::as_to_sql).collect()
    }

    pub async fn query(&self, conn: &impl GenericClient) -> FluentResult<Vec<Row>> {
        let params = self.params_ref(ExecKind::Query);
        Route::pick(self.tx, conn)
            .query(&self.sql, &params)
            .await
    }

    pub async fn query_one(&self, conn: &impl GenericClient) -> FluentResult<Row> {
        let params = self.params_ref(ExecKind::QueryOne);
        Route::pick(self.tx, conn)
            .query_one(&self.sql, &params)
            .await
    }

    pub async fn query_opt(&self, conn: &impl GenericClient) -> FluentResult<Option<Row>> {
        let params = self.params_ref(ExecKind::QueryOpt);
        Route::pick(self.tx, conn)
            .query_opt(&self.sql, &params)
            .await
    }

    pub async fn execute(&self, conn: &impl GenericClient) -> FluentResult<u64> {
        let params = self.params_ref(ExecKind::Execute);
        Route::pick(self.tx, conn)
            .execute(&self.sql, &params)
            .await
    }
}

impl fmt::Display for RawQuery<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

impl fmt::Debug for RawQuery<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawQuery")
            .field("sql", &self.sql)
            .field("args", &self.args)
            .field("in_transaction", &self.tx.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_sql_and_args_verbatim() {
        let q = RawQuery::new(
            "INSERT INTO users(name, email) VALUES($1, $2) RETURNING id",
            ["zed", "zed@example.com"],
        );
        assert_eq!(q.sql(), "INSERT INTO users(name, email) VALUES($1, $2) RETURNING id");
        assert_eq!(format!("{:?}", q.args()), r#"["zed", "zed@example.com"]"#);
        assert_eq!(q.to_string(), q.sql());
    }

    #[test]
    fn question_marks_are_not_rewritten() {
        let q = RawQuery::new("SELECT '?' AS literal", crate::params![]);
        assert_eq!(q.sql(), "SELECT '?' AS literal");
        assert!(q.args().is_empty());
    }

    #[test]
    fn mixed_argument_types() {
        let q = RawQuery::new(
            "UPDATE users SET active = $1 WHERE id = $2",
            crate::params![false, 42_i64],
        );
        assert_eq!(format!("{:?}", q.args()), "[false, 42]");
    }

    #[tokio::test]
    async fn runs_on_given_client() {
        use crate::client::testing::RecordingClient;

        let client = RecordingClient::default();
        let q = RawQuery::new("DELETE FROM users WHERE id = $1", [3_i64]);
        assert_eq!(q.execute(&client).await.unwrap(), 1);
        assert!(q.query(&client).await.unwrap().is_empty());

        let calls = client.take();
        assert_eq!(calls[0], ("execute", q.sql().to_string(), "[3]".to_string()));
        assert_eq!(calls[1].0, "query");
    }
}
