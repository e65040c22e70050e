//! Generic client trait: the execution capability statements are run against.

use crate::error::FluentResult;
use std::future::Future;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Row, Statement};

/// A trait that unifies database clients and transactions.
///
/// pgfluent never talks to the database itself; a rendered statement and its
/// ordered arguments are handed to whatever implements this trait. Errors
/// from the driver are returned as [`FluentError::Query`](crate::FluentError::Query)
/// without translation.
pub trait GenericClient: Send + Sync {
    /// Execute a query and return all rows.
    fn query(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = FluentResult<Vec<Row>>> + Send;

    /// Execute a query that must return exactly one row.
    ///
    /// Row-count enforcement is the driver's: zero or several rows surface as
    /// its error.
    fn query_one(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = FluentResult<Row>> + Send;

    /// Execute a query that returns at most one row.
    fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = FluentResult<Option<Row>>> + Send;

    /// Execute a statement and return the number of affected rows.
    fn execute(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = FluentResult<u64>> + Send;

    /// Prepare a statement on this connection.
    fn prepare(&self, sql: &str) -> impl Future<Output = FluentResult<Statement>> + Send;
}

/// Delegates every [`GenericClient`] method to the same-named inherent method
/// on a `tokio-postgres`-like client type.
macro_rules! delegate_generic_client {
    ($ty:ty) => {
        impl GenericClient for $ty {
            async fn query(
                &self,
                sql: &str,
                params: &[&(dyn ToSql + Sync)],
            ) -> FluentResult<Vec<Row>> {
                Ok(<$ty>::query(self, sql, params).await?)
            }

            async fn query_one(
                &self,
                sql: &str,
                params: &[&(dyn ToSql + Sync)],
            ) -> FluentResult<Row> {
                Ok(<$ty>::query_one(self, sql, params).await?)
            }

            async fn query_opt(
                &self,
                sql: &str,
                params: &[&(dyn ToSql + Sync)],
            ) -> FluentResult<Option<Row>> {
                Ok(<$ty>::query_opt(self, sql, params).await?)
            }

            async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> FluentResult<u64> {
                Ok(<$ty>::execute(self, sql, params).await?)
            }

            async fn prepare(&self, sql: &str) -> FluentResult<Statement> {
                Ok(<$ty>::prepare(self, sql).await?)
            }
        }
    };
}

delegate_generic_client!(tokio_postgres::Client);
delegate_generic_client!(tokio_postgres::Transaction<'_>);

#[cfg(feature = "pool")]
impl GenericClient for deadpool_postgres::Client {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> FluentResult<Vec<Row>> {
        let client: &tokio_postgres::Client = self;
        GenericClient::query(client, sql, params).await
    }

    async fn query_one(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> FluentResult<Row> {
        let client: &tokio_postgres::Client = self;
        GenericClient::query_one(client, sql, params).await
    }

    async fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> FluentResult<Option<Row>> {
        let client: &tokio_postgres::Client = self;
        GenericClient::query_opt(client, sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> FluentResult<u64> {
        let client: &tokio_postgres::Client = self;
        GenericClient::execute(client, sql, params).await
    }

    // Goes through deadpool's per-connection statement cache.
    async fn prepare(&self, sql: &str) -> FluentResult<Statement> {
        Ok(self.prepare_cached(sql).await?)
    }
}

/// Target of a statement: the attached transaction when there is one,
/// otherwise the client it was prepared against.
pub(crate) enum Route<'a, T, C> {
    Tx(&'a T),
    Client(&'a C),
}

impl<'a, T, C> Route<'a, T, C> {
    pub(crate) fn pick(tx: Option<&'a T>, client: &'a C) -> Self {
        match tx {
            Some(tx) => Self::Tx(tx),
            None => Self::Client(client),
        }
    }
}

impl<T: GenericClient, C: GenericClient> GenericClient for Route<'_, T, C> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> FluentResult<Vec<Row>> {
        match self {
            Self::Tx(tx) => tx.query(sql, params).await,
            Self::Client(client) => client.query(sql, params).await,
        }
    }

    async fn query_one(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> FluentResult<Row> {
        match self {
            Self::Tx(tx) => tx.query_one(sql, params).await,
            Self::Client(client) => client.query_one(sql, params).await,
        }
    }

    async fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> FluentResult<Option<Row>> {
        match self {
            Self::Tx(tx) => tx.query_opt(sql, params).await,
            Self::Client(client) => client.query_opt(sql, params).await,
        }
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> FluentResult<u64> {
        match self {
            Self::Tx(tx) => tx.execute(sql, params).await,
            Self::Client(client) => client.execute(sql, params).await,
        }
    }

    async fn prepare(&self, sql: &str) -> FluentResult<Statement> {
        match self {
            Self::Tx(tx) => tx.prepare(sql).await,
            Self::Client(client) => client.prepare(sql).await,
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::error::FluentError;
    use std::sync::Mutex;

    /// Records every call instead of talking to a database.
    #[derive(Default)]
    pub(crate) struct RecordingClient {
        pub(crate) calls: Mutex<Vec<(&'static str, String, String)>>,
    }

    impl RecordingClient {
        fn record(&self, method: &'static str, sql: &str, params: &[&(dyn ToSql + Sync)]) {
            let params = format!("{params:?}");
            self.calls
                .lock()
                .unwrap()
                .push((method, sql.to_string(), params));
        }

        pub(crate) fn take(&self) -> Vec<(&'static str, String, String)> {
            std::mem::take(&mut *self.calls.lock().unwrap())
        }
    }

    impl GenericClient for RecordingClient {
        async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> FluentResult<Vec<Row>> {
            self.record("query", sql, params);
            Ok(vec![])
        }

        async fn query_one(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> FluentResult<Row> {
            self.record("query_one", sql, params);
            Err(FluentError::Connection("recording client has no rows".into()))
        }

        async fn query_opt(
            &self,
            sql: &str,
            params: &[&(dyn ToSql + Sync)],
        ) -> FluentResult<Option<Row>> {
            self.record("query_opt", sql, params);
            Ok(None)
        }

        async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> FluentResult<u64> {
            self.record("execute", sql, params);
            Ok(params.len() as u64)
        }

        async fn prepare(&self, _sql: &str) -> FluentResult<Statement> {
            Err(FluentError::Connection("recording client cannot prepare".into()))
        }
    }
}
