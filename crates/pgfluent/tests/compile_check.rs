//! Compile-only checks for the execution API.
//!
//! These do NOT run against a database; they only check types and signatures.

#![allow(dead_code)]

use pgfluent::{
    Builder, FluentError, FluentResult, GenericClient, RawQuery, SqlLog, Transaction,
    TransactionIsolation, TransactionOptions, raw,
};
use tracing::Level;

async fn _prepare_on_client_compiles(client: &tokio_postgres::Client) -> FluentResult<()> {
    let mut b = Builder::new();
    b.select(["id", "name"])
        .from("users")
        .where_("status = ?", ["active"])
        .limit(10);

    let stmt = b.prepare(client);
    let _rows: Vec<tokio_postgres::Row> = stmt.query().await?;
    let _row: Option<tokio_postgres::Row> = stmt.query_opt().await?;
    Ok(())
}

async fn _generic_client_compiles(conn: &impl GenericClient) -> FluentResult<u64> {
    let mut b = Builder::new();
    b.update("counters")
        .set([("count", raw("count + 1"))])
        .where_("id = ?", [1_i64]);
    b.prepare(conn).execute().await
}

async fn _raw_query_compiles(conn: &impl GenericClient) -> FluentResult<()> {
    let _row = RawQuery::new("SELECT * FROM users WHERE id = $1", [1_i64])
        .with_sql_log(SqlLog::new().level(Level::INFO).no_truncate())
        .query_one(conn)
        .await?;
    Ok(())
}

async fn _builder_on_transaction_compiles(client: &mut tokio_postgres::Client) -> FluentResult<()> {
    let tx = Transaction::begin(client).await?;
    {
        let mut b = Builder::new();
        b.with_transaction(&tx)
            .insert("users", ["name", "email"])
            .values(["zed", "zed@example.com"])
            .returning(["id"]);
        let _id: i64 = b.prepare(&tx).query_one().await?.get(0);

        b.raw("DELETE FROM sessions WHERE user_id = $1", [1_i64])
            .execute(&tx)
            .await?;
    }
    tx.commit().await
}

async fn _transaction_macro_compiles(client: &mut tokio_postgres::Client) -> FluentResult<u64> {
    pgfluent::transaction!(client, tx, {
        let mut b = Builder::new();
        b.with_transaction(&tx).delete("users").where_("id = ?", [1_i64]);
        b.prepare(&tx).execute().await
    })
}

async fn _transaction_macro_with_options_compiles(
    client: &mut tokio_postgres::Client,
) -> FluentResult<()> {
    let opts = TransactionOptions::new()
        .isolation_level(TransactionIsolation::Serializable)
        .read_only(true)
        .deferrable(true);

    pgfluent::transaction!(client, tx, opts, {
        RawQuery::new("SELECT 1", pgfluent::params![]).query(&tx).await?;
        Ok::<(), FluentError>(())
    })
}

#[cfg(feature = "pool")]
async fn _pool_client_compiles(pool: &deadpool_postgres::Pool) -> FluentResult<()> {
    let client = pool.get().await?;
    let mut b = Builder::new();
    b.select(["1"]);
    b.prepare(&client).query().await?;
    Ok(())
}

#[test]
fn compile_checks_link() {}
