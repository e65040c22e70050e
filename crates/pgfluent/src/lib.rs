//! # pgfluent
//!
//! A fluent SQL statement builder for Postgres.
//!
//! ## Features
//!
//! - **Call order is SQL order**: each call appends a fragment; rendering joins them
//! - **Automatic numbering**: `?` in conditions becomes `$1, $2, ...` as you go
//! - **Arguments follow placeholders**: values are collected in placeholder order
//! - **Raw expressions**: `SET count = count + 1` without consuming a placeholder
//! - **Struct binding**: `#[derive(Bindable)]` turns tagged fields into column/value pairs
//! - **Transaction-aware**: attach a transaction and prepared statements run on it
//!
//! ```ignore
//! use pgfluent::{Builder, raw};
//!
//! let mut b = Builder::new();
//! b.update("counters")
//!     .set([("count", raw("count + 1"))])
//!     .where_("id = ?", [1]);
//!
//! assert_eq!(b.to_sql(), "UPDATE counters SET count = count + 1 WHERE id = $1");
//! let affected = b.prepare(&client).execute().await?;
//! ```
//!
//! Rendered SQL is logged through `tracing` under the `pgfluent.sql` target
//! when a statement runs; see [`SqlLog`].

pub mod bind;
pub mod builder;
pub mod client;
pub mod error;
pub mod expr;
pub mod log;
pub mod param;
pub mod placeholder;
pub mod raw;
mod scratch;
pub mod stmt;
pub mod transaction;

pub use bind::{Bindable, Bindings};
pub use builder::Builder;
pub use client::GenericClient;
pub use error::{FluentError, FluentResult};
pub use expr::{Assign, RawExpr, SqlExpr, raw};
pub use log::{ExecKind, SqlLog};
pub use param::{Param, ParamList};
pub use placeholder::Placeholders;
pub use raw::RawQuery;
pub use stmt::Stmt;
pub use transaction::{Transaction, TransactionIsolation, TransactionOptions};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{PoolConfig, create_pool, create_pool_with_config, create_pool_with_tls};

#[cfg(feature = "derive")]
pub use pgfluent_derive::Bindable;

// Re-exported so callers can name driver types without a direct dependency.
pub use tokio_postgres;
