//! Fluent statement builder.
//!
//! Every call appends one or more fragments in call order; `?` markers in
//! conditions become `$1, $2, ...` at the moment the call is made, and the
//! matching values are appended to the argument list right after. Rendering
//! only joins the fragments with single spaces.
//!
//! ```ignore
//! use pgfluent::Builder;
//!
//! let mut b = Builder::new();
//! b.select(["*"])
//!     .from("users")
//!     .where_("age > ?", [18])
//!     .and_where("status = ?", ["active"])
//!     .order_by(["created_at DESC"]);
//!
//! assert_eq!(
//!     b.to_sql(),
//!     "SELECT * FROM users WHERE age > $1 AND status = $2 ORDER BY created_at DESC"
//! );
//! ```

use crate::bind::{Bindable, Bindings};
use crate::client::GenericClient;
use crate::expr::Assign;
use crate::log::SqlLog;
use crate::param::{Param, ParamList};
use crate::placeholder::Placeholders;
use crate::raw::RawQuery;
use crate::scratch::Scratch;
use crate::stmt::Stmt;
use crate::transaction::Transaction;
use std::fmt;
use tokio_postgres::types::ToSql;

/// Mutable statement under construction.
///
/// Holds the fragment list, the placeholder counter and the argument list.
/// After any sequence of calls that pair placeholders with values,
/// `args().len() == placeholder_count()`. Passing the wrong number of values
/// for a condition is not detected here; the database rejects the statement.
#[derive(Clone, Default)]
pub struct Builder<'tx> {
    fragments: Vec<String>,
    placeholders: Placeholders,
    args: ParamList,
    table: Option<String>,
    tx: Option<&'tx Transaction<'tx>>,
    where_open: bool,
    having_open: bool,
    log: SqlLog,
}

fn join_list<I>(items: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut out = String::new();
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(item.as_ref());
    }
    out
}

impl<'tx> Builder<'tx> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a transaction; prepared statements run on it.
    pub fn with_transaction(&mut self, tx: &'tx Transaction<'tx>) -> &mut Self {
        self.tx = Some(tx);
        self
    }

    /// Logging configuration handed to prepared statements and raw queries.
    pub fn with_sql_log(&mut self, log: SqlLog) -> &mut Self {
        self.log = log;
        self
    }

    // ==================== statement heads ====================

    fn start_statement(&mut self, head: String) -> &mut Self {
        self.where_open = false;
        self.having_open = false;
        self.fragments.push(head);
        self
    }

    /// `SELECT a, b`
    pub fn select<I>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.start_statement(format!("SELECT {}", join_list(columns)))
    }

    /// `INSERT INTO table (a, b)`
    pub fn insert<I>(&mut self, table: &str, columns: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.start_statement(format!("INSERT INTO {table} ({})", join_list(columns)))
    }

    /// `UPDATE table`
    pub fn update(&mut self, table: &str) -> &mut Self {
        self.start_statement(format!("UPDATE {table}"))
    }

    /// `DELETE FROM table`
    pub fn delete(&mut self, table: &str) -> &mut Self {
        self.start_statement(format!("DELETE FROM {table}"))
    }

    /// Alias for [`Builder::delete`].
    pub fn delete_from(&mut self, table: &str) -> &mut Self {
        self.delete(table)
    }

    // ==================== sources ====================

    /// `FROM table`; also records `table` as the builder's table.
    pub fn from(&mut self, table: &str) -> &mut Self {
        self.table = Some(table.to_string());
        self.fragments.push(format!("FROM {table}"));
        self
    }

    /// `JOIN table ON condition`
    pub fn join<I>(&mut self, table: &str, on: &str, args: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Param>,
    {
        self.push_join("JOIN", table, on, args)
    }

    /// `LEFT JOIN table ON condition`
    pub fn left_join<I>(&mut self, table: &str, on: &str, args: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Param>,
    {
        self.push_join("LEFT JOIN", table, on, args)
    }

    fn push_join<I>(&mut self, kind: &str, table: &str, on: &str, args: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Param>,
    {
        let on = self.placeholders.rewrite(on);
        self.fragments.push(format!("{kind} {table} ON {on}"));
        self.push_args(args)
    }

    // ==================== conditions ====================

    fn push_args<I>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Param>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    fn push_condition<I>(&mut self, condition: &str, args: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Param>,
    {
        let condition = self.placeholders.rewrite(condition);
        self.fragments.push(condition);
        self.push_args(args)
    }

    /// Add a WHERE condition.
    ///
    /// The first call after a statement head emits `WHERE`; later calls on
    /// the same statement are joined with `AND`. No keyword is added when the
    /// last fragment is already a bare `WHERE` (e.g. from [`Builder::clause`]).
    /// With no fragments at all the condition is appended bare, so a builder
    /// can assemble a standalone condition list.
    pub fn where_<I>(&mut self, condition: &str, args: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Param>,
    {
        let after_keyword = self
            .fragments
            .last()
            .is_some_and(|last| last.trim().eq_ignore_ascii_case("WHERE"));
        if !after_keyword {
            if self.where_open {
                self.fragments.push("AND".to_string());
            } else if !self.fragments.is_empty() {
                self.fragments.push("WHERE".to_string());
            }
        }
        self.where_open = true;
        self.push_condition(condition, args)
    }

    /// `AND condition`, unconditionally.
    pub fn and_where<I>(&mut self, condition: &str, args: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Param>,
    {
        self.fragments.push("AND".to_string());
        self.push_condition(condition, args)
    }

    /// `OR condition`, unconditionally.
    pub fn or_where<I>(&mut self, condition: &str, args: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Param>,
    {
        self.fragments.push("OR".to_string());
        self.push_condition(condition, args)
    }

    /// `GROUP BY a, b`
    pub fn group_by<I>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.fragments.push(format!("GROUP BY {}", join_list(columns)));
        self
    }

    /// `HAVING condition`; repeated calls are joined with `AND`.
    pub fn having<I>(&mut self, condition: &str, args: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Param>,
    {
        let keyword = if self.having_open { "AND" } else { "HAVING" };
        self.fragments.push(keyword.to_string());
        self.having_open = true;
        self.push_condition(condition, args)
    }

    // ==================== tails ====================

    /// `ORDER BY a, b`
    pub fn order_by<I>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.fragments.push(format!("ORDER BY {}", join_list(columns)));
        self
    }

    /// `LIMIT $n` with `n` bound.
    pub fn limit(&mut self, n: i64) -> &mut Self {
        self.push_bound_keyword("LIMIT", n)
    }

    /// `OFFSET $n` with `n` bound.
    pub fn offset(&mut self, n: i64) -> &mut Self {
        self.push_bound_keyword("OFFSET", n)
    }

    fn push_bound_keyword(&mut self, keyword: &str, value: i64) -> &mut Self {
        let mut fragment = format!("{keyword} ");
        self.placeholders.push_next(&mut fragment);
        self.fragments.push(fragment);
        self.args.push(Param::new(value));
        self
    }

    /// `RETURNING a, b`; no-op for an empty column list.
    pub fn returning<I>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let columns = join_list(columns);
        if !columns.is_empty() {
            self.fragments.push("RETURNING".to_string());
            self.fragments.push(columns);
        }
        self
    }

    /// Append a fragment verbatim; `?` is not rewritten.
    pub fn clause(&mut self, fragment: &str) -> &mut Self {
        self.fragments.push(fragment.to_string());
        self
    }

    // ==================== writes ====================

    /// `VALUES ($k, $k+1, ...)`, one fresh placeholder per value.
    pub fn values<I>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Param>,
    {
        let mut fragment = String::from("VALUES (");
        for (i, value) in values.into_iter().enumerate() {
            if i > 0 {
                fragment.push_str(", ");
            }
            self.placeholders.push_next(&mut fragment);
            self.args.push(value.into());
        }
        fragment.push(')');
        self.fragments.push(fragment);
        self
    }

    /// `SET a = $k, b = <expr>, ...` in the order `assignments` yields them.
    ///
    /// [`Assign::Expr`] entries are written literally and take no
    /// placeholder; every other entry takes the next placeholder and appends
    /// its value.
    pub fn set<I, C, A>(&mut self, assignments: I) -> &mut Self
    where
        I: IntoIterator<Item = (C, A)>,
        C: AsRef<str>,
        A: Into<Assign>,
    {
        let mut fragment = String::from("SET ");
        for (i, (column, assign)) in assignments.into_iter().enumerate() {
            if i > 0 {
                fragment.push_str(", ");
            }
            fragment.push_str(column.as_ref());
            fragment.push_str(" = ");
            match assign.into() {
                Assign::Expr(sql) => fragment.push_str(&sql),
                Assign::Value(param) => {
                    self.placeholders.push_next(&mut fragment);
                    self.args.push(param);
                }
            }
        }
        self.fragments.push(fragment);
        self
    }

    // ==================== binding ====================

    /// Collect the tagged fields of `value` as `column → value` pairs.
    ///
    /// If no table has been recorded yet, the lower-cased type name becomes
    /// the table. Nothing is appended to the statement.
    pub fn bind<B: Bindable>(&mut self, value: &B) -> Bindings {
        if self.table.is_none() {
            self.table = Some(B::TYPE_NAME.to_lowercase());
        }
        Bindings::new(value.bind_columns())
    }

    // ==================== accessors ====================

    /// Table recorded by [`Builder::from`] or [`Builder::bind`].
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Arguments in placeholder order.
    pub fn args(&self) -> &[Param] {
        self.args.as_slice()
    }

    /// Arguments as `tokio-postgres` parameter references.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.args.as_refs()
    }

    /// Number of `$N` placeholders generated so far.
    pub fn placeholder_count(&self) -> usize {
        self.placeholders.count()
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn transaction(&self) -> Option<&'tx Transaction<'tx>> {
        self.tx
    }

    // ==================== rendering ====================

    /// Render the statement: fragments joined by single spaces.
    ///
    /// Pure read; calling it again without changes gives the same string.
    pub fn to_sql(&self) -> String {
        let size_hint: usize = self.fragments.iter().map(|f| f.len() + 1).sum();
        let mut buf = Scratch::acquire(size_hint);
        for (i, fragment) in self.fragments.iter().enumerate() {
            if i > 0 {
                buf.push(' ');
            }
            buf.push_str(fragment);
        }
        buf.as_str().to_string()
    }

    /// Rendered SQL plus an owned copy of the arguments.
    pub fn build(&self) -> (String, Vec<Param>) {
        (self.to_sql(), self.args.to_vec())
    }

    // ==================== execution ====================

    /// Snapshot the statement for execution against `db`, or against the
    /// attached transaction if there is one.
    pub fn prepare<'a, C: GenericClient>(&self, db: &'a C) -> Stmt<'a, C>
    where
        'tx: 'a,
    {
        Stmt::new(
            self.to_sql(),
            self.args.to_vec(),
            db,
            self.tx,
            self.log.clone(),
        )
    }

    /// Hand-written SQL with pre-numbered placeholders.
    ///
    /// Builder state is not consulted except for the attached transaction and
    /// logging configuration.
    pub fn raw<I>(&self, sql: impl Into<String>, args: I) -> RawQuery<'tx>
    where
        I: IntoIterator,
        I::Item: Into<Param>,
    {
        let query = RawQuery::new(sql, args).with_sql_log(self.log.clone());
        match self.tx {
            Some(tx) => query.with_tx(tx),
            None => query,
        }
    }
}

impl fmt::Display for Builder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

impl fmt::Debug for Builder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("fragments", &self.fragments)
            .field("args", &self.args)
            .field("table", &self.table)
            .field("in_transaction", &self.tx.is_some())
            .finish()
    }
}
