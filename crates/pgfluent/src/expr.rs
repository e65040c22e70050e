//! Raw SQL expressions and SET assignments.

use crate::param::Param;
use std::borrow::Cow;
use tokio_postgres::types::ToSql;

/// A value that renders to a literal SQL fragment instead of a bound argument.
///
/// Used by [`Builder::set`](crate::Builder::set): assignments carrying a
/// `SqlExpr` are written verbatim and consume no placeholder.
pub trait SqlExpr {
    fn to_sql_fragment(&self) -> Cow<'_, str>;
}

/// A literal SQL expression, e.g. `count + 1` or `NOW()`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RawExpr(String);

impl RawExpr {
    pub fn new(sql: impl Into<String>) -> Self {
        RawExpr(sql.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl SqlExpr for RawExpr {
    fn to_sql_fragment(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.0)
    }
}

impl SqlExpr for &str {
    fn to_sql_fragment(&self) -> Cow<'_, str> {
        Cow::Borrowed(*self)
    }
}

/// Shorthand for [`RawExpr::new`].
pub fn raw(sql: impl Into<String>) -> RawExpr {
    RawExpr::new(sql)
}

/// Right-hand side of one `column = ...` assignment.
#[derive(Clone, Debug)]
pub enum Assign {
    /// Bound argument; takes the next placeholder.
    Value(Param),
    /// Literal SQL; no placeholder, no argument.
    Expr(String),
}

impl Assign {
    pub fn value<T: ToSql + Send + Sync + 'static>(value: T) -> Self {
        Assign::Value(Param::new(value))
    }

    pub fn expr(expr: impl SqlExpr) -> Self {
        Assign::Expr(expr.to_sql_fragment().into_owned())
    }
}

impl From<Param> for Assign {
    fn from(param: Param) -> Self {
        Assign::Value(param)
    }
}

impl From<RawExpr> for Assign {
    fn from(expr: RawExpr) -> Self {
        Assign::Expr(expr.0)
    }
}
