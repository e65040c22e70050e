//! Argument values and the ordered argument ledger.

use std::fmt;
use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// A bound argument value.
///
/// Values are stored behind an `Arc` so a builder can hand its arguments to a
/// prepared [`Stmt`](crate::Stmt) without copying them.
#[derive(Clone)]
pub struct Param(Arc<dyn ToSql + Send + Sync>);

impl Param {
    /// Wrap any `ToSql` value.
    pub fn new<T: ToSql + Send + Sync + 'static>(value: T) -> Self {
        Param(Arc::new(value))
    }

    /// Borrow the value as the trait object `tokio-postgres` expects.
    pub fn as_to_sql(&self) -> &(dyn ToSql + Sync) {
        &*self.0 as &(dyn ToSql + Sync)
    }
}

impl<T: ToSql + Send + Sync + 'static> From<T> for Param {
    fn from(value: T) -> Self {
        Param::new(value)
    }
}

// `ToSql: Debug`, so the wrapped value prints as itself (`18`, `"active"`).
impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// Append-only list of arguments; position `N - 1` belongs to placeholder `$N`.
#[derive(Clone, Debug, Default)]
pub struct ParamList {
    params: Vec<Param>,
}

impl ParamList {
    /// Create a new empty list.
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Append a value and return its 1-based position.
    pub fn push(&mut self, param: Param) -> usize {
        self.params.push(param);
        self.params.len()
    }

    /// Append every value in order.
    pub fn extend(&mut self, params: impl IntoIterator<Item = Param>) {
        self.params.extend(params);
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// The values in insertion order.
    pub fn as_slice(&self) -> &[Param] {
        &self.params
    }

    /// All values as references for `tokio-postgres`.
    pub fn as_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.iter().map(Param::as_to_sql).collect()
    }

    pub fn to_vec(&self) -> Vec<Param> {
        self.params.clone()
    }
}

/// Build a `Vec<Param>` from values of mixed types.
///
/// ```ignore
/// b.values(pgfluent::params!["alice", 30_i32, true]);
/// b.where_("deleted_at IS NULL", pgfluent::params![]);
/// ```
#[macro_export]
macro_rules! params {
    () => {
        ::std::vec::Vec::<$crate::Param>::new()
    };
    ( $($value:expr),+ $(,)? ) => {
        ::std::vec![$( $crate::Param::new($value) ),+]
    };
}
