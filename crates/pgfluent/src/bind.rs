//! Struct → column binding.
//!
//! A type opts in by implementing [`Bindable`], normally through
//! `#[derive(Bindable)]`:
//!
//! ```ignore
//! use pgfluent::Bindable;
//!
//! #[derive(Bindable)]
//! struct User {
//!     #[db(column = "id")]
//!     id: i64,
//!     #[db(column = "name")]
//!     name: String,
//!     // untagged fields are never bound
//!     cached_score: u32,
//! }
//! ```

use crate::expr::Assign;
use crate::param::Param;

/// A type whose tagged fields can be turned into `column → value` pairs.
pub trait Bindable {
    /// Declared type name (e.g. `"User"`); lower-cased into a default table name.
    const TYPE_NAME: &'static str;

    /// Tagged top-level fields in declaration order.
    fn bind_columns(&self) -> Vec<(&'static str, Param)>;
}

impl<T: Bindable + ?Sized> Bindable for &T {
    const TYPE_NAME: &'static str = T::TYPE_NAME;

    fn bind_columns(&self) -> Vec<(&'static str, Param)> {
        (**self).bind_columns()
    }
}

/// Ordered `column → value` mapping produced by [`Builder::bind`](crate::Builder::bind).
#[derive(Clone, Debug, Default)]
pub struct Bindings {
    entries: Vec<(&'static str, Param)>,
}

impl Bindings {
    pub(crate) fn new(entries: Vec<(&'static str, Param)>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value bound to `column`, if the column was tagged.
    pub fn get(&self, column: &str) -> Option<&Param> {
        self.entries
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(name, _)| *name).collect()
    }

    pub fn values(&self) -> Vec<Param> {
        self.entries.iter().map(|(_, value)| value.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Param)> {
        self.entries.iter().map(|(name, value)| (*name, value))
    }

    /// Turn the mapping into SET assignments, keeping column order.
    pub fn into_assignments(self) -> Vec<(&'static str, Assign)> {
        self.entries
            .into_iter()
            .map(|(name, value)| (name, Assign::Value(value)))
            .collect()
    }
}

impl IntoIterator for Bindings {
    type Item = (&'static str, Param);
    type IntoIter = std::vec::IntoIter<(&'static str, Param)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
