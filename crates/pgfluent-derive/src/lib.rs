//! Derive macros for pgfluent
//!
//! Provides `#[derive(Bindable)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod bindable;

/// Derive `Bindable` for a struct.
///
/// # Example
///
/// ```ignore
/// use pgfluent::Bindable;
///
/// #[derive(Bindable)]
/// struct User {
///     #[db(column = "id")]
///     id: i64,
///     #[db(column = "email_address")]
///     email: String,
///     session_token: String,
/// }
/// ```
///
/// # Attributes
///
/// - `#[db(column = "name")]` - Bind the field under this column
///
/// Fields without the attribute are not bound. Tagged field types must be
/// `Clone + ToSql + Send + Sync + 'static`.
#[proc_macro_derive(Bindable, attributes(db))]
pub fn derive_bindable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    bindable::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
