//! Derive macros for structsql
//!
//! Provides the `#[derive(Model)]` macro that maps a struct with named
//! fields onto a database table.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod model;

/// Derive `Model` for a struct with named fields.
///
/// # Example
///
/// ```ignore
/// use structsql::Model;
///
/// #[derive(Model)]
/// struct TestModel {
///     #[orm(primary_key)]
///     id: i64,
///     first_name: String,
///     age: i16,
///     last_name: Option<String>,
/// }
/// ```
///
/// # Generated
///
/// - `fn layout()` - table name and ordered column descriptors
/// - `fn bind()` - field values as bound parameters, in column order
/// - `fn from_row()` - positional row decoding, in the same column order
///
/// # Attributes
///
/// - `#[orm(table = "name")]` - override the table name (default: snake_case
///   of the type name)
/// - `#[orm(primary_key)]` - mark a field as the primary key
/// - `#[orm(column = "name")]` - override a field's column name (default:
///   the field name)
///
/// Unrecognized keys inside `#[orm(...)]` are ignored.
#[proc_macro_derive(Model, attributes(orm))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    model::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
