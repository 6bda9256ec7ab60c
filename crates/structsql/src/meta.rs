//! Struct-to-table metadata: descriptors, the `Model` trait, and the
//! process-wide registry cache.

use crate::error::{Error, Result};
use crate::param::Param;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};
use tokio_postgres::Row;

/// One column of a mapped table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Rust field name, as referenced by predicates.
    pub field: &'static str,
    /// Resolved SQL column name.
    pub column: &'static str,
    /// Whether this column is the table's primary key.
    pub primary_key: bool,
}

/// Immutable schema mapping for a model type.
///
/// Column order is fixed at derive time and drives both insert value binding
/// and positional row decoding, so the two cannot drift apart.
#[derive(Clone, Copy, Debug)]
pub struct TableDescriptor {
    /// SQL table name.
    pub table: &'static str,
    /// Ordered column set.
    pub columns: &'static [ColumnDescriptor],
}

impl TableDescriptor {
    /// The primary-key column, if one is marked.
    pub fn primary_key(&self) -> Option<&'static ColumnDescriptor> {
        self.columns.iter().find(|c| c.primary_key)
    }

    /// Look up a column by its Rust field name.
    pub fn resolve(&self, field: &str) -> Result<&'static ColumnDescriptor> {
        self.columns
            .iter()
            .find(|c| c.field == field)
            .ok_or_else(|| Error::Column(field.to_string()))
    }

    /// Columns included in an insert, honoring `skip_pk`.
    pub fn insert_columns(
        &self,
        skip_pk: bool,
    ) -> impl Iterator<Item = &'static ColumnDescriptor> {
        self.columns
            .iter()
            .filter(move |c| !(skip_pk && c.primary_key))
    }

    /// Comma-separated full column list, in descriptor order.
    pub fn select_list(&self) -> String {
        self.columns
            .iter()
            .map(|c| c.column)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A struct mapped onto a single database table.
///
/// Implement via `#[derive(Model)]`:
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
/// Nullable columns map to `Option<T>` fields: SQL NULL decodes to `None`,
/// distinct from a present zero value.
pub trait Model: Sized + Send + Sync + 'static {
    /// The raw table layout emitted by the derive.
    ///
    /// Use [`descriptor`] for the validated, cached form.
    fn layout() -> TableDescriptor;

    /// Bind this value's fields as parameters, in descriptor column order.
    fn bind(&self, skip_pk: bool) -> Vec<Param>;

    /// Decode a row whose columns are in descriptor order.
    fn from_row(row: &Row) -> Result<Self>;
}

static REGISTRY: OnceLock<RwLock<HashMap<TypeId, TableDescriptor>>> = OnceLock::new();

/// Resolve and cache the table descriptor for `T`.
///
/// The first resolution validates the layout; later calls return the cached
/// descriptor without re-deriving. Concurrent first resolutions of the same
/// type may race, which is harmless: both derive the same immutable content
/// and the first insert wins.
pub fn descriptor<T: Model>() -> Result<TableDescriptor> {
    let cache = REGISTRY.get_or_init(|| RwLock::new(HashMap::new()));
    let key = TypeId::of::<T>();

    if let Some(desc) = cache.read().unwrap().get(&key) {
        return Ok(*desc);
    }

    let desc = validate(T::layout())?;
    let mut map = cache.write().unwrap();
    Ok(*map.entry(key).or_insert(desc))
}

fn validate(layout: TableDescriptor) -> Result<TableDescriptor> {
    if layout.columns.is_empty() {
        return Err(Error::metadata(format!(
            "model for table '{}' has no columns",
            layout.table
        )));
    }
    let pk_count = layout.columns.iter().filter(|c| c.primary_key).count();
    if pk_count > 1 {
        return Err(Error::metadata(format!(
            "model for table '{}' marks {} primary keys, at most one is allowed",
            layout.table, pk_count
        )));
    }
    Ok(layout)
}
