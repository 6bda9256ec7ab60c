//! # structsql
//!
//! A typed query-construction and execution layer for PostgreSQL.
//!
//! Callers describe insert/select operations against struct definitions
//! instead of hand-writing SQL for the common cases; raw SQL stays available
//! for everything else.
//!
//! ## Features
//!
//! - **Struct-to-table metadata**: `#[derive(Model)]` maps a struct onto a
//!   table once; a process-wide registry caches the descriptor
//! - **Composable predicates**: `col("id").eq(123).and(...)`, rendered with
//!   correct `$n` placeholders and explicit grouping
//! - **Order by construction**: insert binding and row decoding both follow
//!   the descriptor's column order, so they cannot drift apart
//! - **Deadline-bounded execution**: a time budget covers dispatch and row
//!   iteration; expiry fails the next pull and releases the cursor
//! - **Transaction-friendly**: pass a transaction anywhere a
//!   [`GenericClient`] is expected
//!
//! ## Quick start
//!
//! ```ignore
//! use structsql::{Model, col, insert, raw, select};
//!
//! #[derive(Model)]
//! struct TestModel {
//!     #[orm(primary_key)]
//!     id: i64,
//!     first_name: String,
//!     age: i16,
//!     last_name: Option<String>,
//! }
//!
//! let pool = structsql::create_pool("postgres://localhost/app")?;
//! let client = pool.get().await?;
//!
//! raw("CREATE TABLE IF NOT EXISTS test_model (\
//!      id BIGSERIAL PRIMARY KEY, first_name TEXT NOT NULL, \
//!      age SMALLINT NOT NULL, last_name TEXT)")
//!     .exec(&client)
//!     .await?;
//!
//! let affected = insert::<TestModel>()
//!     .skip_pk()
//!     .value(TestModel {
//!         id: 0,
//!         first_name: "Deng".into(),
//!         age: 18,
//!         last_name: Some("Ming".into()),
//!     })
//!     .exec(&client)
//!     .await?;
//!
//! let found = select::<TestModel>()
//!     .filter(col("first_name").eq("Deng"))
//!     .get(&client)
//!     .await?;
//! ```

pub mod client;
pub mod engine;
pub mod error;
pub mod expr;
pub mod insert;
pub mod meta;
pub mod param;
pub mod raw;
pub mod select;
pub mod statement;
pub mod stream;

pub use client::{GenericClient, RowStream, StreamingClient};
pub use engine::ExecResult;
pub use error::{Error, Result};
pub use expr::{CmpOp, Col, Predicate, col};
pub use insert::{Inserter, insert};
pub use meta::{ColumnDescriptor, Model, TableDescriptor, descriptor};
pub use param::{Param, ParamList};
pub use raw::{RawStatement, raw};
pub use select::{Selector, select};
pub use statement::Statement;
pub use stream::ModelStream;

// Re-exported for derive-generated code.
pub use tokio_postgres::Row;

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_config};

#[cfg(feature = "derive")]
pub use structsql_derive::Model;

#[cfg(test)]
mod tests;
