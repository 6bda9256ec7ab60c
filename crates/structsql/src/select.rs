//! SELECT builder for model types.

use crate::client::{GenericClient, StreamingClient};
use crate::engine;
use crate::error::{Error, Result};
use crate::expr::Predicate;
use crate::meta::{Model, descriptor};
use crate::param::ParamList;
use crate::statement::Statement;
use crate::stream::ModelStream;
use std::marker::PhantomData;
use std::time::Duration;

/// Create a SELECT builder for the given model type.
///
/// # Example
/// ```ignore
/// let user = structsql::select::<User>()
///     .filter(structsql::col("id").eq(123i64))
///     .get(&client)
///     .await?;
/// ```
pub fn select<T: Model>() -> Selector<T> {
    Selector::new()
}

/// Builder for `SELECT <columns> FROM <table> [WHERE <predicate>]`.
///
/// The column list is always the full descriptor set, in descriptor order,
/// so positional row decoding lines up by construction.
#[must_use]
pub struct Selector<T: Model> {
    predicate: Option<Predicate>,
    timeout: Option<Duration>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Model> Selector<T> {
    /// Create a new SELECT builder.
    pub fn new() -> Self {
        Self {
            predicate: None,
            timeout: None,
            _marker: PhantomData,
        }
    }

    /// Set the WHERE predicate. Calling this again replaces the previous one.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicate = Some(predicate);
        self
    }

    /// Bound the whole operation, dispatch and row iteration included.
    pub fn timeout(mut self, budget: Duration) -> Self {
        self.timeout = Some(budget);
        self
    }

    /// Render the statement without executing it.
    ///
    /// Metadata and unknown-column failures surface here, before any SQL is
    /// sent to the driver.
    pub fn build(&self) -> Result<Statement> {
        let table = descriptor::<T>()?;
        let mut params = ParamList::new();
        let mut sql = format!("SELECT {} FROM {}", table.select_list(), table.table);
        if let Some(predicate) = &self.predicate {
            let clause = predicate.render(&table, &mut params)?;
            sql.push_str(" WHERE ");
            sql.push_str(&clause);
        }
        Ok(Statement::new(sql, params))
    }

    /// Fetch a single value.
    ///
    /// Zero matching rows fail with [`Error::NotFound`]. When more than one
    /// row matches, the first row wins (does **not** error).
    pub async fn get(&self, client: &impl GenericClient) -> Result<T> {
        let table = descriptor::<T>()?;
        let stmt = self.build()?;
        match engine::run_query_opt(client, &stmt, self.timeout).await? {
            Some(row) => T::from_row(&row),
            None => Err(Error::not_found(format!(
                "no matching row in '{}'",
                table.table
            ))),
        }
    }

    /// Fetch all matching values eagerly.
    ///
    /// A decode failure on any row discards the whole result; partial
    /// results are never returned.
    pub async fn fetch_all(&self, client: &impl GenericClient) -> Result<Vec<T>> {
        let stmt = self.build()?;
        let rows = engine::run_query(client, &stmt, self.timeout).await?;
        rows.iter().map(T::from_row).collect()
    }

    /// Fetch matching values as a lazy, forward-only stream.
    ///
    /// The stream holds the cursor; dropping it (normal end, error, or early
    /// abandonment) releases the resource.
    pub async fn stream(&self, client: &impl StreamingClient) -> Result<ModelStream<T>> {
        let stmt = self.build()?;
        let rows = engine::open_stream(client, &stmt, self.timeout).await?;
        Ok(ModelStream::new(rows))
    }
}

impl<T: Model> Default for Selector<T> {
    fn default() -> Self {
        Self::new()
    }
}
