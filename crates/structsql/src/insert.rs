//! INSERT builder for model types.

use crate::client::GenericClient;
use crate::engine::{self, ExecResult};
use crate::error::{Error, Result};
use crate::meta::{Model, descriptor};
use crate::param::ParamList;
use crate::statement::Statement;
use std::time::Duration;

/// Create an INSERT builder for the given model type.
///
/// # Example
/// ```ignore
/// let affected = structsql::insert::<User>()
///     .skip_pk()
///     .value(user)
///     .exec(&client)
///     .await?;
/// ```
pub fn insert<T: Model>() -> Inserter<T> {
    Inserter::new()
}

/// Builder for `INSERT INTO <table> (<columns>) VALUES (...), (...)`.
///
/// Each row value contributes one placeholder group, bound in descriptor
/// column order.
#[must_use]
pub struct Inserter<T: Model> {
    rows: Vec<T>,
    skip_pk: bool,
    timeout: Option<Duration>,
}

impl<T: Model> Inserter<T> {
    /// Create a new INSERT builder.
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            skip_pk: false,
            timeout: None,
        }
    }

    /// Exclude the primary-key column from the column list and from each
    /// row's bound values, letting the database assign the key.
    pub fn skip_pk(mut self) -> Self {
        self.skip_pk = true;
        self
    }

    /// Add one row value.
    pub fn value(mut self, row: T) -> Self {
        self.rows.push(row);
        self
    }

    /// Add several row values.
    pub fn values(mut self, rows: impl IntoIterator<Item = T>) -> Self {
        self.rows.extend(rows);
        self
    }

    /// Bound the execution with a time budget.
    pub fn timeout(mut self, budget: Duration) -> Self {
        self.timeout = Some(budget);
        self
    }

    /// Render the statement without executing it.
    ///
    /// Fails with [`Error::NoValues`] when no rows were supplied; this is
    /// detected here, before any SQL is sent to the driver.
    pub fn build(&self) -> Result<Statement> {
        if self.rows.is_empty() {
            return Err(Error::NoValues);
        }
        let table = descriptor::<T>()?;
        let columns: Vec<&str> = table
            .insert_columns(self.skip_pk)
            .map(|c| c.column)
            .collect();
        if columns.is_empty() {
            return Err(Error::metadata(format!(
                "table '{}' has no insertable columns",
                table.table
            )));
        }

        let mut params = ParamList::new();
        let mut groups = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            let values = row.bind(self.skip_pk);
            if values.len() != columns.len() {
                return Err(Error::metadata(format!(
                    "model bound {} values for {} columns on '{}'",
                    values.len(),
                    columns.len(),
                    table.table
                )));
            }
            let placeholders: Vec<String> = values
                .into_iter()
                .map(|v| format!("${}", params.push(v)))
                .collect();
            groups.push(format!("({})", placeholders.join(", ")));
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES {}",
            table.table,
            columns.join(", "),
            groups.join(", ")
        );
        Ok(Statement::new(sql, params))
    }

    /// Execute and return the affected-row count.
    ///
    /// Driver errors, constraint violations included, surface as
    /// [`Error::Execution`] with the original diagnostic preserved.
    pub async fn exec(&self, client: &impl GenericClient) -> Result<ExecResult> {
        let stmt = self.build()?;
        engine::run_exec(client, &stmt, self.timeout).await
    }
}

impl<T: Model> Default for Inserter<T> {
    fn default() -> Self {
        Self::new()
    }
}
