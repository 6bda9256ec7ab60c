//! Raw SQL passthrough for statements the builders cannot express.

use crate::client::GenericClient;
use crate::engine::{self, ExecResult};
use crate::error::Result;
use crate::param::{Param, ParamList};
use crate::statement::Statement;
use std::time::Duration;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// Start a raw statement from hand-written SQL.
///
/// No table descriptor is involved, so no column-order guarantees apply.
/// Typical use is DDL:
///
/// ```ignore
/// structsql::raw("CREATE TABLE IF NOT EXISTS test_model (id BIGINT PRIMARY KEY)")
///     .exec(&client)
///     .await?;
/// ```
pub fn raw(sql: impl Into<String>) -> RawStatement {
    RawStatement {
        sql: sql.into(),
        params: ParamList::new(),
        timeout: None,
    }
}

/// A hand-written SQL statement with type-safe parameter binding.
#[must_use]
pub struct RawStatement {
    sql: String,
    params: ParamList,
    timeout: Option<Duration>,
}

impl RawStatement {
    /// Bind the next positional parameter.
    pub fn bind<T: ToSql + Send + Sync + 'static>(mut self, value: T) -> Self {
        self.params.push(Param::new(value));
        self
    }

    /// Bound the execution with a time budget.
    pub fn timeout(mut self, budget: Duration) -> Self {
        self.timeout = Some(budget);
        self
    }

    /// The statement as the engine will see it.
    pub fn build(&self) -> Statement {
        Statement::new(self.sql.clone(), self.params.clone())
    }

    /// Execute and return the affected-row count.
    pub async fn exec(&self, client: &impl GenericClient) -> Result<ExecResult> {
        let stmt = self.build();
        engine::run_exec(client, &stmt, self.timeout).await
    }

    /// Execute and return all rows, undecoded.
    pub async fn query(&self, client: &impl GenericClient) -> Result<Vec<Row>> {
        let stmt = self.build();
        engine::run_query(client, &stmt, self.timeout).await
    }
}
