//! Statement dispatch with deadline enforcement.
//!
//! The engine is the single place where a rendered [`Statement`] meets a
//! client. It applies the caller's time budget both before dispatch and,
//! for streaming reads, to every subsequent pull.

use crate::client::{GenericClient, StreamingClient};
use crate::error::{Error, Result};
use crate::statement::Statement;
use crate::stream::DeadlineRows;
use std::future::Future;
use std::time::Duration;
use tokio_postgres::Row;

/// Affected-row outcome of a write statement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExecResult {
    /// Number of rows the statement affected.
    pub rows_affected: u64,
}

/// A time budget pinned to an absolute instant at operation start.
pub(crate) type Deadline = (Duration, tokio::time::Instant);

/// Turn an optional budget into an absolute deadline, measured from now.
pub(crate) fn start_deadline(budget: Option<Duration>) -> Option<Deadline> {
    budget.map(|d| (d, tokio::time::Instant::now() + d))
}

async fn bounded<T>(
    deadline: Option<Deadline>,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    match deadline {
        Some((budget, at)) => match tokio::time::timeout_at(at, fut).await {
            Ok(out) => out,
            Err(_) => Err(Error::Timeout(budget)),
        },
        None => fut.await,
    }
}

fn log_dispatch(stmt: &Statement) {
    #[cfg(feature = "tracing")]
    tracing::debug!(sql = %stmt.sql, params = stmt.params.len(), "dispatching statement");
    #[cfg(not(feature = "tracing"))]
    let _ = stmt;
}

pub(crate) async fn run_query(
    client: &impl GenericClient,
    stmt: &Statement,
    budget: Option<Duration>,
) -> Result<Vec<Row>> {
    log_dispatch(stmt);
    let deadline = start_deadline(budget);
    bounded(deadline, client.query(&stmt.sql, &stmt.param_refs())).await
}

pub(crate) async fn run_query_opt(
    client: &impl GenericClient,
    stmt: &Statement,
    budget: Option<Duration>,
) -> Result<Option<Row>> {
    log_dispatch(stmt);
    let deadline = start_deadline(budget);
    bounded(deadline, client.query_opt(&stmt.sql, &stmt.param_refs())).await
}

pub(crate) async fn run_exec(
    client: &impl GenericClient,
    stmt: &Statement,
    budget: Option<Duration>,
) -> Result<ExecResult> {
    log_dispatch(stmt);
    let deadline = start_deadline(budget);
    let rows_affected = bounded(deadline, client.execute(&stmt.sql, &stmt.param_refs())).await?;
    Ok(ExecResult { rows_affected })
}

/// Open a cursor for a read and wrap it with the remaining deadline, so the
/// budget covers dispatch and iteration together.
pub(crate) async fn open_stream(
    client: &impl StreamingClient,
    stmt: &Statement,
    budget: Option<Duration>,
) -> Result<DeadlineRows> {
    log_dispatch(stmt);
    let deadline = start_deadline(budget);
    let rows = bounded(deadline, client.query_stream(&stmt.sql, &stmt.param_refs())).await?;
    Ok(DeadlineRows::new(rows, deadline))
}
