//! Lazy, decoded row sequences.

use crate::client::RowStream;
use crate::engine::Deadline;
use crate::error::{Error, Result};
use crate::meta::Model;
use futures_core::Stream;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio_postgres::Row;

/// A row stream with an absolute deadline checked on every poll.
///
/// When the deadline passes, the next pull yields [`Error::Timeout`] and the
/// underlying cursor is dropped, releasing its connection resource. The
/// sequence is finite and forward-only; once it ends (normally or not) it
/// stays ended.
#[must_use]
pub(crate) struct DeadlineRows {
    inner: Option<RowStream>,
    deadline: Option<(Duration, Pin<Box<tokio::time::Sleep>>)>,
}

impl DeadlineRows {
    pub(crate) fn new(inner: RowStream, deadline: Option<Deadline>) -> Self {
        Self {
            inner: Some(inner),
            deadline: deadline
                .map(|(budget, at)| (budget, Box::pin(tokio::time::sleep_until(at)))),
        }
    }
}

impl Stream for DeadlineRows {
    type Item = Result<Row>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        let Some(inner) = this.inner.as_mut() else {
            return Poll::Ready(None);
        };

        if let Some((budget, sleep)) = this.deadline.as_mut() {
            if sleep.as_mut().poll(cx).is_ready() {
                let budget = *budget;
                // Release the cursor before reporting the failed pull.
                this.inner = None;
                this.deadline = None;
                return Poll::Ready(Some(Err(Error::Timeout(budget))));
            }
        }

        match Pin::new(inner).poll_next(cx) {
            Poll::Ready(None) => {
                this.inner = None;
                this.deadline = None;
                Poll::Ready(None)
            }
            other => other,
        }
    }
}

/// Decoded, forward-only result sequence for a select.
///
/// Each pull decodes the next row into `T` or signals end-of-sequence.
/// Dropping the stream early releases the underlying cursor.
#[must_use = "streams do nothing unless polled"]
pub struct ModelStream<T> {
    rows: DeadlineRows,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ModelStream<T> {
    pub(crate) fn new(rows: DeadlineRows) -> Self {
        Self {
            rows,
            _marker: PhantomData,
        }
    }
}

impl<T: Model> Stream for ModelStream<T> {
    type Item = Result<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match Pin::new(&mut this.rows).poll_next(cx) {
            Poll::Ready(Some(Ok(row))) => Poll::Ready(Some(T::from_row(&row))),
            Poll::Ready(Some(Err(e))) => Poll::Ready(Some(Err(e))),
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::start_deadline;
    use futures_util::StreamExt;

    #[tokio::test]
    async fn deadline_expiry_fails_the_next_pull() {
        let inner = RowStream::new(futures_util::stream::pending());
        let deadline = start_deadline(Some(Duration::from_millis(10)));
        let mut rows = DeadlineRows::new(inner, deadline);

        let item = rows.next().await.expect("deadline should yield an item");
        assert!(matches!(item, Err(Error::Timeout(_))));

        // The sequence is finished afterwards; the cursor is gone.
        assert!(rows.next().await.is_none());
    }

    #[tokio::test]
    async fn exhausted_stream_ends_before_the_deadline() {
        let inner = RowStream::new(futures_util::stream::empty());
        let deadline = start_deadline(Some(Duration::from_secs(60)));
        let mut rows = DeadlineRows::new(inner, deadline);

        assert!(rows.next().await.is_none());
        assert!(rows.next().await.is_none());
    }

    #[tokio::test]
    async fn unbounded_stream_has_no_deadline() {
        let inner = RowStream::new(futures_util::stream::empty());
        let mut rows = DeadlineRows::new(inner, None);
        assert!(rows.next().await.is_none());
    }
}
