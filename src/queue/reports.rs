//! Per-generation write reports.
//!
//! The queue treats every resolved write as complete, success or not.
//! Observers that want to know when a write failed can subscribe to a
//! [`WriteReports`] stream; nothing about coalescing depends on anyone
//! listening.
//!
//! # Examples
//!
//! ```ignore
//! use futures::StreamExt;
//!
//! let mut reports = queue.reports();
//! while let Some(report) = reports.next().await {
//!     if let WriteOutcome::Failed(reason) = &report.outcome {
//!         eprintln!("generation {} lost: {}", report.generation, reason);
//!     }
//! }
//! ```

use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;

/// How a single write resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The transport reported success.
    Delivered,
    /// The transport reported an error; the queue moved on regardless.
    Failed(String),
}

impl WriteOutcome {
    /// Whether the write reached the remote resource.
    pub fn is_delivered(&self) -> bool {
        matches!(self, WriteOutcome::Delivered)
    }
}

/// Summary of one generation's write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReport {
    /// Generation number, counted from 1 over the queue's lifetime.
    pub generation: u64,
    /// Number of `add` calls coalesced into this write.
    pub edits: usize,
    /// How the write resolved.
    pub outcome: WriteOutcome,
}

/// Stream of [`WriteReport`]s from one queue.
///
/// Ends when the queue is dropped. A subscriber that falls behind skips the
/// reports it missed.
pub struct WriteReports {
    inner: BroadcastStream<WriteReport>,
}

impl WriteReports {
    pub(crate) fn new(receiver: broadcast::Receiver<WriteReport>) -> Self {
        WriteReports {
            inner: BroadcastStream::new(receiver),
        }
    }

    /// Receive the next report, or `None` once the queue is gone.
    pub async fn recv(&mut self) -> Option<WriteReport> {
        futures::StreamExt::next(self).await
    }
}

impl Stream for WriteReports {
    type Item = WriteReport;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(report))) => return Poll::Ready(Some(report)),
                Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(skipped)))) => {
                    tracing::warn!(skipped, "Write report subscriber lagged");
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
