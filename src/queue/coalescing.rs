use crate::client::Transport;
use crate::error::{Result, SyncError};
use crate::queue::reports::{WriteOutcome, WriteReport, WriteReports};
use crate::types::Edit;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, Notify};

const REPORT_CAPACITY: usize = 64;

/// Where a queue is in its write cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueState {
    /// No write outstanding, nothing pending.
    Idle,
    /// A write is outstanding and nothing has arrived since it started.
    Sending,
    /// A write is outstanding and edits are waiting for the next one.
    SendingWithPending,
}

/// The single operation producers are given.
///
/// Producers hold an `Arc<dyn EditSink>` and never see the queue itself.
pub trait EditSink: Send + Sync {
    /// Submit a partial edit. Never blocks and never fails.
    fn add(&self, edit: Edit);
}

#[derive(Default)]
struct Cycle {
    in_flight: bool,
    pending: Option<Edit>,
    pending_edits: usize,
    generation: u64,
}

struct Shared {
    url: String,
    transport: Arc<dyn Transport>,
    cycle: Mutex<Cycle>,
    idle: Notify,
    reports: broadcast::Sender<WriteReport>,
}

impl Shared {
    /// Issue writes until nothing is pending. Only one drain runs per queue.
    async fn drain(self: Arc<Self>, first: Edit, generation: u64) {
        let mut payload = first;
        let mut generation = generation;
        let mut edits = 1;

        loop {
            let document = payload.into_document();
            tracing::debug!(url = %self.url, generation, edits, "Writing configuration");

            let outcome = match self.transport.put(&self.url, &document).await {
                Ok(()) => WriteOutcome::Delivered,
                Err(e) => {
                    tracing::warn!(
                        url = %self.url,
                        generation,
                        "Configuration write failed: {}",
                        e
                    );
                    WriteOutcome::Failed(e.to_string())
                }
            };
            // No subscribers is the normal case.
            let _ = self.reports.send(WriteReport {
                generation,
                edits,
                outcome,
            });

            let next = {
                let mut cycle = self.cycle.lock();
                let pending = cycle.pending.take();
                match pending {
                    Some(next) => {
                        cycle.generation += 1;
                        Some((next, cycle.generation, std::mem::take(&mut cycle.pending_edits)))
                    }
                    None => {
                        cycle.in_flight = false;
                        None
                    }
                }
            };

            match next {
                Some((next, next_generation, next_edits)) => {
                    payload = next;
                    generation = next_generation;
                    edits = next_edits;
                }
                None => {
                    self.idle.notify_waiters();
                    return;
                }
            }
        }
    }
}

/// Serializes writes to one remote resource, coalescing edits that arrive
/// while a write is outstanding.
///
/// The first [`add`](Self::add) on an idle queue is written immediately.
/// Every `add` made while that write is outstanding is merged into a single
/// pending edit, written as soon as the outstanding one resolves. At most
/// one write is ever in flight, and no accepted edit is dropped.
///
/// A failed write counts as completed: it is logged, published to
/// [`reports`](Self::reports), and the queue moves on. A transport that
/// never resolves stalls the queue for good.
///
/// Cloning yields another handle to the same queue.
///
/// # Examples
///
/// ```ignore
/// use rig_config_sync::{CoalescingWriteQueue, Edit, HttpTransport};
/// use serde_json::json;
///
/// let queue = CoalescingWriteQueue::new(
///     "http://localhost:9000/api/configuration",
///     HttpTransport::new()?,
/// )?;
/// queue.add(Edit::at(["limits", "pan"], json!([-90, 90])));
/// queue.add(Edit::at(["limits", "tilt"], json!([-10, 30])));
/// queue.flushed().await;
/// ```
#[derive(Clone)]
pub struct CoalescingWriteQueue {
    shared: Arc<Shared>,
    runtime: Handle,
}

impl CoalescingWriteQueue {
    /// Create a queue for `url`, driven by the current tokio runtime.
    ///
    /// # Errors
    ///
    /// [`SyncError::NoRuntime`] when called outside a tokio runtime.
    pub fn new(url: impl Into<String>, transport: impl Transport) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| SyncError::NoRuntime)?;
        Ok(Self::with_handle(url, transport, runtime))
    }

    /// Create a queue whose writes run on `runtime`.
    pub fn with_handle(url: impl Into<String>, transport: impl Transport, runtime: Handle) -> Self {
        let (reports, _) = broadcast::channel(REPORT_CAPACITY);
        CoalescingWriteQueue {
            shared: Arc::new(Shared {
                url: url.into(),
                transport: Arc::new(transport),
                cycle: Mutex::new(Cycle::default()),
                idle: Notify::new(),
                reports,
            }),
            runtime,
        }
    }

    /// Submit an edit.
    ///
    /// Writes it now if the queue is idle, otherwise merges it into the
    /// pending edit for the next write. Returns immediately.
    pub fn add(&self, edit: Edit) {
        let mut cycle = self.shared.cycle.lock();

        if cycle.in_flight {
            cycle.pending.get_or_insert_with(Edit::new).merge(&edit);
            cycle.pending_edits += 1;
            tracing::debug!(
                url = %self.shared.url,
                pending_edits = cycle.pending_edits,
                "Coalesced edit into next write"
            );
            return;
        }

        cycle.in_flight = true;
        cycle.generation += 1;
        let generation = cycle.generation;
        drop(cycle);

        self.runtime.spawn(self.shared.clone().drain(edit, generation));
    }

    /// Current position in the write cycle.
    pub fn state(&self) -> QueueState {
        let cycle = self.shared.cycle.lock();
        match (cycle.in_flight, cycle.pending.is_some()) {
            (false, _) => QueueState::Idle,
            (true, false) => QueueState::Sending,
            (true, true) => QueueState::SendingWithPending,
        }
    }

    /// Number of generations started so far.
    pub fn generation(&self) -> u64 {
        self.shared.cycle.lock().generation
    }

    /// The resource this queue writes to.
    pub fn url(&self) -> &str {
        &self.shared.url
    }

    /// Subscribe to per-generation write reports.
    pub fn reports(&self) -> WriteReports {
        WriteReports::new(self.shared.reports.subscribe())
    }

    /// Wait until no write is outstanding and nothing is pending.
    pub async fn flushed(&self) {
        loop {
            let notified = self.shared.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let in_flight = self.shared.cycle.lock().in_flight;
            if !in_flight {
                return;
            }
            notified.await;
        }
    }
}

impl EditSink for CoalescingWriteQueue {
    fn add(&self, edit: Edit) {
        CoalescingWriteQueue::add(self, edit);
    }
}

impl std::fmt::Debug for CoalescingWriteQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoalescingWriteQueue")
            .field("url", &self.shared.url)
            .field("state", &self.state())
            .finish()
    }
}
