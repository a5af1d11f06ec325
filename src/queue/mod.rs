//! Coalescing write queue for a remote configuration resource.
//!
//! Producers (UI widgets, scripts, anything holding an [`EditSink`]) submit
//! partial edits whenever they like. The queue turns that stream of edits
//! into a sequence of *generations*: one write at a time, with every edit
//! that arrived during a write merged into the next one.
//!
//! ```text
//!            add (idle)                    put resolves, nothing pending
//!   Idle ─────────────────▶ Sending ───────────────────────────────────▶ Idle
//!                            │   ▲
//!                add (busy)  │   │ put resolves: take pending, write it
//!                            ▼   │
//!                     SendingWithPending ◀── add (busy): merge into pending
//! ```
//!
//! # Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`CoalescingWriteQueue`] | The per-resource queue |
//! | [`EditSink`] | Producer-facing `add` capability |
//! | [`QueueState`] | Idle / Sending / SendingWithPending |
//! | [`WriteReports`] | Optional stream of per-generation outcomes |

mod coalescing;
mod reports;

pub use coalescing::{CoalescingWriteQueue, EditSink, QueueState};
pub use reports::{WriteOutcome, WriteReport, WriteReports};
