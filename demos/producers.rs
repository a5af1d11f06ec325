//! Producer example
//!
//! Simulates two UI widgets dragging sliders against a running
//! `config_server`. Each widget reads the initial document once, then pushes
//! partial edits through a shared coalescing queue.
//!
//! Run with: cargo run --example producers -- http://localhost:9000

use futures::StreamExt;
use rig_config_sync::client::resource_url;
use rig_config_sync::protocol::CONFIGURATION_PATH;
use rig_config_sync::{CoalescingWriteQueue, Edit, EditSink, HttpTransport, Transport, WriteOutcome};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

async fn pan_limit_editor(sink: Arc<dyn EditSink>) {
    for width in (10..=90).step_by(10) {
        sink.add(Edit::at(["limits", "pan"], json!([-width, width])));
        tokio::time::sleep(Duration::from_millis(15)).await;
    }
    sink.add(Edit::at(["limits", "areLimitsAppliedInManualMode"], json!(true)));
}

async fn color_picker(sink: Arc<dyn EditSink>, initial_min: serde_json::Value) {
    let hue = initial_min[0].as_i64().unwrap_or(0);
    for offset in 0..10 {
        sink.add(Edit::at(
            ["tracking", "color", "min_hsv"],
            json!([hue + offset, 30, 114]),
        ));
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    let base = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://localhost:9000".to_string());
    let url = resource_url(&base, CONFIGURATION_PATH)?;

    let transport = Arc::new(HttpTransport::new()?);
    let initial = transport.get(&url).await?;
    println!("Initial configuration: {initial:#}");

    let queue = CoalescingWriteQueue::new(url.clone(), transport.clone())?;
    let mut reports = queue.reports();
    tokio::spawn(async move {
        while let Some(report) = reports.next().await {
            match report.outcome {
                WriteOutcome::Delivered => {
                    println!("generation {} delivered ({} edits)", report.generation, report.edits)
                }
                WriteOutcome::Failed(reason) => {
                    println!("generation {} failed: {}", report.generation, reason)
                }
            }
        }
    });

    let sink: Arc<dyn EditSink> = Arc::new(queue.clone());
    tokio::join!(
        pan_limit_editor(sink.clone()),
        color_picker(sink, initial["tracking"]["color"]["min_hsv"].clone()),
    );
    queue.flushed().await;

    println!("Final configuration: {:#}", transport.get(&url).await?);
    Ok(())
}
