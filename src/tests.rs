//! Cross-module scenarios: producers, queue, transport and server together.

use crate::client::{resource_url, HttpTransport, Transport};
use crate::merge::merged;
use crate::protocol::CONFIGURATION_PATH;
use crate::queue::{CoalescingWriteQueue, EditSink, QueueState};
use crate::server::{router, ConfigurationStore};
use crate::types::Edit;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use support::{edit, GatedTransport, RecordingTransport};

pub(crate) mod support {
    use crate::client::Transport;
    use crate::error::Result;
    use crate::merge::merge_into;
    use crate::types::{Document, Edit};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::{Map, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::{mpsc, oneshot};

    pub fn edit(value: Value) -> Edit {
        Edit::try_from(value).unwrap()
    }

    #[derive(Default)]
    struct InFlight {
        current: AtomicUsize,
        max: AtomicUsize,
    }

    impl InFlight {
        fn enter(&self) {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.max.fetch_max(now, Ordering::SeqCst);
        }

        fn leave(&self) {
            self.current.fetch_sub(1, Ordering::SeqCst);
        }
    }

    /// A write the test decides when (and how) to complete.
    pub struct PendingWrite {
        pub url: String,
        pub document: Document,
        done: oneshot::Sender<Result<()>>,
    }

    impl PendingWrite {
        pub fn complete(self, result: Result<()>) {
            let _ = self.done.send(result);
        }
    }

    /// Transport whose writes block until the test completes them.
    pub struct GatedTransport {
        writes: mpsc::UnboundedSender<PendingWrite>,
        in_flight: InFlight,
    }

    impl GatedTransport {
        pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<PendingWrite>) {
            let (writes, rx) = mpsc::unbounded_channel();
            let transport = Arc::new(GatedTransport {
                writes,
                in_flight: InFlight::default(),
            });
            (transport, rx)
        }

        pub fn max_in_flight(&self) -> usize {
            self.in_flight.max.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for GatedTransport {
        async fn get(&self, _url: &str) -> Result<Document> {
            Ok(Value::Object(Map::new()))
        }

        async fn put(&self, url: &str, document: &Document) -> Result<()> {
            self.in_flight.enter();
            let (done, wait) = oneshot::channel();
            let _ = self.writes.send(PendingWrite {
                url: url.to_string(),
                document: document.clone(),
                done,
            });
            let result = wait.await.unwrap_or(Ok(()));
            self.in_flight.leave();
            result
        }
    }

    /// Transport that completes every write after `latency`, applying it to
    /// an in-memory document and recording each payload.
    pub struct RecordingTransport {
        latency: Duration,
        document: Mutex<Map<String, Value>>,
        writes: Mutex<Vec<Document>>,
        in_flight: InFlight,
    }

    impl RecordingTransport {
        pub fn new(latency: Duration) -> Arc<Self> {
            Arc::new(RecordingTransport {
                latency,
                document: Mutex::new(Map::new()),
                writes: Mutex::new(Vec::new()),
                in_flight: InFlight::default(),
            })
        }

        pub fn document(&self) -> Document {
            Value::Object(self.document.lock().clone())
        }

        pub fn writes(&self) -> Vec<Document> {
            self.writes.lock().clone()
        }

        pub fn max_in_flight(&self) -> usize {
            self.in_flight.max.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn get(&self, _url: &str) -> Result<Document> {
            Ok(self.document())
        }

        async fn put(&self, _url: &str, document: &Document) -> Result<()> {
            self.in_flight.enter();
            tokio::time::sleep(self.latency).await;
            if let Value::Object(edit) = document {
                merge_into(&mut self.document.lock(), edit);
            }
            self.writes.lock().push(document.clone());
            self.in_flight.leave();
            Ok(())
        }
    }
}

const URL: &str = "http://rig.local/api/configuration";

#[tokio::test]
async fn test_second_generation_is_merge_of_its_edits() {
    let (transport, mut writes) = GatedTransport::new();
    let queue = CoalescingWriteQueue::new(URL, transport).unwrap();

    let e1 = json!({"limits": {"pan": [0, 10]}});
    let e2 = json!({"limits": {"tilt": [1, 2]}, "mode": "search"});
    let e3 = json!({"limits": {"tilt": [3, 4]}});

    queue.add(edit(e1.clone()));
    let first = writes.recv().await.unwrap();
    assert_eq!(first.document, e1);

    queue.add(edit(e2.clone()));
    queue.add(edit(e3.clone()));
    first.complete(Ok(()));

    let second = writes.recv().await.unwrap();
    assert_eq!(second.document, merged([&e2, &e3]).unwrap());
    second.complete(Ok(()));
    queue.flushed().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_producers_single_flight_no_lost_edits() {
    let transport = RecordingTransport::new(Duration::from_millis(2));
    let queue = CoalescingWriteQueue::new(URL, transport.clone()).unwrap();

    let mut producers = Vec::new();
    for producer in 0..8 {
        let sink: Arc<dyn EditSink> = Arc::new(queue.clone());
        producers.push(tokio::spawn(async move {
            for step in 0..25 {
                sink.add(Edit::at(
                    [format!("producer{producer}"), format!("step{step}")],
                    json!(step),
                ));
                tokio::time::sleep(Duration::from_micros(300)).await;
            }
        }));
    }
    for producer in producers {
        producer.await.unwrap();
    }
    queue.flushed().await;

    assert_eq!(queue.state(), QueueState::Idle);
    assert_eq!(transport.max_in_flight(), 1);

    let document = transport.document();
    for producer in 0..8 {
        for step in 0..25 {
            assert_eq!(
                document[format!("producer{producer}")][format!("step{step}")],
                json!(step)
            );
        }
    }
    assert!(transport.writes().len() < 200);
    assert_eq!(transport.writes().len() as u64, queue.generation());
}

#[tokio::test]
async fn test_last_merged_edit_wins_within_generation() {
    let transport = RecordingTransport::new(Duration::from_millis(5));
    let queue = CoalescingWriteQueue::new(URL, transport.clone()).unwrap();

    queue.add(Edit::at(["tracking", "color", "min_hsv"], json!([0, 0, 0])));
    for hue in 1..=10 {
        queue.add(Edit::at(["tracking", "color", "min_hsv"], json!([hue, 0, 0])));
    }
    queue.flushed().await;

    let writes = transport.writes();
    assert_eq!(writes.len(), 2);
    assert_eq!(
        writes[1],
        json!({"tracking": {"color": {"min_hsv": [10, 0, 0]}}})
    );
}

#[tokio::test]
async fn test_queue_against_http_server() {
    let store = ConfigurationStore::default();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(store.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let url = resource_url(&format!("http://{addr}"), CONFIGURATION_PATH).unwrap();
    let transport = Arc::new(HttpTransport::new().unwrap());
    let queue = CoalescingWriteQueue::new(url.clone(), transport.clone()).unwrap();
    let mut reports = queue.reports();

    let initial = transport.get(&url).await.unwrap();
    assert_eq!(initial["tracking"]["color"]["min_hsv"], json!([69, 30, 114]));

    queue.add(Edit::at(["limits", "pan"], json!([-90, 90])));
    queue.add(Edit::at(["limits", "tilt"], json!([-10, 30])));
    queue.add(Edit::at(["tracking", "color", "max_hsv"], json!([120, 255, 255])));
    queue.flushed().await;

    let first = reports.recv().await.unwrap();
    assert!(first.outcome.is_delivered());

    let remote = transport.get(&url).await.unwrap();
    assert_eq!(
        remote["limits"],
        json!({"areLimitsAppliedInManualMode": false, "pan": [-90, 90], "tilt": [-10, 30]})
    );
    assert_eq!(remote["tracking"]["color"]["min_hsv"], json!([69, 30, 114]));
    assert_eq!(remote["tracking"]["color"]["max_hsv"], json!([120, 255, 255]));
    assert_eq!(store.snapshot(), remote);
}

#[tokio::test]
async fn test_unreachable_server_does_not_stall_queue() {
    let transport = HttpTransport::with_config(crate::client::ClientConfig {
        request_timeout_ms: 500,
        enable_logging: false,
        ..Default::default()
    })
    .unwrap();
    let url = "http://127.0.0.1:1/api/configuration";
    let queue = CoalescingWriteQueue::new(url, transport).unwrap();
    let mut reports = queue.reports();

    queue.add(Edit::new().with("h", json!(10)));
    queue.add(Edit::new().with("s", json!(50)));
    queue.flushed().await;

    for generation in 1..=2 {
        let report = reports.recv().await.unwrap();
        assert_eq!(report.generation, generation);
        assert!(!report.outcome.is_delivered());
    }
    assert_eq!(queue.state(), QueueState::Idle);
}
