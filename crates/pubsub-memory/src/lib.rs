//! In-memory implementation of the pubsub crate.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;

/// Clients are scoped to a project and share its resources process-wide.
pub mod client;

/// Messages delivered from in-memory subscriptions.
pub mod message;

/// Subscriptions buffer a copy of every message published to their topic.
pub mod subscription;

/// Topics fan messages out to their subscriptions.
pub mod topic;

pub use client::{MemoryClient, MemoryClientOptions};
pub use error::Error;
pub use message::MemoryMessage;
pub use subscription::MemorySubscription;
pub use topic::MemoryTopic;

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use bytes::Bytes;
use parking_lot::Mutex;
use tokio::sync::Notify;

static GLOBAL_STATE: LazyLock<Mutex<HashMap<String, Arc<ProjectState>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

fn project_state(project_id: &str) -> Arc<ProjectState> {
    GLOBAL_STATE
        .lock()
        .entry(project_id.to_string())
        .or_default()
        .clone()
}

#[derive(Debug, Default)]
struct ProjectState {
    next_message_id: AtomicU64,
    resources: Mutex<Resources>,
}

impl ProjectState {
    fn next_message_id(&self) -> String {
        (self.next_message_id.fetch_add(1, Ordering::SeqCst) + 1).to_string()
    }
}

#[derive(Debug, Default)]
struct Resources {
    /// Topic id to the ids of its attached subscriptions.
    topics: HashMap<String, HashSet<String>>,
    subscriptions: HashMap<String, Arc<SubscriptionState>>,
}

#[derive(Clone, Debug)]
struct StoredMessage {
    id: String,
    data: Bytes,
    delivery_attempt: u32,
}

#[derive(Debug)]
struct SubscriptionState {
    ack_deadline: Duration,
    deleted: AtomicBool,
    id: String,
    notify: Notify,
    queue: Mutex<VecDeque<StoredMessage>>,
    /// `None` once the topic has been deleted.
    topic: Mutex<Option<String>>,
}

impl SubscriptionState {
    fn new(id: String, topic: String, ack_deadline: Duration) -> Self {
        Self {
            ack_deadline,
            deleted: AtomicBool::new(false),
            id,
            notify: Notify::new(),
            queue: Mutex::new(VecDeque::new()),
            topic: Mutex::new(Some(topic)),
        }
    }

    fn push(&self, message: StoredMessage) {
        self.queue.lock().push_back(message);
        self.notify.notify_one();
    }

    fn requeue(&self, message: StoredMessage) {
        if self.is_deleted() {
            return;
        }
        self.queue.lock().push_front(message);
        self.notify.notify_one();
    }

    fn pop(&self) -> Option<StoredMessage> {
        self.queue.lock().pop_front()
    }

    fn detach(&self) {
        *self.topic.lock() = None;
    }

    fn delete(&self) {
        self.deleted.store(true, Ordering::SeqCst);
        self.queue.lock().clear();
        self.notify.notify_waiters();
        self.notify.notify_one();
    }

    fn is_deleted(&self) -> bool {
        self.deleted.load(Ordering::SeqCst)
    }
}
