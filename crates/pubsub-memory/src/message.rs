use crate::error::Error;
use crate::{StoredMessage, SubscriptionState};

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use async_trait::async_trait;
use bytes::Bytes;
use streamadapter_pubsub::message::Message;

/// A message delivered from an in-memory subscription.
///
/// Dropping the message without acknowledging it puts it back at the head of the
/// subscription queue. An ack fails once the subscription's ack deadline has passed or the
/// subscription is gone, and the message is then redelivered as if never acked.
pub struct MemoryMessage {
    acked: AtomicBool,
    delivered_at: Instant,
    stored: StoredMessage,
    subscription: Arc<SubscriptionState>,
}

impl Debug for MemoryMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("MemoryMessage")
            .field("id", &self.stored.id)
            .field("delivery_attempt", &self.stored.delivery_attempt)
            .field("acked", &self.acked)
            .finish_non_exhaustive()
    }
}

impl MemoryMessage {
    pub(crate) fn new(mut stored: StoredMessage, subscription: Arc<SubscriptionState>) -> Self {
        stored.delivery_attempt += 1;

        Self {
            acked: AtomicBool::new(false),
            delivered_at: Instant::now(),
            stored,
            subscription,
        }
    }

    /// How many times this message has been delivered, starting at 1.
    #[must_use]
    pub const fn delivery_attempt(&self) -> u32 {
        self.stored.delivery_attempt
    }
}

#[async_trait]
impl Message for MemoryMessage {
    type Error = Error;

    fn id(&self) -> &str {
        &self.stored.id
    }

    fn data(&self) -> &Bytes {
        &self.stored.data
    }

    async fn ack(&self) -> Result<(), Error> {
        if self.subscription.is_deleted() {
            return Err(Error::SubscriptionNotFound(self.subscription.id.clone()));
        }
        if self.delivered_at.elapsed() >= self.subscription.ack_deadline {
            return Err(Error::AckDeadlineExceeded(self.stored.id.clone()));
        }

        self.acked.store(true, Ordering::SeqCst);
        Ok(())
    }
}

impl Drop for MemoryMessage {
    fn drop(&mut self) {
        if !self.acked.load(Ordering::SeqCst) {
            self.subscription.requeue(self.stored.clone());
        }
    }
}
