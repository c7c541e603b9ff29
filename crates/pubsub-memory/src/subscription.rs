use crate::error::Error;
use crate::message::MemoryMessage;
use crate::{ProjectState, SubscriptionState};

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use async_trait::async_trait;
use streamadapter_pubsub::handler::MessageHandler;
use streamadapter_pubsub::subscription::Subscription;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// A subscription in the in-memory service.
#[derive(Clone)]
pub struct MemorySubscription {
    id: String,
    project: Arc<ProjectState>,
}

impl Debug for MemorySubscription {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("MemorySubscription")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl MemorySubscription {
    pub(crate) const fn new(id: String, project: Arc<ProjectState>) -> Self {
        Self { id, project }
    }

    /// The topic the subscription is attached to, or `None` if it was deleted or the
    /// subscription does not exist.
    #[must_use]
    pub fn topic_id(&self) -> Option<String> {
        self.state().ok()?.topic.lock().clone()
    }

    fn state(&self) -> Result<Arc<SubscriptionState>, Error> {
        self.project
            .resources
            .lock()
            .subscriptions
            .get(&self.id)
            .cloned()
            .ok_or_else(|| Error::SubscriptionNotFound(self.id.clone()))
    }
}

#[async_trait]
impl Subscription for MemorySubscription {
    type Error = Error;

    type Message = MemoryMessage;

    fn id(&self) -> &str {
        &self.id
    }

    async fn exists(&self) -> Result<bool, Error> {
        Ok(self
            .project
            .resources
            .lock()
            .subscriptions
            .contains_key(&self.id))
    }

    async fn delete(&self) -> Result<(), Error> {
        let state = {
            let mut resources = self.project.resources.lock();
            let Some(state) = resources.subscriptions.remove(&self.id) else {
                return Err(Error::SubscriptionNotFound(self.id.clone()));
            };
            if let Some(topic_id) = state.topic.lock().as_ref() {
                if let Some(attached) = resources.topics.get_mut(topic_id) {
                    attached.remove(&self.id);
                }
            }
            state
        };

        state.delete();

        debug!(subscription = %self.id, "deleted subscription");

        Ok(())
    }

    async fn receive<X>(&self, cancel: CancellationToken, handler: X) -> Result<(), Error>
    where
        X: MessageHandler<MemoryMessage>,
    {
        let state = self.state()?;

        loop {
            if cancel.is_cancelled() {
                return Err(Error::Canceled);
            }
            if state.is_deleted() {
                return Err(Error::SubscriptionNotFound(self.id.clone()));
            }

            let next = state.pop();
            match next {
                Some(stored) => {
                    handler
                        .handle(MemoryMessage::new(stored, state.clone()))
                        .await;
                }
                None => {
                    tokio::select! {
                        () = cancel.cancelled() => {}
                        () = state.notify.notified() => {}
                    }
                }
            }
        }
    }
}
