use crate::error::Error;
use crate::{ProjectState, StoredMessage};

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use streamadapter_pubsub::topic::Topic;
use tracing::debug;

/// A topic in the in-memory service.
#[derive(Clone)]
pub struct MemoryTopic {
    id: String,
    project: Arc<ProjectState>,
}

impl Debug for MemoryTopic {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("MemoryTopic")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl MemoryTopic {
    pub(crate) const fn new(id: String, project: Arc<ProjectState>) -> Self {
        Self { id, project }
    }
}

#[async_trait]
impl Topic for MemoryTopic {
    type Error = Error;

    fn id(&self) -> &str {
        &self.id
    }

    async fn exists(&self) -> Result<bool, Error> {
        Ok(self.project.resources.lock().topics.contains_key(&self.id))
    }

    async fn publish(&self, data: Bytes) -> Result<String, Error> {
        let message_id = self.project.next_message_id();

        let fanout = {
            let resources = self.project.resources.lock();
            let Some(attached) = resources.topics.get(&self.id) else {
                return Err(Error::TopicNotFound(self.id.clone()));
            };

            let mut fanout = 0;
            for subscription_id in attached {
                if let Some(state) = resources.subscriptions.get(subscription_id) {
                    state.push(StoredMessage {
                        id: message_id.clone(),
                        data: data.clone(),
                        delivery_attempt: 0,
                    });
                    fanout += 1;
                }
            }
            fanout
        };

        debug!(topic = %self.id, message_id = %message_id, fanout, "published message");

        Ok(message_id)
    }

    async fn delete(&self) -> Result<(), Error> {
        {
            let mut resources = self.project.resources.lock();
            let Some(attached) = resources.topics.remove(&self.id) else {
                return Err(Error::TopicNotFound(self.id.clone()));
            };
            for subscription_id in attached {
                if let Some(state) = resources.subscriptions.get(&subscription_id) {
                    state.detach();
                }
            }
        }

        debug!(topic = %self.id, "deleted topic");

        Ok(())
    }
}
