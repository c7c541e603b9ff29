use crate::error::Error;
use crate::subscription::MemorySubscription;
use crate::topic::MemoryTopic;
use crate::{ProjectState, SubscriptionState, project_state};

use std::collections::HashSet;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use async_trait::async_trait;
use streamadapter_pubsub::client::{Client, ClientOptions, SubscriptionConfig};
use streamadapter_pubsub::topic::Topic;
use tracing::debug;

/// Options for the in-memory client (there are none).
#[derive(Clone, Debug, Default)]
pub struct MemoryClientOptions;
impl ClientOptions for MemoryClientOptions {}

/// A client of the in-memory service.
///
/// Clients created for the same project id see the same topics and subscriptions.
#[derive(Clone)]
pub struct MemoryClient {
    project: Arc<ProjectState>,
    project_id: String,
}

impl Debug for MemoryClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("MemoryClient")
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}

impl MemoryClient {
    /// Ids of every topic in the project, sorted.
    #[must_use]
    pub fn topic_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.project.resources.lock().topics.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Ids of every subscription in the project, sorted.
    #[must_use]
    pub fn subscription_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .project
            .resources
            .lock()
            .subscriptions
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }

    /// Number of messages waiting for delivery on a subscription, or `None` if it does not exist.
    #[must_use]
    pub fn pending(&self, subscription_id: &str) -> Option<usize> {
        self.project
            .resources
            .lock()
            .subscriptions
            .get(subscription_id)
            .map(|state| state.queue.lock().len())
    }
}

#[async_trait]
impl Client for MemoryClient {
    type Error = Error;

    type Options = MemoryClientOptions;

    type Topic = MemoryTopic;

    type Subscription = MemorySubscription;

    async fn new(project_id: String, _options: MemoryClientOptions) -> Result<Self, Error> {
        Ok(Self {
            project: project_state(&project_id),
            project_id,
        })
    }

    fn project_id(&self) -> &str {
        &self.project_id
    }

    fn topic<K>(&self, id: K) -> MemoryTopic
    where
        K: Into<String>,
    {
        MemoryTopic::new(id.into(), self.project.clone())
    }

    fn subscription<K>(&self, id: K, _topic: &MemoryTopic) -> MemorySubscription
    where
        K: Into<String>,
    {
        MemorySubscription::new(id.into(), self.project.clone())
    }

    async fn create_topic<K>(&self, id: K) -> Result<MemoryTopic, Error>
    where
        K: Into<String> + Send,
    {
        let id = id.into();

        {
            let mut resources = self.project.resources.lock();
            if resources.topics.contains_key(&id) {
                return Err(Error::TopicAlreadyExists(id));
            }
            resources.topics.insert(id.clone(), HashSet::new());
        }

        debug!(project = %self.project_id, topic = %id, "created topic");

        Ok(self.topic(id))
    }

    async fn create_subscription<K>(
        &self,
        id: K,
        config: SubscriptionConfig<MemoryTopic>,
    ) -> Result<MemorySubscription, Error>
    where
        K: Into<String> + Send,
    {
        let id = id.into();
        let topic_id = config.topic.id().to_string();

        {
            let mut resources = self.project.resources.lock();
            if resources.subscriptions.contains_key(&id) {
                return Err(Error::SubscriptionAlreadyExists(id));
            }
            let Some(attached) = resources.topics.get_mut(&topic_id) else {
                return Err(Error::TopicNotFound(topic_id));
            };
            attached.insert(id.clone());
            resources
                .subscriptions
                .insert(
                    id.clone(),
                    Arc::new(SubscriptionState::new(
                        id.clone(),
                        topic_id.clone(),
                        config.ack_deadline,
                    )),
                );
        }

        debug!(
            project = %self.project_id,
            topic = %topic_id,
            subscription = %id,
            ack_deadline = ?config.ack_deadline,
            "created subscription"
        );

        Ok(self.subscription(id, &config.topic))
    }
}
