use crate::error::Error;
use crate::subscription::NatsSubscription;
use crate::topic::NatsTopic;

use std::fmt::Debug;

use async_nats::jetstream;
use async_nats::jetstream::Context as JetStreamContext;
use async_nats::jetstream::consumer::pull::Config as PullConfig;
use async_nats::jetstream::consumer::{AckPolicy, DeliverPolicy};
use async_nats::jetstream::stream::{Config as StreamConfig, StorageType};
use async_trait::async_trait;
use streamadapter_pubsub::client::{Client, ClientOptions, SubscriptionConfig};
use streamadapter_pubsub::subscription::Subscription;
use streamadapter_pubsub::topic::Topic;
use tracing::debug;

/// Server used when no URL is configured.
pub const DEFAULT_NATS_URL: &str = "nats://localhost:4222";

/// Options for connecting to NATS.
#[derive(Clone, Debug)]
pub struct NatsClientOptions {
    /// The NATS server URL.
    pub url: String,

    /// Whether topics are stored on disk rather than in server memory.
    pub persist: bool,
}
impl ClientOptions for NatsClientOptions {}

impl Default for NatsClientOptions {
    fn default() -> Self {
        Self {
            url: DEFAULT_NATS_URL.to_string(),
            persist: true,
        }
    }
}

impl NatsClientOptions {
    /// Default options with the server URL taken from `NATS_URL` when set.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("NATS_URL").unwrap_or_else(|_| DEFAULT_NATS_URL.to_string()),
            ..Self::default()
        }
    }
}

/// A client of NATS JetStream, scoped to a project.
///
/// Topics are streams named `<project>_<topic>` capturing the subject `<project>.<topic>`.
/// Subscriptions are durable pull consumers on those streams.
#[derive(Clone, Debug)]
pub struct NatsClient {
    jetstream_context: JetStreamContext,
    persist: bool,
    project_id: String,
}

fn validate_project_id(project_id: &str) -> Result<(), Error> {
    if project_id.is_empty()
        || project_id.contains(['.', '*', '>', '/', '\\'])
        || project_id.chars().any(char::is_whitespace)
    {
        return Err(Error::InvalidProjectId(project_id.to_string()));
    }
    Ok(())
}

#[async_trait]
impl Client for NatsClient {
    type Error = Error;

    type Options = NatsClientOptions;

    type Topic = NatsTopic;

    type Subscription = NatsSubscription;

    async fn new(
        project_id: String,
        NatsClientOptions { url, persist }: NatsClientOptions,
    ) -> Result<Self, Error> {
        validate_project_id(&project_id)?;

        let client = async_nats::connect(url.as_str())
            .await
            .map_err(|e| Error::Connect(e.kind()))?;
        let jetstream_context = jetstream::new(client);

        debug!(project = %project_id, url = %url, "connected to nats");

        Ok(Self {
            jetstream_context,
            persist,
            project_id,
        })
    }

    fn project_id(&self) -> &str {
        &self.project_id
    }

    fn topic<K>(&self, id: K) -> NatsTopic
    where
        K: Into<String>,
    {
        NatsTopic::new(id.into(), &self.project_id, self.jetstream_context.clone())
    }

    fn subscription<K>(&self, id: K, topic: &NatsTopic) -> NatsSubscription
    where
        K: Into<String>,
    {
        NatsSubscription::new(
            id.into(),
            topic.stream().to_string(),
            self.jetstream_context.clone(),
        )
    }

    async fn create_topic<K>(&self, id: K) -> Result<NatsTopic, Error>
    where
        K: Into<String> + Send,
    {
        let topic = self.topic(id);

        self.jetstream_context
            .create_stream(StreamConfig {
                name: topic.stream().to_string(),
                subjects: vec![topic.subject().to_string()],
                storage: if self.persist {
                    StorageType::File
                } else {
                    StorageType::Memory
                },
                ..Default::default()
            })
            .await
            .map_err(|e| Error::StreamCreate(e.kind()))?;

        debug!(
            topic = %topic.id(),
            stream = %topic.stream(),
            subject = %topic.subject(),
            "created stream"
        );

        Ok(topic)
    }

    async fn create_subscription<K>(
        &self,
        id: K,
        config: SubscriptionConfig<NatsTopic>,
    ) -> Result<NatsSubscription, Error>
    where
        K: Into<String> + Send,
    {
        let subscription = self.subscription(id, &config.topic);

        self.jetstream_context
            .create_consumer_on_stream(
                PullConfig {
                    durable_name: Some(subscription.id().to_string()),
                    deliver_policy: DeliverPolicy::New,
                    ack_policy: AckPolicy::Explicit,
                    ack_wait: config.ack_deadline,
                    ..Default::default()
                },
                config.topic.stream(),
            )
            .await
            .map_err(|e| Error::ConsumerCreate(e.kind()))?;

        debug!(
            topic = %config.topic.id(),
            subscription = %subscription.id(),
            "created durable consumer"
        );

        Ok(subscription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_project_id() {
        assert!(validate_project_id("looplab-playground").is_ok());
        assert!(validate_project_id("").is_err());
        assert!(validate_project_id("a.b").is_err());
        assert!(validate_project_id("a*").is_err());
        assert!(validate_project_id("a>").is_err());
        assert!(validate_project_id("a b").is_err());
        assert!(validate_project_id("a/b").is_err());
    }
}
