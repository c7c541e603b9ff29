use crate::error::PubSubError;
use crate::subscription::Subscription;
use crate::topic::Topic;

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;

/// Default time the service waits for an acknowledgment before redelivering.
pub const DEFAULT_ACK_DEADLINE: Duration = Duration::from_secs(10);

/// Marker trait for client options
pub trait ClientOptions: Clone + Debug + Send + Sync + 'static {}

/// Configuration for a new subscription.
#[derive(Clone, Debug)]
pub struct SubscriptionConfig<T>
where
    T: Topic,
{
    /// The topic the subscription attaches to.
    pub topic: T,

    /// How long the service waits for an acknowledgment before redelivering a message.
    pub ack_deadline: Duration,
}

impl<T> SubscriptionConfig<T>
where
    T: Topic,
{
    /// Creates a config for `topic` with the default ack deadline.
    pub const fn new(topic: T) -> Self {
        Self {
            topic,
            ack_deadline: DEFAULT_ACK_DEADLINE,
        }
    }
}

/// A client of a managed pub/sub service, scoped to one project.
#[async_trait]
pub trait Client
where
    Self: Clone + Debug + Send + Sync + 'static,
{
    /// The error type for the client and the resources it hands out.
    type Error: PubSubError;

    /// The options for the client.
    type Options: ClientOptions;

    /// The topic type for the client.
    type Topic: Topic<Error = Self::Error>;

    /// The subscription type for the client.
    type Subscription: Subscription<Error = Self::Error>;

    /// Creates a new client for the given project.
    async fn new(project_id: String, options: Self::Options) -> Result<Self, Self::Error>;

    /// The project the client is scoped to.
    fn project_id(&self) -> &str;

    /// Returns a reference to a topic, whether or not it exists.
    fn topic<K>(&self, id: K) -> Self::Topic
    where
        K: Into<String>;

    /// Returns a reference to a subscription on `topic`, whether or not it exists.
    fn subscription<K>(&self, id: K, topic: &Self::Topic) -> Self::Subscription
    where
        K: Into<String>;

    /// Creates a topic.
    async fn create_topic<K>(&self, id: K) -> Result<Self::Topic, Self::Error>
    where
        K: Into<String> + Send;

    /// Creates a subscription attached to `config.topic`.
    async fn create_subscription<K>(
        &self,
        id: K,
        config: SubscriptionConfig<Self::Topic>,
    ) -> Result<Self::Subscription, Self::Error>
    where
        K: Into<String> + Send;
}
