//! Byte-stream read, write and close over a managed pub/sub service.
//!
//! Each write publishes one message to a topic shared by every adapter with the same
//! logical name. Each read blocks until exactly one message arrives on a subscription
//! private to the adapter. Closing deletes the subscription, then the topic.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod blocking;
mod error;
mod naming;

pub use blocking::BlockingStreamAdapter;
pub use error::{Error, ErrorKind};
pub use naming::DEFAULT_TOPIC_PREFIX;

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use bytes::Bytes;
use streamadapter_pubsub::client::{Client, DEFAULT_ACK_DEADLINE, SubscriptionConfig};
use streamadapter_pubsub::message::Message;
use streamadapter_pubsub::subscription::Subscription;
use streamadapter_pubsub::topic::Topic;
use tracing::{debug, info, warn};

/// Result type for stream adapter operations on client `C`.
pub type Result<T, C> = std::result::Result<T, Error<<C as Client>::Error>>;

/// Options for provisioning a stream adapter.
#[derive(Clone, Debug)]
pub struct StreamAdapterOptions<C>
where
    C: Client,
{
    /// The service client resources are provisioned through.
    pub client: C,

    /// The logical name shared by adapters that talk to each other.
    pub name: String,

    /// Prefix of the topic name.
    pub topic_prefix: String,

    /// How long the service waits for a read to acknowledge before redelivering.
    pub ack_deadline: Duration,
}

impl<C> StreamAdapterOptions<C>
where
    C: Client,
{
    /// Options with the default topic prefix and ack deadline.
    pub fn new(client: C, name: impl Into<String>) -> Self {
        Self {
            client,
            name: name.into(),
            topic_prefix: DEFAULT_TOPIC_PREFIX.to_string(),
            ack_deadline: DEFAULT_ACK_DEADLINE,
        }
    }
}

/// How far an adapter is through its lifecycle.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum State {
    /// Both resources are live.
    Ready,

    /// The subscription is gone but the topic could not be deleted.
    SubscriptionDeleted,

    /// Both resources are gone.
    Closed,
}

/// A byte stream backed by one topic and one subscription.
pub struct StreamAdapter<C>
where
    C: Client,
{
    state: State,
    subscription: C::Subscription,
    topic: C::Topic,
}

impl<C> Debug for StreamAdapter<C>
where
    C: Client,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("StreamAdapter")
            .field("state", &self.state)
            .field("subscription", &self.subscription.id())
            .field("topic", &self.topic.id())
            .finish_non_exhaustive()
    }
}

impl<C> StreamAdapter<C>
where
    C: Client,
{
    /// Creates a client for `project_id` and provisions an adapter for `name` with default
    /// options.
    ///
    /// # Errors
    ///
    /// Returns a [`ErrorKind::Provisioning`] error if the client cannot be created or any
    /// resource cannot be looked up or created.
    pub async fn connect(
        project_id: impl Into<String>,
        name: impl Into<String>,
        client_options: C::Options,
    ) -> Result<Self, C> {
        let client = C::new(project_id.into(), client_options)
            .await
            .map_err(Error::Client)?;

        Self::new(StreamAdapterOptions::new(client, name)).await
    }

    /// Provisions an adapter.
    ///
    /// The topic is reused if it exists and created otherwise. A subscription with a fresh
    /// random suffix is created on it.
    ///
    /// # Errors
    ///
    /// Returns a [`ErrorKind::Provisioning`] error if the name is unusable or any resource
    /// cannot be looked up or created.
    pub async fn new(
        StreamAdapterOptions {
            client,
            name,
            topic_prefix,
            ack_deadline,
        }: StreamAdapterOptions<C>,
    ) -> Result<Self, C> {
        let Some(topic_id) = naming::topic_id(&topic_prefix, &name) else {
            return Err(Error::InvalidName(name));
        };

        let topic = client.topic(topic_id.clone());
        let topic = if topic.exists().await.map_err(Error::TopicLookup)? {
            debug!(topic = %topic_id, "reusing existing topic");
            topic
        } else {
            client
                .create_topic(topic_id)
                .await
                .map_err(Error::TopicCreate)?
        };

        let subscription_id = naming::subscription_id(topic.id());
        let subscription = client.subscription(subscription_id.clone(), &topic);
        let subscription = if subscription
            .exists()
            .await
            .map_err(Error::SubscriptionLookup)?
        {
            debug!(subscription = %subscription_id, "reusing existing subscription");
            subscription
        } else {
            client
                .create_subscription(
                    subscription_id,
                    SubscriptionConfig {
                        topic: topic.clone(),
                        ack_deadline,
                    },
                )
                .await
                .map_err(Error::SubscriptionCreate)?
        };

        info!(
            project = %client.project_id(),
            topic = %topic.id(),
            subscription = %subscription.id(),
            "stream adapter ready"
        );

        Ok(Self {
            state: State::Ready,
            subscription,
            topic,
        })
    }

    /// The current lifecycle state.
    pub const fn state(&self) -> State {
        self.state
    }

    /// The name of the topic writes are published to.
    pub fn topic_id(&self) -> &str {
        self.topic.id()
    }

    /// The name of the subscription reads are served from.
    pub fn subscription_id(&self) -> &str {
        self.subscription.id()
    }

    /// Publishes `data` as a single message and waits for the service to accept it.
    ///
    /// # Errors
    ///
    /// Returns a [`ErrorKind::Publish`] error if the publish is not acknowledged, or
    /// [`Error::Closed`] once close has started. Nothing counts as written on error.
    pub async fn write(&self, data: &[u8]) -> Result<usize, C> {
        self.ensure_ready()?;

        let message_id = self
            .topic
            .publish(Bytes::copy_from_slice(data))
            .await
            .map_err(Error::Publish)?;

        debug!(topic = %self.topic.id(), message_id = %message_id, len = data.len(), "wrote message");

        Ok(data.len())
    }

    /// Waits for exactly one message, copies as much of it as fits into `buf`, and
    /// acknowledges it.
    ///
    /// Bytes beyond `buf.len()` are discarded. There is no timeout. Dropping the future
    /// before it completes leaves any delivered message unacknowledged, so the service
    /// redelivers it.
    ///
    /// # Errors
    ///
    /// Returns a [`ErrorKind::Receive`] error if receiving or acknowledging fails, or
    /// [`Error::Closed`] once close has started.
    pub async fn read(&self, buf: &mut [u8]) -> Result<usize, C> {
        self.ensure_ready()?;

        let message = self
            .subscription
            .receive_one()
            .await
            .map_err(Error::Receive)?;

        let data = message.data();
        let len = data.len().min(buf.len());
        buf[..len].copy_from_slice(&data[..len]);

        message.ack().await.map_err(Error::Ack)?;

        debug!(
            subscription = %self.subscription.id(),
            message_id = %message.id(),
            len,
            discarded = data.len() - len,
            "read message"
        );

        Ok(len)
    }

    /// Deletes the subscription, then the topic.
    ///
    /// If the topic cannot be deleted the adapter stays in [`State::SubscriptionDeleted`]
    /// and calling close again retries the topic only. Closing a closed adapter does
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns a [`ErrorKind::Teardown`] error naming the resource that could not be
    /// deleted.
    pub async fn close(&mut self) -> Result<(), C> {
        if self.state == State::Ready {
            self.subscription
                .delete()
                .await
                .map_err(Error::SubscriptionDelete)?;
            self.state = State::SubscriptionDeleted;

            debug!(subscription = %self.subscription.id(), "deleted subscription");
        }

        if self.state == State::SubscriptionDeleted {
            self.topic.delete().await.map_err(Error::TopicDelete)?;
            self.state = State::Closed;

            info!(topic = %self.topic.id(), "stream adapter closed");
        }

        Ok(())
    }

    fn ensure_ready(&self) -> Result<(), C> {
        match self.state {
            State::Ready => Ok(()),
            State::SubscriptionDeleted | State::Closed => Err(Error::Closed),
        }
    }
}

impl<C> Drop for StreamAdapter<C>
where
    C: Client,
{
    fn drop(&mut self) {
        if self.state != State::Closed {
            warn!(
                state = ?self.state,
                topic = %self.topic.id(),
                subscription = %self.subscription.id(),
                "stream adapter dropped without close, resources left in place"
            );
        }
    }
}
