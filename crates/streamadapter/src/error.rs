use streamadapter_pubsub::error::PubSubError;
use thiserror::Error;

/// Coarse classification of [`Error`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Resources could not be provisioned.
    Provisioning,

    /// A message could not be published.
    Publish,

    /// A message could not be received or acknowledged.
    Receive,

    /// A resource could not be deleted.
    Teardown,

    /// The adapter has been closed.
    Closed,
}

/// Errors returned by a stream adapter.
#[derive(Debug, Error)]
pub enum Error<E>
where
    E: PubSubError,
{
    /// A received message could not be acknowledged.
    #[error("could not acknowledge message: {0}")]
    Ack(E),

    /// The service client could not be created.
    #[error("could not create pubsub client: {0}")]
    Client(E),

    /// Read or write after close.
    #[error("stream adapter is closed")]
    Closed,

    /// The logical name cannot be used in a resource name.
    #[error("invalid name {0:?} - must not be empty or contain '.', '*', '>', '/' or whitespace")]
    InvalidName(String),

    /// Publishing failed.
    #[error(transparent)]
    Publish(E),

    /// Receiving failed.
    #[error(transparent)]
    Receive(E),

    /// The runtime backing a blocking adapter could not be started.
    #[error("could not start runtime: {0}")]
    Runtime(std::io::Error),

    /// Subscription creation failed.
    #[error("could not create subscription: {0}")]
    SubscriptionCreate(E),

    /// Subscription deletion failed.
    #[error("could not delete subscription: {0}")]
    SubscriptionDelete(E),

    /// Subscription lookup failed.
    #[error("could not get subscription: {0}")]
    SubscriptionLookup(E),

    /// Topic creation failed.
    #[error("could not create topic: {0}")]
    TopicCreate(E),

    /// Topic deletion failed.
    #[error("could not delete topic: {0}")]
    TopicDelete(E),

    /// Topic lookup failed.
    #[error("could not get topic: {0}")]
    TopicLookup(E),
}

impl<E> Error<E>
where
    E: PubSubError,
{
    /// Which stage of the adapter's life the error came from.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Client(_)
            | Self::InvalidName(_)
            | Self::Runtime(_)
            | Self::SubscriptionCreate(_)
            | Self::SubscriptionLookup(_)
            | Self::TopicCreate(_)
            | Self::TopicLookup(_) => ErrorKind::Provisioning,
            Self::Publish(_) => ErrorKind::Publish,
            Self::Ack(_) | Self::Receive(_) => ErrorKind::Receive,
            Self::SubscriptionDelete(_) | Self::TopicDelete(_) => ErrorKind::Teardown,
            Self::Closed => ErrorKind::Closed,
        }
    }
}
