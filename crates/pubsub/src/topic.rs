use crate::error::PubSubError;

use std::fmt::Debug;

use async_trait::async_trait;
use bytes::Bytes;

/// A named channel that messages are published to.
#[async_trait]
pub trait Topic
where
    Self: Clone + Debug + Send + Sync + 'static,
{
    /// The error type for the topic.
    type Error: PubSubError;

    /// The topic id.
    fn id(&self) -> &str;

    /// Checks whether the topic exists in the service.
    async fn exists(&self) -> Result<bool, Self::Error>;

    /// Publishes a single message and waits for the service to acknowledge it.
    ///
    /// Returns the id the service assigned to the message.
    async fn publish(&self, data: Bytes) -> Result<String, Self::Error>;

    /// Deletes the topic.
    async fn delete(&self) -> Result<(), Self::Error>;
}
