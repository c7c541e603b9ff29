use crate::error::PubSubError;

use std::fmt::Debug;

use async_trait::async_trait;
use bytes::Bytes;

/// A message delivered through a subscription.
#[async_trait]
pub trait Message
where
    Self: Debug + Send + Sync + 'static,
{
    /// The error type for the message.
    type Error: PubSubError;

    /// The service-assigned message id.
    fn id(&self) -> &str;

    /// The message payload.
    fn data(&self) -> &Bytes;

    /// Acknowledges the message, removing it from redelivery.
    async fn ack(&self) -> Result<(), Self::Error>;
}
