use crate::error::PubSubError;
use crate::handler::{MessageHandler, OneShotHandler};
use crate::message::Message;

use std::fmt::Debug;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// A durable attachment to a topic that buffers messages until they are acknowledged.
#[async_trait]
pub trait Subscription
where
    Self: Clone + Debug + Send + Sync + 'static,
{
    /// The error type for the subscription.
    type Error: PubSubError;

    /// The type of message delivered by the subscription.
    type Message: Message<Error = Self::Error>;

    /// The subscription id.
    fn id(&self) -> &str;

    /// Checks whether the subscription exists in the service.
    async fn exists(&self) -> Result<bool, Self::Error>;

    /// Deletes the subscription.
    async fn delete(&self) -> Result<(), Self::Error>;

    /// Delivers messages to `handler` until `cancel` fires.
    ///
    /// A loop stopped through `cancel` returns an error for which
    /// [`PubSubError::is_canceled`] is true.
    async fn receive<X>(&self, cancel: CancellationToken, handler: X) -> Result<(), Self::Error>
    where
        X: MessageHandler<Self::Message>;

    /// Waits for exactly one message.
    ///
    /// The default runs [`Subscription::receive`] with a handler that cancels the loop after
    /// the first delivery. Backends with a native pull primitive should override it.
    async fn receive_one(&self) -> Result<Self::Message, Self::Error> {
        loop {
            let cancel = CancellationToken::new();
            let (handler, mut receiver) = OneShotHandler::new(cancel.clone());

            match self.receive(cancel, handler).await {
                Err(error) if !error.is_canceled() => return Err(error),
                _ => {}
            }

            if let Ok(message) = receiver.try_recv() {
                return Ok(message);
            }

            debug!(subscription = %self.id(), "receive loop ended without a message");
        }
    }
}
