use crate::message::Message;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// A trait representing a callback for messages delivered by a push-style receive.
#[async_trait]
pub trait MessageHandler<M>
where
    Self: Clone + Send + Sync + 'static,
    M: Message,
{
    /// Handles the given message. Acknowledging it is up to the handler.
    async fn handle(&self, message: M);
}

/// Hands the first delivered message over a single-slot channel, then cancels the receive loop.
#[derive(Debug)]
pub(crate) struct OneShotHandler<M>
where
    M: Message,
{
    cancel: CancellationToken,
    slot: Arc<Mutex<Option<oneshot::Sender<M>>>>,
}

impl<M> Clone for OneShotHandler<M>
where
    M: Message,
{
    fn clone(&self) -> Self {
        Self {
            cancel: self.cancel.clone(),
            slot: self.slot.clone(),
        }
    }
}

impl<M> OneShotHandler<M>
where
    M: Message,
{
    pub(crate) fn new(cancel: CancellationToken) -> (Self, oneshot::Receiver<M>) {
        let (sender, receiver) = oneshot::channel();

        let handler = Self {
            cancel,
            slot: Arc::new(Mutex::new(Some(sender))),
        };

        (handler, receiver)
    }
}

#[async_trait]
impl<M> MessageHandler<M> for OneShotHandler<M>
where
    M: Message,
{
    async fn handle(&self, message: M) {
        let Some(sender) = self.slot.lock().await.take() else {
            // Left unacknowledged so the service redelivers it.
            debug!(message_id = %message.id(), "one-shot receive already satisfied");
            return;
        };

        if let Err(message) = sender.send(message) {
            debug!(message_id = %message.id(), "one-shot receiver dropped");
        }

        self.cancel.cancel();
    }
}
