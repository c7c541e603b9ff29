//! NATS JetStream implementation of the pubsub crate.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;

/// Clients connect to a NATS server and scope subjects to a project.
pub mod client;

/// Messages pulled from JetStream consumers.
pub mod message;

/// Subscriptions are durable pull consumers.
pub mod subscription;

/// Topics are JetStream streams.
pub mod topic;

pub use client::{NatsClient, NatsClientOptions};
pub use error::Error;
pub use message::NatsMessage;
pub use subscription::NatsSubscription;
pub use topic::NatsTopic;

#[cfg(test)]
mod tests {
    use super::*;

    use bytes::Bytes;
    use streamadapter_pubsub::client::{Client, SubscriptionConfig};
    use streamadapter_pubsub::message::Message;
    use streamadapter_pubsub::subscription::Subscription;
    use streamadapter_pubsub::topic::Topic;
    use uuid::Uuid;

    async fn setup_client() -> NatsClient {
        let options = NatsClientOptions {
            persist: false,
            ..NatsClientOptions::from_env()
        };

        NatsClient::new(format!("test_{}", Uuid::new_v4().simple()), options)
            .await
            .unwrap()
    }

    #[tokio::test]
    #[ignore = "requires a NATS server with JetStream"]
    async fn test_topic_lifecycle() {
        let client = setup_client().await;
        let topic = client.topic("events");

        assert!(!topic.exists().await.unwrap());
        client.create_topic("events").await.unwrap();
        assert!(topic.exists().await.unwrap());

        topic.delete().await.unwrap();
        assert!(!topic.exists().await.unwrap());
    }

    #[tokio::test]
    #[ignore = "requires a NATS server with JetStream"]
    async fn test_publish_and_receive_one() {
        let client = setup_client().await;
        let topic = client.create_topic("events").await.unwrap();
        let subscription = client
            .create_subscription("sub", SubscriptionConfig::new(topic.clone()))
            .await
            .unwrap();

        assert!(subscription.exists().await.unwrap());

        let id = topic.publish(Bytes::from("message1")).await.unwrap();
        let message = subscription.receive_one().await.unwrap();

        assert_eq!(message.id(), id);
        assert_eq!(message.data(), &Bytes::from("message1"));
        message.ack().await.unwrap();

        subscription.delete().await.unwrap();
        assert!(!subscription.exists().await.unwrap());
        topic.delete().await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires a NATS server with JetStream"]
    async fn test_subscriptions_fan_out() {
        let client = setup_client().await;
        let topic = client.create_topic("events").await.unwrap();
        let first = client
            .create_subscription("first", SubscriptionConfig::new(topic.clone()))
            .await
            .unwrap();
        let second = client
            .create_subscription("second", SubscriptionConfig::new(topic.clone()))
            .await
            .unwrap();

        topic.publish(Bytes::from("shared")).await.unwrap();

        for subscription in [&first, &second] {
            let message = subscription.receive_one().await.unwrap();
            assert_eq!(message.data(), &Bytes::from("shared"));
            message.ack().await.unwrap();
        }

        topic.delete().await.unwrap();
    }
}
