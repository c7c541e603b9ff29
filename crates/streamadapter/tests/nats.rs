use streamadapter::{ErrorKind, State, StreamAdapter, StreamAdapterOptions};
use streamadapter_pubsub::client::Client;
use streamadapter_pubsub_nats::{NatsClient, NatsClientOptions};
use uuid::Uuid;

async fn setup_client() -> NatsClient {
    setup_project_client(&format!("test_{}", Uuid::new_v4().simple())).await
}

async fn setup_project_client(project_id: &str) -> NatsClient {
    let options = NatsClientOptions {
        persist: false,
        ..NatsClientOptions::from_env()
    };

    NatsClient::new(project_id.to_string(), options).await.unwrap()
}

#[tokio::test]
#[ignore = "requires a NATS server with JetStream"]
async fn test_hello_world() {
    let client = setup_client().await;
    let mut adapter = StreamAdapter::new(StreamAdapterOptions::new(client, "foo"))
        .await
        .unwrap();

    assert_eq!(adapter.write(b"Hello world!").await.unwrap(), 12);

    let mut buf = [0u8; 100];
    let read = adapter.read(&mut buf).await.unwrap();
    assert_eq!(&buf[..read], b"Hello world!");

    adapter.close().await.unwrap();
    assert_eq!(adapter.state(), State::Closed);
}

#[tokio::test]
#[ignore = "requires a NATS server with JetStream"]
async fn test_shared_topic_fans_out() {
    let client = setup_client().await;
    let mut writer = StreamAdapter::new(StreamAdapterOptions::new(client.clone(), "foo"))
        .await
        .unwrap();
    let mut reader = StreamAdapter::new(StreamAdapterOptions::new(client, "foo"))
        .await
        .unwrap();

    writer.write(b"fan out").await.unwrap();

    let mut buf = [0u8; 3];
    assert_eq!(reader.read(&mut buf).await.unwrap(), 3);
    assert_eq!(&buf, b"fan");
    assert_eq!(writer.read(&mut buf).await.unwrap(), 3);

    reader.close().await.unwrap();
    let error = writer.close().await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Teardown);
}

#[tokio::test]
#[ignore = "requires a NATS server with JetStream"]
async fn test_projects_do_not_share_topics() {
    let suffix = Uuid::new_v4().simple().to_string();
    let mut first = StreamAdapter::new(StreamAdapterOptions::new(
        setup_project_client(&format!("first_{suffix}")).await,
        "foo",
    ))
    .await
    .unwrap();
    let mut second = StreamAdapter::new(StreamAdapterOptions::new(
        setup_project_client(&format!("second_{suffix}")).await,
        "foo",
    ))
    .await
    .unwrap();

    assert_eq!(first.topic_id(), second.topic_id());

    first.write(b"first").await.unwrap();
    second.write(b"second").await.unwrap();

    let mut buf = [0u8; 16];
    let read = first.read(&mut buf).await.unwrap();
    assert_eq!(&buf[..read], b"first");
    let read = second.read(&mut buf).await.unwrap();
    assert_eq!(&buf[..read], b"second");

    // Each project tears down only its own stream.
    first.close().await.unwrap();
    second.close().await.unwrap();
}
