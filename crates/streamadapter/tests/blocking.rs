use std::io::{ErrorKind as IoErrorKind, Read, Write};
use std::thread;
use std::time::Duration;

use streamadapter::{BlockingStreamAdapter, ErrorKind, State};
use streamadapter_pubsub_memory::{MemoryClient, MemoryClientOptions};
use uuid::Uuid;

fn project_id() -> String {
    format!("test_{}", Uuid::new_v4().simple())
}

fn connect(project_id: &str, name: &str) -> BlockingStreamAdapter<MemoryClient> {
    BlockingStreamAdapter::connect(project_id, name, MemoryClientOptions).unwrap()
}

#[test]
fn test_write_then_read() {
    let mut adapter = connect(&project_id(), "foo");

    adapter.write_all(b"Hello world!").unwrap();

    let mut buf = [0u8; 100];
    let read = adapter.read(&mut buf).unwrap();
    assert_eq!(&buf[..read], b"Hello world!");

    adapter.close().unwrap();
    assert_eq!(adapter.state(), State::Closed);
}

#[test]
fn test_read_blocks_until_another_thread_writes() {
    let project_id = project_id();
    let mut reader = connect(&project_id, "pipe");

    let writer = thread::spawn({
        let project_id = project_id.clone();
        move || {
            let mut writer = connect(&project_id, "pipe");
            thread::sleep(Duration::from_millis(100));
            writer.write_all(b"from another thread").unwrap();
            writer
        }
    });

    let mut buf = [0u8; 64];
    let read = reader.read(&mut buf).unwrap();
    assert_eq!(&buf[..read], b"from another thread");

    let mut writer = writer.join().unwrap();
    writer.close().unwrap();
    // The shared topic went with the writer.
    assert!(reader.close().is_err());
}

#[test]
fn test_empty_read_does_not_consume() {
    let mut adapter = connect(&project_id(), "foo");

    adapter.write_all(b"kept").unwrap();
    assert_eq!(adapter.read(&mut []).unwrap(), 0);

    let mut buf = [0u8; 8];
    let read = adapter.read(&mut buf).unwrap();
    assert_eq!(&buf[..read], b"kept");

    adapter.close().unwrap();
}

#[test]
fn test_closed_adapter_maps_to_io_error() {
    let mut adapter = connect(&project_id(), "foo");
    adapter.close().unwrap();

    let error = adapter.write(b"late").unwrap_err();
    assert_eq!(error.kind(), IoErrorKind::Other);

    let inner = error
        .into_inner()
        .unwrap()
        .downcast::<streamadapter::Error<streamadapter_pubsub_memory::Error>>()
        .unwrap();
    assert_eq!(inner.kind(), ErrorKind::Closed);
}
