// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use logstash_adapter::{
    adapter::{register, AdapterRegistry},
    errors::AdapterError,
    record::{Container, ContainerConfig, LogRecord, Source},
    route::Route,
    transport::TransportRegistry,
};
use serial_test::serial;
use tokio::{
    net::UdpSocket,
    sync::mpsc,
    time::{timeout, Duration},
};

fn record(data: &str) -> LogRecord {
    LogRecord {
        data: data.to_string(),
        source: Source::Stderr,
        container: Container {
            id: "0123456789ab".to_string(),
            name: "/payments".to_string(),
            config: ContainerConfig {
                image: "payments:1.4".to_string(),
                hostname: "0123456789ab".to_string(),
            },
        },
    }
}

async fn recv_json(socket: &UdpSocket) -> serde_json::Value {
    let mut buf = [0u8; 8192];
    let amt = timeout(Duration::from_secs(2), socket.recv(&mut buf))
        .await
        .expect("timed out waiting for datagram")
        .expect("recv failed");
    serde_json::from_slice(&buf[..amt]).expect("datagram should be one JSON object")
}

#[tokio::test]
#[serial]
async fn logstash_adapter_ships_events_over_udp() {
    let receiver = UdpSocket::bind("127.0.0.1:0")
        .await
        .expect("unable to bind UDP socket");
    let address = receiver
        .local_addr()
        .expect("receiver has no local address")
        .to_string();

    let mut adapters = AdapterRegistry::new();
    register(&mut adapters);
    let mut adapter = adapters
        .build(
            &Route::new("logstash", address),
            &TransportRegistry::with_defaults(),
        )
        .await
        .expect("adapter should be created");

    std::env::set_var("HOSTNAME", "docker-host-1");

    let (tx, rx) = mpsc::channel(16);
    let stream = tokio::spawn(async move { adapter.stream(rx).await });

    for line in [
        "ERROR: boom",
        "Traceback (most recent call last):",
        "  File \"x.py\", line 3, in f",
        "    raise",
        "RuntimeError: boom",
        "started",
        "ready",
    ] {
        tx.send(record(line)).await.expect("adapter hung up");
    }
    drop(tx);
    stream.await.expect("stream task failed");

    let first = recv_json(&receiver).await;
    assert_eq!(
        first,
        serde_json::json!({
            "message": "ERROR: boom\nTraceback (most recent call last):\n  File \"x.py\", line 3, in f\n    raise\nRuntimeError: boom",
            "container_name": "payments",
            "container_id": "0123456789ab",
            "image_name": "payments:1.4",
            "container_hostname": "0123456789ab",
            "host": "docker-host-1",
            "stream": "stderr",
            "tags": ["multiline"],
        })
    );

    let second = recv_json(&receiver).await;
    assert_eq!(second["message"], "started");
    assert_eq!(second["tags"], serde_json::json!([""]));

    // "ready" is still buffered when the stream closes and is never sent.
    let mut buf = [0u8; 64];
    assert!(
        timeout(Duration::from_millis(200), receiver.recv(&mut buf))
            .await
            .is_err()
    );

    std::env::remove_var("HOSTNAME");
}

#[tokio::test]
async fn logstash_adapter_rejects_unknown_transport() {
    let mut adapters = AdapterRegistry::new();
    register(&mut adapters);

    let result = adapters
        .build(
            &Route::new("logstash+carrier-pigeon", "127.0.0.1:5000"),
            &TransportRegistry::with_defaults(),
        )
        .await;

    match result {
        Err(e @ AdapterError::UnknownTransport { .. }) => {
            assert_eq!(e.to_string(), "unable to find adapter: logstash+carrier-pigeon")
        }
        Err(e) => panic!("unexpected error: {e}"),
        Ok(_) => panic!("adapter should not be created"),
    }
}

#[tokio::test]
async fn logstash_adapter_surfaces_dial_errors() {
    let mut adapters = AdapterRegistry::new();
    register(&mut adapters);

    // Nothing listens on port 1 of the loopback, so the TCP connect is refused.
    let result = adapters
        .build(
            &Route::new("logstash+tcp", "127.0.0.1:1"),
            &TransportRegistry::with_defaults(),
        )
        .await;

    assert!(matches!(result, Err(AdapterError::Dial(_))));
}
