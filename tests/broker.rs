//! Live tests against a real broker; run with
//! `cargo test --features std -- --ignored`.
//!
//! The broker is read from `TEST_MQTT_ADDRESS` (`host:port`, `.env` supported).

#![cfg(feature = "std")]

use dotenvy::dotenv;
use libmqtt::mqtt::{Client, ConnectOptions, Event, QoS, State};
use libmqtt::network::Security;
use libmqtt::network::tcp::TcpConnector;
use std::env;
use std::time::{Duration, Instant};

fn broker() -> (String, u16) {
    dotenv().ok();
    let address = env::var("TEST_MQTT_ADDRESS").unwrap_or("test.mosquitto.org:1883".to_string());
    let (host, port) = address
        .rsplit_once(':')
        .expect("TEST_MQTT_ADDRESS must be host:port");
    (host.to_string(), port.parse().expect("invalid port"))
}

fn wait_for<F>(client: &mut Client<TcpConnector>, mut matches: F) -> Event
where
    F: FnMut(&Event) -> bool,
{
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        if let Some(event) = client.poll().expect("poll failed") {
            if matches(&event) {
                return event;
            }
        }
    }
    panic!("timed out waiting for event");
}

fn connect(client_id: &str) -> Client<TcpConnector> {
    let (host, port) = broker();
    let mut client: Client<TcpConnector> = Client::new(TcpConnector::new(), &host, port);
    client
        .connect(
            ConnectOptions::new(client_id).clean_session(true).keep_alive(10),
            Security::Plain,
        )
        .expect("failed to connect");
    wait_for(&mut client, |e| matches!(e, Event::Connected { .. }));
    client
}

#[test]
#[ignore = "requires a reachable MQTT broker"]
fn test_connect_to_public_broker() {
    let mut client = connect("libmqtt-test-client-12345");
    assert_eq!(client.state(), State::Connected);
    client.disconnect().unwrap();
    assert_eq!(client.state(), State::Disconnected);
}

#[test]
#[ignore = "requires a reachable MQTT broker"]
fn test_publish_and_subscribe() {
    let mut client = connect("libmqtt-test-client-67890");
    let topic = "libmqtt/test-topic";

    let id = client.subscribe(topic, QoS::AtLeastOnce).unwrap();
    wait_for(&mut client, |e| {
        matches!(e, Event::Subscribed { packet_id, .. } if *packet_id == id)
    });

    let id = client
        .publish(topic, b"hello world", QoS::ExactlyOnce, false)
        .unwrap()
        .unwrap();
    let mut published = false;
    let mut received = false;
    let deadline = Instant::now() + Duration::from_secs(10);
    while !(published && received) && Instant::now() < deadline {
        match client.poll().expect("poll failed") {
            Some(Event::Published { packet_id, qos }) if packet_id == id => {
                assert_eq!(qos, QoS::ExactlyOnce);
                published = true;
            }
            Some(Event::Message { topic: t, payload, .. }) if t == topic => {
                assert_eq!(payload, b"hello world");
                received = true;
            }
            _ => {}
        }
    }
    assert!(published && received);
    client.disconnect().unwrap();
}
