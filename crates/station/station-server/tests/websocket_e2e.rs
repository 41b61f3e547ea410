//! Real server on an ephemeral port, real tungstenite client.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use ltm_events::{DecodedRecord, NavRecord};
use serde_json::Value;
use station_core::{Counters, Shutdown, TelemetryStore};
use station_engine::{Broadcaster, FeedPayload};
use station_icc::Fanout;
use station_server::TelemetryServer;
use tungstenite::{Bytes, Message};

fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    cond()
}

#[test]
fn client_receives_ticks_and_disconnect_unsubscribes() {
    let shutdown = Shutdown::new();
    let store = Arc::new(TelemetryStore::new());
    store.update(
        DecodedRecord::Nav(NavRecord {
            gps_mode: 3,
            waypoint_num: 4,
            ..Default::default()
        }),
        1_700_000_000_000_000_000,
    );
    let fanout: Arc<Fanout<FeedPayload>> = Arc::new(Fanout::new(16));

    let server = TelemetryServer::bind("127.0.0.1:0", fanout.clone(), shutdown.clone()).unwrap();
    let addr = server.local_addr().unwrap();
    let server_thread = thread::spawn(move || server.run());

    let broadcaster = Broadcaster::new(
        store,
        Arc::new(Counters::new()),
        fanout.clone(),
        Duration::from_millis(20),
    );
    let bcast_thread = {
        let shutdown = shutdown.clone();
        thread::spawn(move || broadcaster.run(&shutdown))
    };

    let (mut client, _resp) = tungstenite::connect(format!("ws://{addr}/")).unwrap();
    assert!(wait_until(Duration::from_secs(2), || fanout.subscriber_count() == 1));

    let text = loop {
        match client.read().unwrap() {
            Message::Text(t) => break t.to_string(),
            _ => continue,
        }
    };
    let v: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(v["nav"]["gps_mode"], 3);
    assert_eq!(v["nav"]["waypoint_num"], 4);
    assert_eq!(v["nav_ts"], 1_700_000_000_000u64);
    assert!(v.get("gps").is_none());
    assert!(v["stats"].is_object());

    client.close(None).unwrap();
    // Drain until the server acknowledges the close.
    while client.read().is_ok() {}
    assert!(wait_until(Duration::from_secs(3), || fanout.subscriber_count() == 0));

    shutdown.trigger();
    bcast_thread.join().unwrap();
    server_thread.join().unwrap().unwrap();
}

#[test]
fn pings_during_ticks_get_pongs_and_stream_stays_intact() {
    const PINGS: usize = 20;

    let shutdown = Shutdown::new();
    let fanout: Arc<Fanout<FeedPayload>> = Arc::new(Fanout::new(64));
    let server = TelemetryServer::bind("127.0.0.1:0", fanout.clone(), shutdown.clone()).unwrap();
    let addr = server.local_addr().unwrap();
    let server_thread = thread::spawn(move || server.run());

    let (mut client, _) = tungstenite::connect(format!("ws://{addr}/")).unwrap();
    assert!(wait_until(Duration::from_secs(2), || fanout.subscriber_count() == 1));

    // Large payloads so pongs have to land between data frames.
    let publisher = {
        let fanout = fanout.clone();
        let shutdown = shutdown.clone();
        thread::spawn(move || {
            let pad = "x".repeat(16 * 1024);
            let mut seq = 0u64;
            while !shutdown.is_triggered() {
                let text = format!(r#"{{"seq":{seq},"pad":"{pad}"}}"#);
                fanout.publish(FeedPayload::from(text));
                seq += 1;
                thread::sleep(Duration::from_millis(1));
            }
        })
    };

    let mut pongs = Vec::new();
    let mut texts = 0usize;
    let mut last_seq = None;
    let mut sent = 0usize;
    let deadline = Instant::now() + Duration::from_secs(5);
    while (pongs.len() < PINGS || texts < 100) && Instant::now() < deadline {
        if sent < PINGS && texts >= sent * 3 {
            client
                .send(Message::Ping(Bytes::from(format!("ping-{sent}"))))
                .unwrap();
            sent += 1;
        }
        match client.read().unwrap() {
            Message::Text(t) => {
                let v: Value = serde_json::from_str(t.as_str()).unwrap();
                let seq = v["seq"].as_u64().unwrap();
                assert!(last_seq.is_none_or(|last| seq > last));
                last_seq = Some(seq);
                texts += 1;
            }
            Message::Pong(data) => pongs.push(data),
            other => panic!("unexpected message {other:?}"),
        }
    }

    assert!(texts >= 100);
    let expected: Vec<Bytes> = (0..PINGS)
        .map(|i| Bytes::from(format!("ping-{i}")))
        .collect();
    assert_eq!(pongs, expected);

    shutdown.trigger();
    publisher.join().unwrap();
    server_thread.join().unwrap().unwrap();
}

#[test]
fn shutdown_closes_open_connections() {
    let shutdown = Shutdown::new();
    let fanout: Arc<Fanout<FeedPayload>> = Arc::new(Fanout::new(4));
    let server = TelemetryServer::bind("127.0.0.1:0", fanout.clone(), shutdown.clone()).unwrap();
    let addr = server.local_addr().unwrap();
    let server_thread = thread::spawn(move || server.run());

    let (_client, _) = tungstenite::connect(format!("ws://{addr}/")).unwrap();
    assert!(wait_until(Duration::from_secs(2), || fanout.subscriber_count() == 1));

    let started = Instant::now();
    shutdown.trigger();
    server_thread.join().unwrap().unwrap();
    assert!(started.elapsed() < Duration::from_secs(3));
    assert_eq!(fanout.subscriber_count(), 0);
}

#[test]
fn bind_error_names_the_address() {
    let fanout: Arc<Fanout<FeedPayload>> = Arc::new(Fanout::new(1));
    let err = TelemetryServer::bind("256.0.0.1:1", fanout, Shutdown::new())
        .err()
        .unwrap();
    assert!(err.to_string().contains("256.0.0.1:1"));
}
