//! End-to-end tests through the facade.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use shimwire::prelude::*;
use shimwire::host::Value;
use shimwire::host::memory::{MemoryHost, Release};

// =========================================================================
// Helpers
// =========================================================================

fn bridge_for(release: &Release) -> Bridge {
    Bridge::new(release.host().clone(), &BridgeConfig::default())
}

// =========================================================================
// Version detection
// =========================================================================

#[test]
fn test_bridge_detects_release_version() {
    let release = Release::install("v1_8_R3");
    let bridge = bridge_for(&release);
    assert_eq!(bridge.version().as_str(), "v1_8_R3");
}

#[test]
fn test_bridge_override_wins() {
    let release = Release::install("v1_8_R3");
    let config = BridgeConfig::from_json(r#"{"version_override":"v1_9_R1"}"#).unwrap();
    let bridge = Bridge::new(release.host().clone(), &config);

    assert_eq!(bridge.version().as_str(), "v1_9_R1");
    // The layout installed is v1_8_R3, so nothing resolves.
    assert!(matches!(
        bridge.build(TabCompleteBuilder::new(["a"])),
        Err(BridgeError::Build(BuildError::Unresolved { .. }))
    ));
}

#[test]
fn test_bridge_without_namespace_is_unknown_and_fails_closed() {
    let host = Arc::new(MemoryHost::default());
    let bridge = Bridge::new(host.clone(), &BridgeConfig::default());

    assert!(bridge.version().is_unknown());
    assert!(bridge.build(TabCompleteBuilder::new(["a"])).is_err());
    assert_eq!(host.total_lookups(), 0);
}

// =========================================================================
// Sending
// =========================================================================

#[test]
fn test_send_to_one_client() {
    let release = Release::install("v1_8_R3");
    let bridge = bridge_for(&release);
    let alice = release.connect("alice");

    bridge
        .send(TabCompleteBuilder::new(["home", "hub"]), &alice)
        .unwrap();

    let outbox = release.outbox(&alice);
    assert_eq!(
        outbox[0].raw_get("a"),
        Some(Value::StrArray(vec!["home".into(), "hub".into()]))
    );
}

#[test]
fn test_send_to_disconnected_client_is_dispatch_error() {
    let release = Release::install("v1_8_R3");
    let bridge = bridge_for(&release);
    let alice = release.connect("alice");
    release.disconnect(&alice);

    let err = bridge.send(TabCompleteBuilder::new(["a"]), &alice).unwrap_err();
    assert!(matches!(err, BridgeError::Dispatch(DispatchError::NoConduit { .. })));
}

#[test]
fn test_send_to_all_counts_delivery() {
    let release = Release::install("v1_8_R3");
    let bridge = bridge_for(&release);
    release.connect("alice");
    let bob = release.connect("bob");
    release.break_conduit(&bob);

    let report = bridge
        .send_to_all(DisplayObjectiveBuilder::new(&DisplaySlot::Sidebar, "kills").unwrap())
        .unwrap();

    assert_eq!(report.delivered, 1);
    assert_eq!(report.failures.len(), 1);
}

#[test]
fn test_clones_share_symbol_cache() {
    let release = Release::install("v1_8_R3");
    let bridge = bridge_for(&release);
    let clone = bridge.clone();

    bridge.build(TabCompleteBuilder::new(["a"])).unwrap();
    let before = clone.stats();
    clone.build(TabCompleteBuilder::new(["b"])).unwrap();
    let after = clone.stats();

    assert_eq!(after.attempts, before.attempts);
    assert!(after.hits > before.hits);
}

#[test]
fn test_bridge_shared_across_threads() {
    let release = Release::install("v1_8_R3");
    let bridge = bridge_for(&release);
    let alice = release.connect("alice");

    thread::scope(|s| {
        for i in 0..4 {
            let bridge = &bridge;
            let alice = &alice;
            s.spawn(move || {
                bridge
                    .send(TabCompleteBuilder::new([format!("c{i}")]), alice)
                    .unwrap();
            });
        }
    });

    assert_eq!(release.outbox(&alice).len(), 4);
}

// =========================================================================
// Async broadcast
// =========================================================================

#[tokio::test]
async fn test_broadcast_reaches_roster_in_order() {
    let release = Release::install("v1_8_R3");
    let bridge = bridge_for(&release);
    let clients: Vec<_> = (0..4).map(|i| release.connect(&format!("p{i}"))).collect();
    release.detach(&clients[1]);

    let message = bridge.build(TabCompleteBuilder::new(["home"])).unwrap();
    let report = bridge.broadcast(&message).await;

    assert_eq!(report.delivered, 3);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(
        report.failures[0].client(),
        Some(clients[1].describe().as_str())
    );
    for (i, client) in clients.iter().enumerate() {
        assert_eq!(release.outbox(client).len(), usize::from(i != 1));
    }
}

#[tokio::test]
async fn test_broadcast_empty_roster() {
    let release = Release::install("v1_8_R3");
    let bridge = bridge_for(&release);
    let message = bridge.build(TabCompleteBuilder::new(["home"])).unwrap();

    let report = bridge.broadcast(&message).await;
    assert_eq!(report.attempted(), 0);
}

#[tokio::test]
async fn test_broadcast_with_slow_host() {
    let release = Release::install_with(
        MemoryHost::builder().lookup_delay(Duration::from_millis(5)),
        "v1_8_R3",
    );
    let bridge = bridge_for(&release);
    for i in 0..3 {
        release.connect(&format!("p{i}"));
    }

    let message = bridge.build(TabCompleteBuilder::new(["home"])).unwrap();
    let report = bridge.broadcast(&message).await;

    assert!(report.is_complete());
    assert_eq!(report.delivered, 3);
}
