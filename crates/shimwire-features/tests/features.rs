//! Integration tests for features against an installed release.

use std::sync::Arc;

use shimwire_dispatch::Dispatcher;
use shimwire_features::{FakeBoss, FeatureError, ObjectiveDisplay, ParticleEffect, TabCompleter};
use shimwire_host::memory::Release;
use shimwire_host::{ObjectRef, Value};
use shimwire_protocol::{DisplaySlot, EntityType, Location, Vector3};
use shimwire_symbols::{Resolver, SymbolConfig};

// =========================================================================
// Helpers
// =========================================================================

fn dispatcher_for(release: &Release) -> Dispatcher {
    let resolver = Resolver::new(release.host().clone(), &SymbolConfig::default());
    Dispatcher::new(Arc::new(resolver))
}

fn sent_kinds(release: &Release, client: &ObjectRef) -> Vec<String> {
    release
        .outbox(client)
        .iter()
        .map(|m| m.class().simple_name().to_string())
        .collect()
}

// =========================================================================
// Particles
// =========================================================================

#[test]
fn test_particles_reach_targets_only() {
    let release = Release::install("v1_8_R3");
    let dispatcher = dispatcher_for(&release);
    let alice = release.connect("alice");
    let bob = release.connect("bob");

    let effect = ParticleEffect::new("flame")
        .with_deviation(Vector3::new(0.1, 0.2, 0.1))
        .with_speed(0.5)
        .with_amount(20);
    let report = effect
        .play(&dispatcher, Location::new(10.0, 64.0, -3.0), std::slice::from_ref(&alice))
        .unwrap();

    assert_eq!(report.delivered, 1);
    assert_eq!(sent_kinds(&release, &alice), ["PacketPlayOutWorldParticles"]);
    assert!(release.outbox(&bob).is_empty());
}

#[test]
fn test_particles_skip_when_class_missing() {
    let release = Release::install("v1_8_R3");
    release
        .host()
        .remove_class(&release.internal_name("PacketPlayOutWorldParticles"));
    let dispatcher = dispatcher_for(&release);
    let alice = release.connect("alice");

    let report = ParticleEffect::new("flame").play_for_all(&dispatcher, Location::default());

    assert!(report.is_none());
    assert!(release.outbox(&alice).is_empty());
}

#[test]
fn test_particles_invalid_amount_is_skipped() {
    let release = Release::install("v1_8_R3");
    let dispatcher = dispatcher_for(&release);
    let alice = release.connect("alice");

    let report = ParticleEffect::new("flame")
        .with_amount(-1)
        .play(&dispatcher, Location::default(), &[alice]);
    assert!(report.is_none());
}

// =========================================================================
// Fake boss
// =========================================================================

#[test]
fn test_boss_gets_host_allocated_id() {
    let release = Release::install("v1_8_R3");
    let dispatcher = dispatcher_for(&release);
    let world = release.create_world("world");

    let first = FakeBoss::spawn(
        dispatcher.resolver(),
        &world,
        EntityType::Wither,
        "Wither",
        Location::new(0.0, 80.0, 0.0),
    )
    .unwrap();
    let second = FakeBoss::spawn(
        dispatcher.resolver(),
        &world,
        EntityType::EnderDragon,
        "Dragon",
        Location::new(0.0, 80.0, 0.0),
    )
    .unwrap();

    assert_ne!(first.entity_id(), second.entity_id());
    assert_eq!(first.health(), 300.0);
    assert_eq!(second.health(), 200.0);
}

#[test]
fn test_boss_lifecycle_messages() {
    let release = Release::install("v1_8_R3");
    let dispatcher = dispatcher_for(&release);
    let world = release.create_world("world");
    let viewer = release.connect("alice");
    let viewers = std::slice::from_ref(&viewer);

    let mut boss = FakeBoss::spawn(
        dispatcher.resolver(),
        &world,
        EntityType::Wither,
        "Wither",
        Location::new(0.0, 80.0, 0.0),
    )
    .unwrap();

    let report = boss.show(&dispatcher, viewers).unwrap();
    assert_eq!(report.delivered, 2);

    boss.set_health(&dispatcher, 1000.0, viewers).unwrap();
    assert_eq!(boss.health(), 300.0);
    boss.set_health(&dispatcher, -5.0, viewers).unwrap();
    assert_eq!(boss.health(), 0.0);

    boss.move_to(&dispatcher, Location::new(5.0, 90.0, 5.0), viewers).unwrap();
    assert_eq!(boss.location(), Location::new(5.0, 90.0, 5.0));

    boss.hide(&dispatcher, viewers).unwrap();

    assert_eq!(
        sent_kinds(&release, &viewer),
        [
            "PacketPlayOutSpawnEntityLiving",
            "PacketPlayOutEntityMetadata",
            "PacketPlayOutEntityMetadata",
            "PacketPlayOutEntityMetadata",
            "PacketPlayOutEntityTeleport",
            "PacketPlayOutEntityDestroy",
        ]
    );

    let outbox = release.outbox(&viewer);
    assert_eq!(outbox[0].raw_get("a"), Some(Value::Int(boss.entity_id())));
    assert_eq!(outbox[5].raw_get("a"), Some(Value::IntArray(vec![boss.entity_id()])));
}

#[test]
fn test_boss_metadata_failure_sends_nothing() {
    let release = Release::install("v1_8_R3");
    release.host().remove_class(&release.internal_name("WatchableObject"));
    let dispatcher = dispatcher_for(&release);
    let world = release.create_world("world");
    let viewer = release.connect("alice");

    let boss = FakeBoss::spawn(
        dispatcher.resolver(),
        &world,
        EntityType::EnderDragon,
        "Dragon",
        Location::default(),
    )
    .unwrap();

    assert!(boss.show(&dispatcher, &[viewer.clone()]).is_none());
    assert!(release.outbox(&viewer).is_empty());
}

#[test]
fn test_boss_spawn_fails_without_entity_class() {
    let release = Release::install("v1_8_R3");
    release.host().remove_class(&release.internal_name("EntityWither"));
    let dispatcher = dispatcher_for(&release);
    let world = release.create_world("world");

    let err = FakeBoss::spawn(
        dispatcher.resolver(),
        &world,
        EntityType::Wither,
        "Wither",
        Location::default(),
    )
    .unwrap_err();
    assert!(matches!(err, FeatureError::Resolution(_)));
}

// =========================================================================
// Objectives and completions
// =========================================================================

#[test]
fn test_objective_display_sends_slot_code() {
    let release = Release::install("v1_8_R3");
    let dispatcher = dispatcher_for(&release);
    let viewer = release.connect("alice");

    let display = ObjectiveDisplay::new(DisplaySlot::BelowName, "health");
    display.show(&dispatcher, std::slice::from_ref(&viewer)).unwrap();

    let outbox = release.outbox(&viewer);
    assert_eq!(outbox[0].raw_get("a"), Some(Value::Int(2)));
}

#[test]
fn test_objective_team_slot_is_skipped_without_lookup() {
    let release = Release::install("v1_8_R3");
    let dispatcher = dispatcher_for(&release);
    let viewer = release.connect("alice");
    let before = release.host().total_lookups();

    let display = ObjectiveDisplay::new(DisplaySlot::SidebarTeam("blue".into()), "kills");

    assert!(display.show(&dispatcher, &[viewer]).is_none());
    assert_eq!(release.host().total_lookups(), before);
}

#[test]
fn test_tab_completer_sends_matches() {
    let release = Release::install("v1_8_R3");
    let dispatcher = dispatcher_for(&release);
    let client = release.connect("alice");

    let completer = TabCompleter::new(["home", "hub", "spawn"]);
    let report = completer.complete(&dispatcher, &client, "h").unwrap();

    assert_eq!(report.delivered, 1);
    let outbox = release.outbox(&client);
    assert_eq!(
        outbox[0].raw_get("a"),
        Some(Value::StrArray(vec!["home".into(), "hub".into()]))
    );
}

#[test]
fn test_tab_completer_reports_disconnected_client() {
    let release = Release::install("v1_8_R3");
    let dispatcher = dispatcher_for(&release);
    let client = release.connect("alice");
    release.disconnect(&client);

    let report = TabCompleter::suggest(&dispatcher, &client, ["home"]).unwrap();
    assert_eq!(report.delivered, 0);
    assert!(report.failures[0].is_disconnected());
}
