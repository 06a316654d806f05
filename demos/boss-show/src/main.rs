use serde::Deserialize;
use shimwire::host::memory::Release;
use shimwire::prelude::*;

// ---------------------------------------------------------------------------
// Show script
// ---------------------------------------------------------------------------

const SCRIPT: &str = r#"{
    "bridge": { "log_filter": "boss_show=info,shimwire_symbols=debug,info" },
    "boss": { "kind": "Wither", "name": "The Withered One" },
    "arrival": { "name": "explode", "speed": 0.2, "amount": 40 },
    "objective": { "slot": "sidebar", "objective": "damage" },
    "hits": [60.0, 90.0, 150.0]
}"#;

#[derive(Deserialize)]
struct Script {
    #[serde(default)]
    bridge: BridgeConfig,
    boss: BossSpec,
    arrival: ParticleEffect,
    objective: ObjectiveDisplay,
    hits: Vec<f32>,
}

#[derive(Deserialize)]
struct BossSpec {
    kind: EntityType,
    name: String,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let script: Script = serde_json::from_str(SCRIPT)?;
    init_logging(&script.bridge);

    let release = Release::install("v1_8_R3");
    let world = release.create_world("arena");
    let viewers: Vec<_> = ["alice", "bob", "carol"]
        .into_iter()
        .map(|name| release.connect(name))
        .collect();

    let bridge = Bridge::new(release.host().clone(), &script.bridge);
    let dispatcher = bridge.dispatcher();
    let spawn_at = Location::new(0.5, 72.0, 0.5).with_facing(180.0, 0.0);

    script.arrival.play(dispatcher, spawn_at, &viewers);
    script.objective.show(dispatcher, &viewers);

    let mut boss = FakeBoss::spawn(
        bridge.resolver(),
        &world,
        script.boss.kind,
        script.boss.name,
        spawn_at,
    )?;
    boss.show(dispatcher, &viewers);
    tracing::info!(entity_id = boss.entity_id(), "boss on stage");

    // One viewer drops mid-show; the rest keep receiving.
    release.disconnect(&viewers[2]);

    for damage in script.hits {
        let health = boss.health() - damage;
        if let Some(report) = boss.set_health(dispatcher, health, &viewers) {
            tracing::info!(
                health = boss.health(),
                fraction = boss.health_fraction(),
                delivered = report.delivered,
                failed = report.failures.len(),
                "boss hit"
            );
        }
        let mut next = boss.location();
        next.y += 2.0;
        boss.move_to(dispatcher, next, &viewers);
    }

    boss.hide(dispatcher, &viewers);

    let farewell = bridge.build(TabCompleteBuilder::new(["/rematch", "/leave"]))?;
    let report = bridge.broadcast(&farewell).await;
    tracing::info!(delivered = report.delivered, "farewell sent");

    for viewer in &viewers[..2] {
        println!("{}: {} messages", viewer.describe(), release.outbox(viewer).len());
    }
    let stats = bridge.stats();
    println!(
        "symbols: {} lookups, {} cache hits, {} host resolutions, {} failures",
        stats.lookups, stats.hits, stats.attempts, stats.failures
    );
    Ok(())
}
