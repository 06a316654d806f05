//! Integration tests for resolution against an installed release.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use shimwire_host::memory::{MemoryHost, Release};
use shimwire_host::{ClassRef, HostFault, HostRuntime, ObjectRef, Value};
use shimwire_symbols::{
    InvocationError, MemberKind, Namespace, ResolutionError, Resolver, SymbolConfig,
};

// =========================================================================
// Helpers
// =========================================================================

fn resolver_for(release: &Release) -> Resolver {
    Resolver::new(release.host().clone(), &SymbolConfig::default())
}

/// Counts namespace reads on top of an in-memory host.
struct CountingHost {
    inner: MemoryHost,
    namespace_reads: AtomicUsize,
}

impl HostRuntime for CountingHost {
    fn implementation_namespace(&self) -> Option<String> {
        self.namespace_reads.fetch_add(1, Ordering::SeqCst);
        self.inner.implementation_namespace()
    }

    fn find_class(&self, qualified_name: &str) -> Option<ClassRef> {
        self.inner.find_class(qualified_name)
    }

    fn online_clients(&self) -> Vec<ObjectRef> {
        self.inner.online_clients()
    }
}

// =========================================================================
// Idempotent resolution
// =========================================================================

#[test]
fn test_resolve_twice_same_behavior() {
    let release = Release::install("v1_8_R3");
    let resolver = resolver_for(&release);

    let first = resolver.class(Namespace::Internal, "PacketPlayOutTabComplete").unwrap();
    let second = resolver.class(Namespace::Internal, "PacketPlayOutTabComplete").unwrap();
    assert_eq!(first, second);

    let a = resolver.field(&first, "a").unwrap();
    let b = resolver.field(&second, "a").unwrap();
    let object = ObjectRef::allocate(first.class());

    a.set(&object, Value::StrArray(vec!["x".into()])).unwrap();
    assert_eq!(b.get(&object).unwrap(), Value::StrArray(vec!["x".into()]));
    assert_eq!(a.owner(), b.owner());
}

#[test]
fn test_member_lookup_walks_inheritance() {
    let release = Release::install("v1_8_R3");
    let resolver = resolver_for(&release);
    let dragon = resolver.class(Namespace::Internal, "EntityEnderDragon").unwrap();
    let get_id = resolver.method(&dragon, "getId", None).unwrap();
    assert_eq!(get_id.owner().simple_name(), "Entity");
}

// =========================================================================
// Version partitioning
// =========================================================================

#[test]
fn test_handles_from_other_version_rejected() {
    let old = Release::install("v1_8_R3");
    let new = Release::install("v1_9_R1");
    let old_resolver = resolver_for(&old);
    let new_resolver = resolver_for(&new);

    let old_class = old_resolver.class(Namespace::Internal, "PacketPlayOutTabComplete").unwrap();
    let new_class = new_resolver.class(Namespace::Internal, "PacketPlayOutTabComplete").unwrap();
    assert_ne!(old_class, new_class);

    let old_field = old_resolver.field(&old_class, "a").unwrap();
    let new_object = ObjectRef::allocate(new_class.class());

    let err = old_field
        .set(&new_object, Value::StrArray(vec!["home".into()]))
        .unwrap_err();
    match err {
        InvocationError::Fault { version, source, .. } => {
            assert_eq!(version.as_str(), "v1_8_R3");
            assert!(matches!(source, HostFault::WrongTarget { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    // The foreign object is untouched.
    assert_eq!(new_object.raw_get("a"), Some(Value::Null));
}

#[test]
fn test_same_simple_name_resolves_per_version() {
    let old = Release::install("v1_8_R3");
    let resolver = resolver_for(&old);
    let class = resolver.class(Namespace::Internal, "Packet").unwrap();
    assert!(class.name().contains("v1_8_R3"));
    assert_eq!(class.version().as_str(), "v1_8_R3");
}

// =========================================================================
// Fail-closed
// =========================================================================

#[test]
fn test_nonexistent_class_is_error() {
    let release = Release::install("v1_8_R3");
    let resolver = resolver_for(&release);
    let err = resolver
        .class(Namespace::Internal, "PacketPlayOutDoesNotExist")
        .unwrap_err();
    assert!(matches!(err, ResolutionError::ClassNotFound { .. }));
    assert_eq!(err.version().as_str(), "v1_8_R3");
    assert!(err.to_string().contains("PacketPlayOutDoesNotExist"));
}

#[test]
fn test_nonexistent_member_is_error() {
    let release = Release::install("v1_8_R3");
    let resolver = resolver_for(&release);
    let class = resolver.class(Namespace::Internal, "PacketPlayOutTabComplete").unwrap();
    for kind in [MemberKind::Field, MemberKind::Method] {
        let err = resolver
            .table()
            .resolve_member(&class, kind, "zzz", None)
            .unwrap_err();
        assert_eq!(err.symbol(), "zzz");
    }
}

#[test]
fn test_version_detected_once_per_host() {
    let counting = Arc::new(CountingHost {
        inner: MemoryHost::builder().namespace("org.bukkit.craftbukkit.v1_8_R3").build(),
        namespace_reads: AtomicUsize::new(0),
    });
    let host: Arc<dyn HostRuntime> = counting.clone();

    let first = Resolver::new(host.clone(), &SymbolConfig::default());
    let second = Resolver::new(host.clone(), &SymbolConfig::default());

    assert_eq!(first.version().as_str(), "v1_8_R3");
    assert_eq!(first.version(), second.version());
    assert_eq!(counting.namespace_reads.load(Ordering::SeqCst), 1);
}

#[test]
fn test_version_override_skips_namespace_read() {
    let counting = Arc::new(CountingHost {
        inner: MemoryHost::builder().namespace("org.bukkit.craftbukkit.v1_8_R3").build(),
        namespace_reads: AtomicUsize::new(0),
    });
    let config = SymbolConfig {
        version_override: Some("v1_9_R1".into()),
        ..SymbolConfig::default()
    };

    let resolver = Resolver::new(counting.clone(), &config);
    assert_eq!(resolver.version().as_str(), "v1_9_R1");
    assert_eq!(counting.namespace_reads.load(Ordering::SeqCst), 0);
}

#[test]
fn test_unknown_version_fails_every_symbol() {
    let host = Arc::new(MemoryHost::builder().namespace("org.bukkit.craftbukkit").build());
    let resolver = Resolver::new(host.clone(), &SymbolConfig::default());
    assert!(resolver.version().is_unknown());
    assert!(resolver.class(Namespace::Internal, "Packet").is_err());
    assert_eq!(host.total_lookups(), 0);
}

#[test]
fn test_retry_after_class_appears() {
    let release = Release::install("v1_8_R3");
    let name = release.internal_name("PacketPlayOutTabComplete");
    let class = release.host().class(&name).unwrap();
    release.host().remove_class(&name);

    let resolver = resolver_for(&release);
    assert!(resolver.class(Namespace::Internal, "PacketPlayOutTabComplete").is_err());

    release.host().define(class);
    assert!(resolver.class(Namespace::Internal, "PacketPlayOutTabComplete").is_err());
    assert!(resolver.retry_class(Namespace::Internal, "PacketPlayOutTabComplete").is_ok());
}

// =========================================================================
// Concurrency
// =========================================================================

#[test]
fn test_ten_concurrent_callers_single_lookup() {
    // A slow lookup keeps every caller inside the first-resolution window.
    let release = Release::install_with(
        MemoryHost::builder().lookup_delay(Duration::from_millis(50)),
        "v1_8_R3",
    );
    let resolver = resolver_for(&release);
    let name = release.internal_name("PacketPlayOutTabComplete");

    let results: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..10)
            .map(|_| s.spawn(|| resolver.class(Namespace::Internal, "PacketPlayOutTabComplete")))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(release.host().lookup_count(&name), 1);
    assert_eq!(resolver.stats().attempts, 1);
    assert_eq!(resolver.stats().lookups, 10);

    let first = results[0].as_ref().unwrap();
    for result in &results {
        let descriptor = result.as_ref().expect("every caller succeeds");
        assert_eq!(descriptor, first);
    }
}

#[test]
fn test_concurrent_member_resolution_single_attempt() {
    let release = Release::install("v1_8_R3");
    let resolver = resolver_for(&release);
    let class = resolver.class(Namespace::Internal, "PacketPlayOutWorldParticles").unwrap();
    let before = resolver.stats().attempts;

    thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                for field in ["a", "b", "c", "d"] {
                    resolver.field(&class, field).unwrap();
                }
            });
        }
    });

    assert_eq!(resolver.stats().attempts - before, 4);
    assert_eq!(resolver.table().cached_members(), 4);
}
