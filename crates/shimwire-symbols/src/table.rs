//! The symbol table: a per-version, append-only cache of resolutions.
//!
//! # Concurrency
//!
//! Each key owns a *slot*: an `Arc<OnceLock<Result<..>>>`. Looking up a key
//! takes the map's read lock (or, the first time, its write lock) only long
//! enough to clone the slot out. The actual host lookup runs inside
//! `OnceLock::get_or_init`, outside the map lock, so:
//!
//! - concurrent first lookups of the *same* key block on the slot and all
//!   observe the single outcome;
//! - lookups of *different* keys never wait for each other's host calls.
//!
//! Failures are cached exactly like successes. Only an explicit `retry_*`
//! call replaces a cached failure.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use shimwire_host::HostRuntime;

use crate::{ClassDescriptor, MemberHandle, MemberKind, ResolutionError, Signature, VersionId};

type Slot<T> = Arc<OnceLock<Result<T, ResolutionError>>>;

/// The name every constructor is cached and reported under.
const CONSTRUCTOR_NAME: &str = "<init>";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ClassKey {
    version: VersionId,
    name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MemberKey {
    version: VersionId,
    class: String,
    kind: MemberKind,
    name: String,
    signature: Option<Signature>,
}

/// Counters describing how the table has been used.
#[derive(Debug, Default)]
struct Counters {
    lookups: AtomicU64,
    hits: AtomicU64,
    attempts: AtomicU64,
    failures: AtomicU64,
}

/// A point-in-time copy of the table's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SymbolStats {
    /// Every `resolve_*` call.
    pub lookups: u64,
    /// Calls answered from an already computed slot.
    pub hits: u64,
    /// Underlying resolution attempts (one per key, plus retries).
    pub attempts: u64,
    /// Attempts that produced a `ResolutionError`.
    pub failures: u64,
}

/// Cache of resolved classes and members, partitioned by version.
#[derive(Debug, Default)]
pub struct SymbolTable {
    classes: RwLock<HashMap<ClassKey, Slot<ClassDescriptor>>>,
    members: RwLock<HashMap<MemberKey, Slot<MemberHandle>>>,
    counters: Counters,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a class by fully qualified name under `version`.
    ///
    /// Under the unknown sentinel this fails without asking the host.
    pub fn resolve_class(
        &self,
        host: &dyn HostRuntime,
        version: &VersionId,
        name: &str,
    ) -> Result<ClassDescriptor, ResolutionError> {
        let key = ClassKey {
            version: version.clone(),
            name: name.to_string(),
        };
        let slot = slot_for(&self.classes, &key);
        self.run(&slot, || {
            let not_found = || ResolutionError::ClassNotFound {
                name: name.to_string(),
                version: version.clone(),
            };
            if version.is_unknown() {
                return Err(not_found());
            }
            host.find_class(name)
                .map(|class| ClassDescriptor::new(version.clone(), class))
                .ok_or_else(not_found)
        })
    }

    /// Resolves a field declared on `class` or a superclass.
    pub fn resolve_field(
        &self,
        class: &ClassDescriptor,
        name: &str,
    ) -> Result<MemberHandle, ResolutionError> {
        self.resolve_member(class, MemberKind::Field, name, None)
    }

    /// Resolves a method on `class` or a superclass. Without a signature
    /// the first method with the name is taken.
    pub fn resolve_method(
        &self,
        class: &ClassDescriptor,
        name: &str,
        signature: Option<&Signature>,
    ) -> Result<MemberHandle, ResolutionError> {
        self.resolve_member(class, MemberKind::Method, name, signature)
    }

    /// Resolves a constructor declared on `class` itself.
    pub fn resolve_constructor(
        &self,
        class: &ClassDescriptor,
        signature: &Signature,
    ) -> Result<MemberHandle, ResolutionError> {
        self.resolve_member(
            class,
            MemberKind::Constructor,
            CONSTRUCTOR_NAME,
            Some(signature),
        )
    }

    /// Resolves a member of any kind. Constructors ignore `name`: they are
    /// always cached and reported as `<init>`.
    pub fn resolve_member(
        &self,
        class: &ClassDescriptor,
        kind: MemberKind,
        name: &str,
        signature: Option<&Signature>,
    ) -> Result<MemberHandle, ResolutionError> {
        let name = member_name(kind, name);
        let key = member_key(class, kind, name, signature);
        let slot = slot_for(&self.members, &key);
        self.run(&slot, || lookup_member(class, kind, name, signature))
    }

    /// Drops a cached *failure* for this class and resolves it again.
    /// A cached success is returned unchanged.
    pub fn retry_class(
        &self,
        host: &dyn HostRuntime,
        version: &VersionId,
        name: &str,
    ) -> Result<ClassDescriptor, ResolutionError> {
        let key = ClassKey {
            version: version.clone(),
            name: name.to_string(),
        };
        evict_failure(&self.classes, &key);
        self.resolve_class(host, version, name)
    }

    /// Drops a cached failure for this member and resolves it again.
    pub fn retry_member(
        &self,
        class: &ClassDescriptor,
        kind: MemberKind,
        name: &str,
        signature: Option<&Signature>,
    ) -> Result<MemberHandle, ResolutionError> {
        let name = member_name(kind, name);
        evict_failure(&self.members, &member_key(class, kind, name, signature));
        self.resolve_member(class, kind, name, signature)
    }

    /// Number of cached class entries (successes and failures).
    pub fn cached_classes(&self) -> usize {
        self.classes.read().len()
    }

    /// Number of cached member entries (successes and failures).
    pub fn cached_members(&self) -> usize {
        self.members.read().len()
    }

    pub fn stats(&self) -> SymbolStats {
        SymbolStats {
            lookups: self.counters.lookups.load(Ordering::Relaxed),
            hits: self.counters.hits.load(Ordering::Relaxed),
            attempts: self.counters.attempts.load(Ordering::Relaxed),
            failures: self.counters.failures.load(Ordering::Relaxed),
        }
    }

    /// Runs `resolve` at most once for `slot` and returns the cached result.
    fn run<T: Clone>(
        &self,
        slot: &Slot<T>,
        resolve: impl FnOnce() -> Result<T, ResolutionError>,
    ) -> Result<T, ResolutionError> {
        self.counters.lookups.fetch_add(1, Ordering::Relaxed);

        let mut computed = false;
        let result = slot.get_or_init(|| {
            computed = true;
            self.counters.attempts.fetch_add(1, Ordering::Relaxed);
            let result = resolve();
            if let Err(e) = &result {
                self.counters.failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    version = %e.version(),
                    symbol = e.symbol(),
                    error = %e,
                    "symbol resolution failed"
                );
            }
            result
        });

        if !computed {
            self.counters.hits.fetch_add(1, Ordering::Relaxed);
        }
        result.clone()
    }
}

/// Returns the slot for `key`, inserting an empty one if absent.
fn slot_for<K, T>(map: &RwLock<HashMap<K, Slot<T>>>, key: &K) -> Slot<T>
where
    K: Eq + Hash + Clone,
{
    if let Some(slot) = map.read().get(key) {
        return Arc::clone(slot);
    }
    // Another thread may have inserted between the two locks; `entry`
    // keeps whichever slot got there first.
    Arc::clone(map.write().entry(key.clone()).or_default())
}

fn evict_failure<K, T>(map: &RwLock<HashMap<K, Slot<T>>>, key: &K)
where
    K: Eq + Hash,
{
    let mut map = map.write();
    let failed = matches!(map.get(key).and_then(|slot| slot.get()), Some(Err(_)));
    if failed {
        map.remove(key);
        tracing::debug!("evicted cached resolution failure for retry");
    }
}

fn member_name(kind: MemberKind, name: &str) -> &str {
    match kind {
        MemberKind::Constructor => CONSTRUCTOR_NAME,
        MemberKind::Field | MemberKind::Method => name,
    }
}

fn member_key(
    class: &ClassDescriptor,
    kind: MemberKind,
    name: &str,
    signature: Option<&Signature>,
) -> MemberKey {
    MemberKey {
        version: class.version().clone(),
        class: class.name().to_string(),
        kind,
        name: name.to_string(),
        signature: signature.cloned(),
    }
}

fn lookup_member(
    class: &ClassDescriptor,
    kind: MemberKind,
    name: &str,
    signature: Option<&Signature>,
) -> Result<MemberHandle, ResolutionError> {
    let version = class.version().clone();
    let host_class = class.class();
    let params = signature.map(Signature::params);

    let found = match kind {
        MemberKind::Field => host_class
            .field(name)
            .map(|f| MemberHandle::open_field(version.clone(), f)),
        MemberKind::Method => host_class
            .method(name, params)
            .map(|m| MemberHandle::open_method(version.clone(), m)),
        MemberKind::Constructor => host_class
            .constructor(params.unwrap_or_default())
            .map(|c| MemberHandle::open_constructor(version.clone(), c)),
    };

    found.ok_or_else(|| ResolutionError::MemberNotFound {
        class: class.simple_name().to_string(),
        name: name.to_string(),
        kind,
        signature: signature.map(|s| s.to_string()).unwrap_or_default(),
        version,
    })
}
