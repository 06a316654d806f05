//! Version identifiers.
//!
//! A [`VersionId`] is an opaque tag such as `v1_8_R3`, read from the
//! namespace of the host's implementation object. It partitions every
//! cached symbol; nothing ever compares two versions for order.

use std::fmt;
use std::sync::{Arc, LazyLock, OnceLock, Weak};

use parking_lot::Mutex;
use shimwire_host::HostRuntime;

/// Versions already read from live hosts, one entry per host object.
static DETECTED: LazyLock<Mutex<Vec<(Weak<dyn HostRuntime>, VersionId)>>> =
    LazyLock::new(|| Mutex::new(Vec::new()));

/// Opaque per-run tag naming one host release's internal layout.
///
/// Backed by an `Arc<str>` because it is cloned into every cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionId(Arc<str>);

impl VersionId {
    /// The tag used when the host's namespace does not follow the
    /// `v<major>_<minor>_R<revision>` convention.
    pub const UNKNOWN_TAG: &'static str = "unknown";

    /// The "unknown" sentinel. Every symbol resolved under it fails.
    pub fn unknown() -> Self {
        Self(Arc::from(Self::UNKNOWN_TAG))
    }

    /// Validates a tag against the naming convention.
    ///
    /// Returns `None` for anything that is not `v<digits>_<digits>_R<digits>`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        is_release_tag(tag).then(|| Self(Arc::from(tag)))
    }

    /// Derives the version from an implementation namespace such as
    /// `org.bukkit.craftbukkit.v1_8_R3`: the last dot-separated segment,
    /// if it is a release tag. Anything else yields the sentinel.
    pub fn from_namespace(namespace: &str) -> Self {
        namespace
            .rsplit('.')
            .next()
            .and_then(Self::from_tag)
            .unwrap_or_else(Self::unknown)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unknown(&self) -> bool {
        &*self.0 == Self::UNKNOWN_TAG
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `v1_8_R3` → true; `v1_8`, `1_8_R3`, `v1_8_R` → false.
fn is_release_tag(tag: &str) -> bool {
    fn digits(s: &str) -> bool {
        !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
    }

    let Some(rest) = tag.strip_prefix('v') else {
        return false;
    };
    let mut parts = rest.split('_');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(major), Some(minor), Some(revision), None) => {
            digits(major)
                && digits(minor)
                && revision.strip_prefix('R').is_some_and(digits)
        }
        _ => false,
    }
}

/// Computes the [`VersionId`] once and hands out the cached value after.
///
/// A configured override takes precedence over introspection; an invalid
/// override is ignored with a warning.
#[derive(Debug, Default)]
pub struct VersionResolver {
    cell: OnceLock<VersionId>,
    override_tag: Option<String>,
}

impl VersionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forces a specific tag instead of reading the host's namespace.
    pub fn with_override(tag: impl Into<String>) -> Self {
        Self {
            cell: OnceLock::new(),
            override_tag: Some(tag.into()),
        }
    }

    /// Returns the version, computing it on first call. Never fails: an
    /// unreadable or malformed namespace yields [`VersionId::unknown`].
    ///
    /// Reads the namespace directly; only this resolver caches it. Use
    /// [`resolve_shared`](Self::resolve_shared) to share one detection
    /// across every resolver in the process.
    pub fn resolve(&self, host: &dyn HostRuntime) -> &VersionId {
        self.cell
            .get_or_init(|| self.configured().unwrap_or_else(|| read_namespace(host)))
    }

    /// Like [`resolve`](Self::resolve), but introspection goes through the
    /// process-wide cache, so a host's namespace is read once however many
    /// resolvers are created for it.
    pub fn resolve_shared(&self, host: &Arc<dyn HostRuntime>) -> &VersionId {
        self.cell
            .get_or_init(|| self.configured().unwrap_or_else(|| detect_version(host)))
    }

    /// The cached version, if [`resolve`](Self::resolve) already ran.
    pub fn get(&self) -> Option<&VersionId> {
        self.cell.get()
    }

    fn configured(&self) -> Option<VersionId> {
        let tag = self.override_tag.as_deref()?;
        match VersionId::from_tag(tag) {
            Some(version) => {
                tracing::info!(%version, "using configured host version");
                Some(version)
            }
            None => {
                tracing::warn!(tag = %tag, "ignoring malformed version override");
                None
            }
        }
    }
}

/// The version of `host`, read from its namespace the first time this
/// host object is seen and cached for the rest of the process.
///
/// Entries die with their host, so a dropped host never lends its version
/// to a new one allocated at the same address.
pub fn detect_version(host: &Arc<dyn HostRuntime>) -> VersionId {
    let mut detected = DETECTED.lock();
    detected.retain(|(seen, _)| seen.strong_count() > 0);

    let target = Arc::as_ptr(host);
    if let Some((_, version)) = detected
        .iter()
        .find(|(seen, _)| std::ptr::addr_eq(seen.as_ptr(), target))
    {
        return version.clone();
    }

    let version = read_namespace(host.as_ref());
    detected.push((Arc::downgrade(host), version.clone()));
    version
}

fn read_namespace(host: &dyn HostRuntime) -> VersionId {
    match host.implementation_namespace() {
        Some(namespace) => {
            let version = VersionId::from_namespace(&namespace);
            if version.is_unknown() {
                tracing::warn!(
                    namespace = %namespace,
                    "host namespace does not carry a release tag"
                );
            } else {
                tracing::info!(%version, "detected host version");
            }
            version
        }
        None => {
            tracing::warn!("host implementation namespace unavailable");
            VersionId::unknown()
        }
    }
}
