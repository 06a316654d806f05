//! The resolver: a host, its detected version and a symbol table, bundled.
//!
//! Builders and the dispatcher never pass versions around themselves; they
//! ask a [`Resolver`], which always resolves under the one version it was
//! created with.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shimwire_host::{HostRuntime, ObjectRef};

use crate::{
    ClassDescriptor, MemberHandle, MemberKind, Namespace, NamespaceConfig, ResolutionError,
    Signature, SymbolStats, SymbolTable, VersionId, VersionResolver,
};

/// Settings for symbol resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolConfig {
    /// Namespace prefixes for qualifying class names.
    #[serde(flatten)]
    pub names: NamespaceConfig,

    /// Use this release tag instead of reading it from the host.
    pub version_override: Option<String>,
}

/// Resolves symbols for one host under one version.
pub struct Resolver {
    host: Arc<dyn HostRuntime>,
    version: VersionId,
    names: NamespaceConfig,
    table: SymbolTable,
}

impl Resolver {
    /// Detects the host's version and creates an empty symbol table.
    ///
    /// Detection is cached process-wide per host, so every resolver for the
    /// same host agrees on the version and the namespace is read once.
    pub fn new(host: Arc<dyn HostRuntime>, config: &SymbolConfig) -> Self {
        let versions = match &config.version_override {
            Some(tag) => VersionResolver::with_override(tag.clone()),
            None => VersionResolver::new(),
        };
        let version = versions.resolve_shared(&host).clone();
        Self::with_version(host, version, config.names.clone())
    }

    /// Uses an already known version.
    pub fn with_version(
        host: Arc<dyn HostRuntime>,
        version: VersionId,
        names: NamespaceConfig,
    ) -> Self {
        Self {
            host,
            version,
            names,
            table: SymbolTable::new(),
        }
    }

    pub fn host(&self) -> &Arc<dyn HostRuntime> {
        &self.host
    }

    pub fn version(&self) -> &VersionId {
        &self.version
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn stats(&self) -> SymbolStats {
        self.table.stats()
    }

    /// Qualifies `simple` under this resolver's version.
    pub fn qualify(&self, namespace: Namespace, simple: &str) -> String {
        self.names.qualify(namespace, &self.version, simple)
    }

    /// Resolves a class by simple name, e.g.
    /// `class(Namespace::Internal, "PacketPlayOutTabComplete")`.
    pub fn class(
        &self,
        namespace: Namespace,
        simple: &str,
    ) -> Result<ClassDescriptor, ResolutionError> {
        self.class_named(&self.qualify(namespace, simple))
    }

    /// Resolves a class by fully qualified name.
    pub fn class_named(&self, qualified: &str) -> Result<ClassDescriptor, ResolutionError> {
        self.table.resolve_class(self.host.as_ref(), &self.version, qualified)
    }

    /// Resolves the runtime class of `object`.
    ///
    /// An object from a different release carries a class name this host
    /// does not know, so it fails here rather than later.
    pub fn class_of(&self, object: &ObjectRef) -> Result<ClassDescriptor, ResolutionError> {
        self.class_named(object.class().name())
    }

    pub fn field(
        &self,
        class: &ClassDescriptor,
        name: &str,
    ) -> Result<MemberHandle, ResolutionError> {
        self.table.resolve_field(class, name)
    }

    pub fn method(
        &self,
        class: &ClassDescriptor,
        name: &str,
        signature: Option<&Signature>,
    ) -> Result<MemberHandle, ResolutionError> {
        self.table.resolve_method(class, name, signature)
    }

    pub fn constructor(
        &self,
        class: &ClassDescriptor,
        signature: &Signature,
    ) -> Result<MemberHandle, ResolutionError> {
        self.table.resolve_constructor(class, signature)
    }

    /// Explicitly re-attempts a class that previously failed.
    pub fn retry_class(
        &self,
        namespace: Namespace,
        simple: &str,
    ) -> Result<ClassDescriptor, ResolutionError> {
        let qualified = self.qualify(namespace, simple);
        self.table.retry_class(self.host.as_ref(), &self.version, &qualified)
    }

    /// Explicitly re-attempts a member that previously failed.
    pub fn retry_member(
        &self,
        class: &ClassDescriptor,
        kind: MemberKind,
        name: &str,
        signature: Option<&Signature>,
    ) -> Result<MemberHandle, ResolutionError> {
        self.table.retry_member(class, kind, name, signature)
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("version", &self.version)
            .field("names", &self.names)
            .field("stats", &self.table.stats())
            .finish_non_exhaustive()
    }
}
