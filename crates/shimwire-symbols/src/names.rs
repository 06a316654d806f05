//! Symbol naming: namespaces, qualified class names and signatures.

use std::fmt;

use serde::{Deserialize, Serialize};
use shimwire_host::ValueKind;

use crate::VersionId;

/// Which of the host's two private namespaces a class lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// The host's core internals (messages, entities, connections).
    Internal,
    /// The host's implementation of its public interface (client and
    /// world wrappers).
    Implementation,
}

/// Prefixes used to qualify simple class names.
///
/// A qualified name is `<prefix>.<version>.<simple name>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamespaceConfig {
    pub internal_prefix: String,
    pub implementation_prefix: String,
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        Self {
            internal_prefix: "net.minecraft.server".to_string(),
            implementation_prefix: "org.bukkit.craftbukkit".to_string(),
        }
    }
}

impl NamespaceConfig {
    pub fn prefix(&self, namespace: Namespace) -> &str {
        match namespace {
            Namespace::Internal => &self.internal_prefix,
            Namespace::Implementation => &self.implementation_prefix,
        }
    }

    /// Builds the fully qualified name of `simple` under `version`.
    pub fn qualify(&self, namespace: Namespace, version: &VersionId, simple: &str) -> String {
        format!("{}.{}.{}", self.prefix(namespace), version, simple)
    }
}

/// Ordered parameter kinds, used to pick one overload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Signature(Vec<ValueKind>);

impl Signature {
    /// The no-argument signature.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn of(params: &[ValueKind]) -> Self {
        Self(params.to_vec())
    }

    pub fn params(&self) -> &[ValueKind] {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, kind) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{kind}")?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualify_internal() {
        let names = NamespaceConfig::default();
        let version = VersionId::from_tag("v1_8_R3").unwrap();
        assert_eq!(
            names.qualify(Namespace::Internal, &version, "PacketPlayOutTabComplete"),
            "net.minecraft.server.v1_8_R3.PacketPlayOutTabComplete"
        );
        assert_eq!(
            names.qualify(Namespace::Implementation, &version, "entity.CraftPlayer"),
            "org.bukkit.craftbukkit.v1_8_R3.entity.CraftPlayer"
        );
    }

    #[test]
    fn test_signature_display() {
        assert_eq!(Signature::empty().to_string(), "()");
        assert_eq!(
            Signature::of(&[ValueKind::Int, ValueKind::Object]).to_string(),
            "(int, Object)"
        );
    }

    #[test]
    fn test_namespace_config_partial_json_uses_defaults() {
        let names: NamespaceConfig =
            serde_json::from_str(r#"{"internal_prefix": "com.example.internal"}"#).unwrap();
        assert_eq!(names.internal_prefix, "com.example.internal");
        assert_eq!(names.implementation_prefix, "org.bukkit.craftbukkit");
    }
}
