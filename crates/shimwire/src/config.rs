//! Bridge configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shimwire_symbols::{SymbolConfig, VersionId};

/// Everything a plugin can tune about the bridge.
///
/// All fields are optional in JSON:
///
/// ```json
/// {
///   "internal_prefix": "net.minecraft.server",
///   "implementation_prefix": "org.bukkit.craftbukkit",
///   "version_override": "v1_8_R3",
///   "log_filter": "shimwire_symbols=debug,info"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Namespace prefixes and the optional version override.
    #[serde(flatten)]
    pub symbols: SymbolConfig,

    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            symbols: SymbolConfig::default(),
            log_filter: "info".to_string(),
        }
    }
}

impl BridgeConfig {
    /// Parses and validates a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON file; see [`from_json`](Self::from_json).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Rejects an override that is not a well-formed release tag.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.symbols.version_override {
            Some(tag) if VersionId::from_tag(tag).is_none() => {
                Err(ConfigError::InvalidVersion(tag.clone()))
            }
            _ => Ok(()),
        }
    }
}

/// Configuration could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    /// `version_override` does not look like `v<major>_<minor>_R<rev>`.
    #[error("invalid version override {0:?}")]
    InvalidVersion(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BridgeConfig::default();
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.symbols.names.internal_prefix, "net.minecraft.server");
        assert_eq!(config.symbols.names.implementation_prefix, "org.bukkit.craftbukkit");
        assert!(config.symbols.version_override.is_none());
    }

    #[test]
    fn test_from_json_empty_object_is_default() {
        assert_eq!(BridgeConfig::from_json("{}").unwrap(), BridgeConfig::default());
    }

    #[test]
    fn test_from_json_flat_fields() {
        let config = BridgeConfig::from_json(
            r#"{"internal_prefix":"nms","version_override":"v1_9_R2","log_filter":"debug"}"#,
        )
        .unwrap();
        assert_eq!(config.symbols.names.internal_prefix, "nms");
        assert_eq!(config.symbols.names.implementation_prefix, "org.bukkit.craftbukkit");
        assert_eq!(config.symbols.version_override.as_deref(), Some("v1_9_R2"));
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_from_json_rejects_bad_override() {
        let err = BridgeConfig::from_json(r#"{"version_override":"1.8"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVersion(tag) if tag == "1.8"));
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        assert!(matches!(
            BridgeConfig::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_from_file_missing() {
        let err = BridgeConfig::from_file("/nonexistent/shimwire.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_round_trip_keeps_flat_layout() {
        let json = serde_json::to_value(BridgeConfig::default()).unwrap();
        assert_eq!(json["internal_prefix"], "net.minecraft.server");
        assert_eq!(json["log_filter"], "info");
    }
}
