//! Error types for message construction.
//!
//! Construction fails in two phases. Input validation happens in the
//! builder's constructor and setters, before anything is resolved
//! ([`BuildError::UnsupportedSlot`], [`BuildError::InvalidInput`]).
//! Resolution and population happen in `build()`
//! ([`BuildError::Unresolved`], [`BuildError::Invocation`]).

use shimwire_symbols::{InvocationError, ResolutionError, VersionId};

use crate::MessageKind;

/// A message could not be constructed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    /// The slot has no code in the host's closed slot table.
    #[error("unsupported display slot: {0}")]
    UnsupportedSlot(String),

    /// An input is outside the range the message defines.
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    /// One or more symbols the message needs are missing in this version.
    /// No object was allocated.
    #[error("cannot build {kind} for version {version}: missing {}", format_missing(.missing))]
    Unresolved {
        kind: MessageKind,
        version: VersionId,
        missing: Vec<ResolutionError>,
    },

    /// A resolved member rejected a value while populating the message.
    /// The partial object was discarded.
    #[error("cannot populate {kind}: {source}")]
    Invocation {
        kind: MessageKind,
        #[source]
        source: InvocationError,
    },
}

impl BuildError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Names of the symbols that failed to resolve, if any.
    pub fn missing_symbols(&self) -> Vec<&str> {
        match self {
            Self::Unresolved { missing, .. } => missing.iter().map(|e| e.symbol()).collect(),
            _ => Vec::new(),
        }
    }
}

fn format_missing(missing: &[ResolutionError]) -> String {
    missing
        .iter()
        .map(|e| e.symbol())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_lists_every_symbol() {
        let version = VersionId::from_tag("v1_8_R3").unwrap();
        let err = BuildError::Unresolved {
            kind: MessageKind::TabComplete,
            version: version.clone(),
            missing: vec![
                ResolutionError::ClassNotFound { name: "A".into(), version: version.clone() },
                ResolutionError::ClassNotFound { name: "B".into(), version },
            ],
        };
        assert_eq!(err.missing_symbols(), vec!["A", "B"]);
        assert!(err.to_string().ends_with("missing A, B"));
        assert!(err.to_string().contains("v1_8_R3"));
    }

    #[test]
    fn test_invalid_input_message() {
        let err = BuildError::invalid("amount", "must not be negative");
        assert_eq!(err.to_string(), "invalid amount: must not be negative");
        assert!(err.missing_symbols().is_empty());
    }
}
