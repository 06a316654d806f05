//! The "scoreboard display objective" message.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shimwire_host::Value;
use shimwire_symbols::Resolver;

use crate::builder::Assembler;
use crate::{BuildError, MessageBuilder, MessageKind, MessageObject};

/// Longest objective name the host accepts.
pub const MAX_OBJECTIVE_LEN: usize = 16;

/// Where an objective is shown.
///
/// The host's slot table is closed: only the first three variants have a
/// code. Team-colored sidebars parse, but building with one fails with
/// [`BuildError::UnsupportedSlot`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DisplaySlot {
    PlayerList,
    Sidebar,
    BelowName,
    SidebarTeam(String),
}

impl DisplaySlot {
    /// The host's numeric code for this slot.
    pub fn code(&self) -> Result<i32, BuildError> {
        match self {
            Self::PlayerList => Ok(0),
            Self::Sidebar => Ok(1),
            Self::BelowName => Ok(2),
            Self::SidebarTeam(_) => Err(BuildError::UnsupportedSlot(self.to_string())),
        }
    }
}

impl fmt::Display for DisplaySlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlayerList => f.write_str("list"),
            Self::Sidebar => f.write_str("sidebar"),
            Self::BelowName => f.write_str("belowName"),
            Self::SidebarTeam(color) => write!(f, "sidebar.team.{color}"),
        }
    }
}

impl FromStr for DisplaySlot {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "list" => Ok(Self::PlayerList),
            "sidebar" => Ok(Self::Sidebar),
            "belowName" => Ok(Self::BelowName),
            other => match other.strip_prefix("sidebar.team.") {
                Some(color) if !color.is_empty() => Ok(Self::SidebarTeam(color.to_string())),
                _ => Err(BuildError::UnsupportedSlot(other.to_string())),
            },
        }
    }
}

impl TryFrom<String> for DisplaySlot {
    type Error = BuildError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DisplaySlot> for String {
    fn from(slot: DisplaySlot) -> Self {
        slot.to_string()
    }
}

/// Builds a message that shows `objective` in a display slot.
///
/// Slot and name are checked here, before any symbol is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayObjectiveBuilder {
    slot_code: i32,
    objective: String,
}

impl DisplayObjectiveBuilder {
    pub fn new(slot: &DisplaySlot, objective: impl Into<String>) -> Result<Self, BuildError> {
        let slot_code = slot.code()?;
        let objective = objective.into();
        if objective.is_empty() {
            return Err(BuildError::invalid("objective", "name must not be empty"));
        }
        if objective.chars().count() > MAX_OBJECTIVE_LEN {
            return Err(BuildError::invalid(
                "objective",
                format!("name is longer than {MAX_OBJECTIVE_LEN} characters"),
            ));
        }
        Ok(Self { slot_code, objective })
    }

    pub fn slot_code(&self) -> i32 {
        self.slot_code
    }
}

impl MessageBuilder for DisplayObjectiveBuilder {
    const KIND: MessageKind = MessageKind::DisplayObjective;

    fn build(self, resolver: &Resolver) -> Result<MessageObject, BuildError> {
        Assembler::new(resolver, Self::KIND)
            .set("a", self.slot_code)
            .set("b", Value::Str(self.objective))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_codes() {
        assert_eq!(DisplaySlot::PlayerList.code().unwrap(), 0);
        assert_eq!(DisplaySlot::Sidebar.code().unwrap(), 1);
        assert_eq!(DisplaySlot::BelowName.code().unwrap(), 2);
    }

    #[test]
    fn test_team_sidebar_is_unsupported() {
        let slot: DisplaySlot = "sidebar.team.red".parse().unwrap();
        assert_eq!(slot, DisplaySlot::SidebarTeam("red".into()));
        assert_eq!(
            slot.code(),
            Err(BuildError::UnsupportedSlot("sidebar.team.red".into()))
        );
    }

    #[test]
    fn test_parse_unknown_slot_fails() {
        assert!(matches!(
            "footer".parse::<DisplaySlot>(),
            Err(BuildError::UnsupportedSlot(name)) if name == "footer"
        ));
        assert!("sidebar.team.".parse::<DisplaySlot>().is_err());
    }

    #[test]
    fn test_slot_serde_uses_host_names() {
        let json = serde_json::to_string(&DisplaySlot::BelowName).unwrap();
        assert_eq!(json, "\"belowName\"");
        let slot: DisplaySlot = serde_json::from_str("\"sidebar\"").unwrap();
        assert_eq!(slot, DisplaySlot::Sidebar);
    }

    #[test]
    fn test_new_rejects_long_objective() {
        let err = DisplayObjectiveBuilder::new(&DisplaySlot::Sidebar, "a".repeat(17)).unwrap_err();
        assert!(matches!(err, BuildError::InvalidInput { field: "objective", .. }));
        assert!(DisplayObjectiveBuilder::new(&DisplaySlot::Sidebar, "a".repeat(16)).is_ok());
    }
}
