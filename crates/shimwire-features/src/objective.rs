//! Scoreboard objective display.

use serde::{Deserialize, Serialize};
use shimwire_dispatch::{DispatchReport, Dispatcher};
use shimwire_host::ObjectRef;
use shimwire_protocol::{DisplayObjectiveBuilder, DisplaySlot, MessageBuilder};

use crate::deliver;

/// Shows one objective in one display slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveDisplay {
    pub slot: DisplaySlot,
    pub objective: String,
}

impl ObjectiveDisplay {
    pub fn new(slot: DisplaySlot, objective: impl Into<String>) -> Self {
        Self {
            slot,
            objective: objective.into(),
        }
    }

    /// Tells `viewers` to show the objective in the slot.
    ///
    /// Unsupported slots are skipped before anything is resolved.
    pub fn show(&self, dispatcher: &Dispatcher, viewers: &[ObjectRef]) -> Option<DispatchReport> {
        let built = DisplayObjectiveBuilder::new(&self.slot, self.objective.as_str())
            .and_then(|b| b.build(dispatcher.resolver()));
        deliver("objective", dispatcher, [built], viewers)
    }
}
