//! SetDisplayObjective (0x6B), Server → Client.
//!
//! Assigns a scoreboard objective to a display slot.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetDisplayObjective {
    /// Display slot: "sidebar", "list", or "belowname".
    pub display_slot: String,
    /// Objective name (internal identifier).
    pub objective_name: String,
    /// Display name shown to players.
    pub display_name: String,
    /// Criteria type (typically "dummy").
    pub criteria: String,
    /// Sort order: 0=ascending, 1=descending.
    pub sort_order: i32,
}

impl SetDisplayObjective {
    /// Create a sidebar display objective.
    pub fn sidebar(objective_name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            display_slot: "sidebar".into(),
            objective_name: objective_name.into(),
            display_name: display_name.into(),
            criteria: "dummy".into(),
            sort_order: 0,
        }
    }
}
