//! Animate (0x2C), Bidirectional.
//!
//! Client sends when the player swings its arm.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animate {
    pub action_type: i32,
    pub entity_runtime_id: u64,
}
