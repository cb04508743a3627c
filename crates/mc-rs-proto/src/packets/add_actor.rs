//! AddActor (0x0D), Server → Client.
//!
//! Spawns a non-player entity (mob, item, projectile, etc.) visible to the client.

use serde::{Deserialize, Serialize};

use crate::types::Vec3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddActor {
    pub entity_unique_id: i64,
    pub entity_runtime_id: u64,
    /// Entity identifier, e.g. `minecraft:zombie`.
    pub entity_type: String,
    pub position: Vec3,
    pub pitch: f32,
    pub yaw: f32,
    pub head_yaw: f32,
}
