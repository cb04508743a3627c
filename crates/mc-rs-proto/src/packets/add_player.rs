//! AddPlayer (0x0C), Server → Client.
//!
//! Spawns a remote player entity visible to the receiving client.

use serde::{Deserialize, Serialize};

use crate::types::{Uuid, Vec3};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddPlayer {
    pub uuid: Uuid,
    pub username: String,
    pub entity_runtime_id: u64,
    pub entity_unique_id: i64,
    pub position: Vec3,
    pub pitch: f32,
    pub yaw: f32,
    pub head_yaw: f32,
}
