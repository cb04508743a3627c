//! MoveActorAbsolute (0x10), Server → Client.
//!
//! Updates the absolute position and rotation of another entity.

use serde::{Deserialize, Serialize};

use crate::types::Vec3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveActorAbsolute {
    pub entity_runtime_id: u64,
    pub position: Vec3,
    pub pitch: f32,
    pub yaw: f32,
    pub head_yaw: f32,
}
