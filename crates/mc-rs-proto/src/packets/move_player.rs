//! MovePlayer (0x13), Bidirectional.
//!
//! Sent by the client when it moves; sent by the server to correct or
//! teleport the player.

use serde::{Deserialize, Serialize};

use crate::types::Vec3;

/// Movement mode for MovePlayer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveMode {
    /// Regular position update.
    Normal,
    /// Force position correction (server-authoritative reset).
    Reset,
    /// Teleport.
    Teleport,
    /// Rotation-only update.
    Rotation,
}

/// MovePlayer packet. `position` is the eye position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovePlayer {
    pub runtime_entity_id: u64,
    pub position: Vec3,
    pub pitch: f32,
    pub yaw: f32,
    pub head_yaw: f32,
    pub mode: MoveMode,
    pub on_ground: bool,
    pub tick: u64,
}

impl MovePlayer {
    /// Create a Normal movement update.
    pub fn normal(runtime_entity_id: u64, position: Vec3, pitch: f32, yaw: f32) -> Self {
        Self {
            runtime_entity_id,
            position,
            pitch,
            yaw,
            head_yaw: yaw,
            mode: MoveMode::Normal,
            on_ground: false,
            tick: 0,
        }
    }

    /// Create a Reset (correction) packet.
    pub fn reset(runtime_entity_id: u64, position: Vec3, pitch: f32, yaw: f32) -> Self {
        Self {
            mode: MoveMode::Reset,
            ..Self::normal(runtime_entity_id, position, pitch, yaw)
        }
    }
}
