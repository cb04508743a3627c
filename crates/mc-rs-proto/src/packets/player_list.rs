//! PlayerList (0x3F), Server → Client.
//!
//! Manages the player tab list: add or remove entries.

use serde::{Deserialize, Serialize};

use crate::types::Uuid;

/// A single "Add" entry for the player list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerListEntry {
    pub uuid: Uuid,
    pub entity_unique_id: i64,
    pub username: String,
    pub xuid: String,
}

/// PlayerList packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerList {
    Add(Vec<PlayerListEntry>),
    Remove(Vec<Uuid>),
}
