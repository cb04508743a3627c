//! RemoveEntity (0x0E), Server → Client.
//!
//! Despawns an entity from the client's world.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveEntity {
    pub entity_unique_id: i64,
}
