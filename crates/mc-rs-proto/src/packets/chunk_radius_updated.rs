//! ChunkRadiusUpdated (0x46), Server → Client.

use serde::{Deserialize, Serialize};

/// Tells the client the accepted chunk render distance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRadiusUpdated {
    pub chunk_radius: i32,
}
