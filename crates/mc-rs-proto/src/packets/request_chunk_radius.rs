//! RequestChunkRadius (0x45), Client → Server.

use serde::{Deserialize, Serialize};

/// The client requests a specific chunk render distance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestChunkRadius {
    pub chunk_radius: i32,
}
