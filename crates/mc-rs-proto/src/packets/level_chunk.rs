//! LevelChunk (0x3A), Server → Client.
//!
//! Carries one serialized chunk column.

use serde::{Deserialize, Serialize};

use crate::types::ChunkPos;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelChunk {
    pub position: ChunkPos,
    pub dimension_id: i32,
    pub sub_chunk_count: u32,
    /// Sub-chunks, biome data and border blocks in network format.
    pub payload: Vec<u8>,
}
