//! NetworkChunkPublisherUpdate (0x7A), Server → Client.
//!
//! Tells the client around which block and within which block radius it
//! should expect chunks.

use serde::{Deserialize, Serialize};

use crate::types::BlockPos;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkChunkPublisherUpdate {
    pub position: BlockPos,
    pub radius: u32,
}
