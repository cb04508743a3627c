//! Chunk and sub-chunk data structures.

use mc_rs_proto::types::ChunkPos;

/// Sub-chunks per column: Y range [-64, 319] = 384 blocks / 16 = 24.
pub const SUB_CHUNK_COUNT: usize = 24;

/// Minimum Y coordinate of a column.
pub const MIN_Y: i32 = -64;

/// Blocks in one 16x16x16 sub-chunk.
pub const SUB_CHUNK_VOLUME: usize = 4096;

/// A 16x16x16 sub-chunk with a single block storage layer.
///
/// A sub-chunk made of one block keeps no index array at all; the array is
/// allocated on the first write of a second block.
#[derive(Debug, Clone)]
pub struct SubChunk {
    /// Palette of block runtime IDs. Never empty.
    pub palette: Vec<u32>,
    /// Palette indices in XZY order: `(x*16 + z)*16 + y`.
    blocks: Option<Box<[u16; SUB_CHUNK_VOLUME]>>,
}

impl SubChunk {
    /// Create a sub-chunk filled entirely with a single block.
    pub fn uniform(runtime_id: u32) -> Self {
        Self {
            palette: vec![runtime_id],
            blocks: None,
        }
    }

    /// Whether the whole sub-chunk is one block.
    pub fn is_uniform(&self) -> bool {
        self.blocks.is_none()
    }

    /// Palette index at a raw XZY block index.
    pub fn palette_index(&self, index: usize) -> u16 {
        self.blocks.as_ref().map_or(0, |b| b[index])
    }

    /// Set a block at local coordinates. `x`, `y`, `z` must each be in `[0, 15]`.
    pub fn set_block(&mut self, x: usize, y: usize, z: usize, runtime_id: u32) {
        debug_assert!(x < 16 && y < 16 && z < 16);
        let palette_index = match self.palette.iter().position(|&id| id == runtime_id) {
            Some(idx) => idx,
            None => {
                self.palette.push(runtime_id);
                self.palette.len() - 1
            }
        };
        if palette_index == 0 && self.blocks.is_none() {
            return;
        }
        let blocks = self
            .blocks
            .get_or_insert_with(|| Box::new([0; SUB_CHUNK_VOLUME]));
        blocks[(x * 16 + z) * 16 + y] = palette_index as u16;
    }

    /// Runtime ID of the block at local coordinates.
    pub fn block(&self, x: usize, y: usize, z: usize) -> u32 {
        let palette_index = self.palette_index((x * 16 + z) * 16 + y);
        self.palette[palette_index as usize]
    }
}

/// A full chunk column.
#[derive(Debug, Clone)]
pub struct ChunkColumn {
    pub pos: ChunkPos,
    pub sub_chunks: Vec<SubChunk>,
    /// Biome ID shared by the whole column.
    pub biome: u8,
}

impl ChunkColumn {
    /// A column where every sub-chunk is the given block.
    pub fn filled(pos: ChunkPos, runtime_id: u32) -> Self {
        Self {
            pos,
            sub_chunks: vec![SubChunk::uniform(runtime_id); SUB_CHUNK_COUNT],
            biome: 1,
        }
    }

    /// Runtime ID of the block at local X/Z and absolute Y.
    pub fn block(&self, x: usize, y: i32, z: usize) -> Option<u32> {
        let offset = y - MIN_Y;
        if offset < 0 {
            return None;
        }
        let sub = self.sub_chunks.get(offset as usize / 16)?;
        Some(sub.block(x, offset as usize % 16, z))
    }
}
