//! Chunk generation.

use mc_rs_proto::types::ChunkPos;

use crate::block::runtime_id;
use crate::chunk::{ChunkColumn, MIN_Y};

/// Produces chunk columns on demand.
pub trait Generator: Send + Sync {
    fn generate(&self, pos: ChunkPos) -> ChunkColumn;
}

/// Flat world generator: a stack of layers starting at Y = 0, air elsewhere.
///
/// Default layout:
/// - Y = 0: Bedrock
/// - Y = 1-2: Dirt
/// - Y = 3: Grass Block
#[derive(Debug, Clone)]
pub struct FlatGenerator {
    /// Layer runtime IDs, bottom-up from Y = 0.
    pub layers: Vec<u32>,
    pub air: u32,
}

impl Default for FlatGenerator {
    fn default() -> Self {
        let dirt = runtime_id("minecraft:dirt");
        Self {
            layers: vec![
                runtime_id("minecraft:bedrock"),
                dirt,
                dirt,
                runtime_id("minecraft:grass_block"),
            ],
            air: runtime_id("minecraft:air"),
        }
    }
}

impl FlatGenerator {
    /// Y of the first air block above the layers.
    pub fn surface_y(&self) -> i32 {
        self.layers.len() as i32
    }
}

impl Generator for FlatGenerator {
    fn generate(&self, pos: ChunkPos) -> ChunkColumn {
        let mut column = ChunkColumn::filled(pos, self.air);
        for (y, &layer) in self.layers.iter().enumerate() {
            let offset = y as i32 - MIN_Y;
            let sub = &mut column.sub_chunks[offset as usize / 16];
            let local_y = offset as usize % 16;
            for x in 0..16 {
                for z in 0..16 {
                    sub.set_block(x, local_y, z, layer);
                }
            }
        }
        column
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_chunk_layer_layout() {
        let gen = FlatGenerator::default();
        let col = gen.generate(ChunkPos::new(0, 0));

        assert_eq!(col.block(0, 0, 0), Some(runtime_id("minecraft:bedrock")));
        assert_eq!(col.block(0, 1, 0), Some(runtime_id("minecraft:dirt")));
        assert_eq!(col.block(0, 2, 0), Some(runtime_id("minecraft:dirt")));
        assert_eq!(col.block(0, 3, 0), Some(runtime_id("minecraft:grass_block")));
        assert_eq!(col.block(0, 4, 0), Some(gen.air));
        assert_eq!(col.block(0, -1, 0), Some(gen.air));
    }

    #[test]
    fn only_layer_subchunk_is_mixed() {
        let gen = FlatGenerator::default();
        let col = gen.generate(ChunkPos::new(5, -3));
        for (i, sub) in col.sub_chunks.iter().enumerate() {
            // Sub-chunk 4 covers Y = 0..15
            assert_eq!(sub.is_uniform(), i != 4, "sub-chunk {i}");
        }
        // air, bedrock, dirt, grass
        assert_eq!(col.sub_chunks[4].palette.len(), 4);
    }

    #[test]
    fn uniform_across_xz() {
        let gen = FlatGenerator::default();
        let col = gen.generate(ChunkPos::new(-2, 7));
        for x in 0..16 {
            for z in 0..16 {
                assert_eq!(col.block(x, 0, z), Some(gen.layers[0]));
                assert_eq!(col.block(x, 3, z), Some(gen.layers[3]));
            }
        }
        assert_eq!(gen.surface_y(), 4);
    }
}
