use mc_rs_proto::types::{ChunkPos, Vec3};

use crate::chunk::ChunkColumn;
use crate::entity::Entity;

/// Receives the world state a chunk loader makes visible.
///
/// Callbacks run on whatever task drives the world change, never while the
/// world holds its internal lock.
pub trait Viewer: Send + Sync {
    fn view_chunk(&self, pos: ChunkPos, column: &ChunkColumn);
    fn view_entity(&self, entity: &dyn Entity);
    fn hide_entity(&self, entity: &dyn Entity);
    fn view_entity_movement(&self, entity: &dyn Entity, position: Vec3, yaw: f32, pitch: f32);
}
