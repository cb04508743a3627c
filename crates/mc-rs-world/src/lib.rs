//! World collaborator for the session layer: entity registry, chunk cache,
//! flat generation, network chunk serialization, and per-viewer chunk loading.

pub mod block;
pub mod chunk;
pub mod entity;
pub mod error;
pub mod generator;
pub mod loader;
pub mod serializer;
pub mod viewer;
pub mod world;

pub use entity::{Entity, EntityId, SpawnInfo};
pub use error::WorldError;
pub use loader::Loader;
pub use viewer::Viewer;
pub use world::World;
