//! Entities as seen by the world.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use mc_rs_proto::types::{Uuid, Vec3};

/// World-unique entity identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Thread-safe allocator for world-unique entity IDs. Starts at 1.
#[derive(Debug)]
pub struct EntityIdAllocator {
    next: AtomicU64,
}

impl EntityIdAllocator {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    pub fn allocate(&self) -> EntityId {
        EntityId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for EntityIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// What a viewer needs to spawn an entity on its side.
#[derive(Debug, Clone, PartialEq)]
pub enum SpawnInfo {
    Player { username: String, uuid: Uuid },
    Actor { entity_type: String },
}

/// Anything that lives in the world and can be shown to viewers.
pub trait Entity: Send + Sync {
    fn id(&self) -> EntityId;
    fn position(&self) -> Vec3;
    /// `(yaw, pitch)` in degrees.
    fn rotation(&self) -> (f32, f32);
    fn spawn_info(&self) -> SpawnInfo;
}
