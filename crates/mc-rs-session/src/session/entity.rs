//! Session-local entity handles and the entity half of the world viewer.

use std::collections::HashMap;

use mc_rs_proto::packets::{AddActor, AddPlayer, MoveActorAbsolute, Packet, RemoveEntity};
use mc_rs_proto::types::{ChunkPos, Vec3};
use mc_rs_world::chunk::ChunkColumn;
use mc_rs_world::{Entity, EntityId, SpawnInfo, Viewer};
use parking_lot::RwLock;

use super::Session;

/// Handle the session's own controllable is always known by.
pub const SELF_HANDLE: u64 = 1;

struct HandleMap {
    next: u64,
    handles: HashMap<EntityId, u64>,
}

/// Maps world entities to the small numeric handles a client addresses them by.
///
/// Handles are allocated in increasing order starting after [`SELF_HANDLE`]
/// and never reused, even when an entity is forgotten and seen again.
pub struct EntityHandles {
    self_id: EntityId,
    inner: RwLock<HandleMap>,
}

impl EntityHandles {
    pub fn new(self_id: EntityId) -> Self {
        let mut handles = HashMap::new();
        handles.insert(self_id, SELF_HANDLE);
        Self {
            self_id,
            inner: RwLock::new(HandleMap {
                next: SELF_HANDLE + 1,
                handles,
            }),
        }
    }

    /// The entity's handle, allocating one on first use. The session's own
    /// entity is always [`SELF_HANDLE`].
    pub fn handle_for(&self, id: EntityId) -> u64 {
        if id == self.self_id {
            return SELF_HANDLE;
        }
        if let Some(&handle) = self.inner.read().handles.get(&id) {
            return handle;
        }
        let mut inner = self.inner.write();
        if let Some(&handle) = inner.handles.get(&id) {
            return handle;
        }
        let handle = inner.next;
        inner.next += 1;
        inner.handles.insert(id, handle);
        handle
    }

    pub fn get(&self, id: EntityId) -> Option<u64> {
        if id == self.self_id {
            return Some(SELF_HANDLE);
        }
        self.inner.read().handles.get(&id).copied()
    }

    /// Drop an entity's mapping. The session's own entry is kept.
    pub fn forget(&self, id: EntityId) {
        if id == self.self_id {
            return;
        }
        self.inner.write().handles.remove(&id);
    }

    /// Clear every mapping. The counter keeps counting.
    pub fn reset(&self) {
        self.inner.write().handles.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.read().handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Session {
    /// The handle this session uses for a world entity.
    pub fn entity_handle(&self, id: EntityId) -> u64 {
        self.handles.handle_for(id)
    }

    fn is_self(&self, entity: &dyn Entity) -> bool {
        self.binding
            .as_ref()
            .is_some_and(|b| b.controllable.id() == entity.id())
    }
}

impl Viewer for Session {
    fn view_chunk(&self, pos: ChunkPos, column: &ChunkColumn) {
        self.send_chunk(pos, column);
    }

    fn view_entity(&self, entity: &dyn Entity) {
        if self.is_nop() || self.is_self(entity) {
            return;
        }
        let handle = self.handles.handle_for(entity.id());
        let position = entity.position();
        let (yaw, pitch) = entity.rotation();
        let packet = match entity.spawn_info() {
            SpawnInfo::Player { username, uuid } => Packet::AddPlayer(AddPlayer {
                uuid,
                username,
                entity_runtime_id: handle,
                entity_unique_id: handle as i64,
                position,
                pitch,
                yaw,
                head_yaw: yaw,
            }),
            SpawnInfo::Actor { entity_type } => Packet::AddActor(AddActor {
                entity_unique_id: handle as i64,
                entity_runtime_id: handle,
                entity_type,
                position,
                pitch,
                yaw,
                head_yaw: yaw,
            }),
        };
        self.write_packet(packet);
    }

    fn hide_entity(&self, entity: &dyn Entity) {
        if self.is_self(entity) {
            return;
        }
        if let Some(handle) = self.handles.get(entity.id()) {
            self.write_packet(Packet::RemoveEntity(RemoveEntity {
                entity_unique_id: handle as i64,
            }));
            self.handles.forget(entity.id());
        }
    }

    fn view_entity_movement(&self, entity: &dyn Entity, position: Vec3, yaw: f32, pitch: f32) {
        if self.is_nop() || self.is_self(entity) {
            return;
        }
        let handle = self.handles.handle_for(entity.id());
        self.write_packet(Packet::MoveActorAbsolute(MoveActorAbsolute {
            entity_runtime_id: handle,
            position,
            pitch,
            yaw,
            head_yaw: yaw,
        }));
    }
}
