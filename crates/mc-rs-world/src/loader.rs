//! Radius-bounded chunk loading on behalf of a single viewer.

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Weak};

use mc_rs_proto::types::{ChunkPos, Vec3};
use parking_lot::Mutex;
use tracing::trace;

use crate::error::WorldError;
use crate::viewer::Viewer;
use crate::world::{LoaderId, World};

struct LoaderState {
    pos: ChunkPos,
    radius: i32,
    loaded: HashSet<ChunkPos>,
    queue: VecDeque<ChunkPos>,
    closed: bool,
}

/// Streams the chunks around a position to a viewer, nearest first.
///
/// Loaded chunks register the viewer in the world so it also receives the
/// entities in them. Chunks that fall out of range are unregistered and their
/// entities hidden.
pub struct Loader {
    id: LoaderId,
    world: Arc<World>,
    viewer: Weak<dyn Viewer>,
    state: Mutex<LoaderState>,
}

impl Loader {
    /// Create a loader centred on chunk (0, 0). Nothing is sent until `load`.
    pub fn new(radius: i32, world: Arc<World>, viewer: Weak<dyn Viewer>) -> Self {
        let mut state = LoaderState {
            pos: ChunkPos::new(0, 0),
            radius: radius.max(0),
            loaded: HashSet::new(),
            queue: VecDeque::new(),
            closed: false,
        };
        rebuild_queue(&mut state);
        Self {
            id: world.allocate_loader_id(),
            world,
            viewer,
            state: Mutex::new(state),
        }
    }

    /// Load up to `n` pending chunks and send them to the viewer.
    pub fn load(&self, n: usize) -> Result<(), WorldError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(WorldError::LoaderClosed);
        }
        for _ in 0..n {
            let Some(pos) = state.queue.pop_front() else {
                break;
            };
            let column = match self.world.chunk(pos) {
                Ok(column) => column,
                Err(e) => {
                    state.queue.push_front(pos);
                    return Err(e);
                }
            };
            let entities = self.world.add_viewer(pos, self.id, self.viewer.clone());
            state.loaded.insert(pos);
            if let Some(viewer) = self.viewer.upgrade() {
                viewer.view_chunk(pos, &column);
                for entity in &entities {
                    viewer.view_entity(entity.as_ref());
                }
            }
            trace!("Loader {} sent chunk {pos}", self.id);
        }
        Ok(())
    }

    /// Re-centre on the chunk containing `position`.
    pub fn move_to(&self, position: Vec3) {
        let chunk = position.chunk_pos();
        let mut state = self.state.lock();
        if state.closed || state.pos == chunk {
            return;
        }
        state.pos = chunk;
        self.evict_out_of_range(&mut state);
        rebuild_queue(&mut state);
    }

    /// Unload everything and stop loading. Idempotent.
    pub fn close(&self) {
        let mut state = self.state.lock();
        if state.closed {
            return;
        }
        state.closed = true;
        state.queue.clear();
        let loaded: Vec<ChunkPos> = state.loaded.drain().collect();
        for pos in loaded {
            self.unload(pos);
        }
    }

    pub fn radius(&self) -> i32 {
        self.state.lock().radius
    }

    pub fn position(&self) -> ChunkPos {
        self.state.lock().pos
    }

    pub fn loaded_count(&self) -> usize {
        self.state.lock().loaded.len()
    }

    pub fn pending_count(&self) -> usize {
        self.state.lock().queue.len()
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    fn evict_out_of_range(&self, state: &mut LoaderState) {
        let r2 = i64::from(state.radius) * i64::from(state.radius);
        let center = state.pos;
        let out: Vec<ChunkPos> = state
            .loaded
            .iter()
            .filter(|p| p.distance_sq(&center) > r2)
            .copied()
            .collect();
        for pos in out {
            state.loaded.remove(&pos);
            self.unload(pos);
        }
    }

    fn unload(&self, pos: ChunkPos) {
        let entities = self.world.remove_viewer(pos, self.id);
        if let Some(viewer) = self.viewer.upgrade() {
            for entity in &entities {
                viewer.hide_entity(entity.as_ref());
            }
        }
    }
}

impl Drop for Loader {
    fn drop(&mut self) {
        self.close();
    }
}

/// Queue every unloaded chunk within the radius, nearest first.
fn rebuild_queue(state: &mut LoaderState) {
    let r = state.radius;
    let r2 = i64::from(r) * i64::from(r);
    let center = state.pos;
    let mut pending: Vec<ChunkPos> = Vec::new();
    for dx in -r..=r {
        for dz in -r..=r {
            let pos = ChunkPos::new(center.x + dx, center.z + dz);
            if pos.distance_sq(&center) <= r2 && !state.loaded.contains(&pos) {
                pending.push(pos);
            }
        }
    }
    pending.sort_by_key(|p| (p.distance_sq(&center), p.x, p.z));
    state.queue = pending.into();
}
