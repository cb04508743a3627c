//! The world: entity registry, chunk cache and per-chunk viewer sets.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use mc_rs_proto::types::ChunkPos;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::chunk::ChunkColumn;
use crate::entity::{Entity, EntityId, EntityIdAllocator};
use crate::error::WorldError;
use crate::generator::Generator;
use crate::viewer::Viewer;

/// Identifies one chunk loader's registrations.
pub(crate) type LoaderId = u64;

struct Registered {
    entity: Arc<dyn Entity>,
    chunk: ChunkPos,
}

#[derive(Default)]
struct WorldState {
    columns: HashMap<ChunkPos, Arc<ChunkColumn>>,
    entities: HashMap<EntityId, Registered>,
    chunk_entities: HashMap<ChunkPos, Vec<EntityId>>,
    viewers: HashMap<ChunkPos, Vec<(LoaderId, Weak<dyn Viewer>)>>,
}

impl WorldState {
    fn viewers_of(&self, pos: &ChunkPos) -> Vec<(LoaderId, Arc<dyn Viewer>)> {
        self.viewers
            .get(pos)
            .map(|list| {
                list.iter()
                    .filter_map(|(id, weak)| weak.upgrade().map(|v| (*id, v)))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn entities_in(&self, pos: &ChunkPos) -> Vec<Arc<dyn Entity>> {
        self.chunk_entities
            .get(pos)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.entities.get(id).map(|r| Arc::clone(&r.entity)))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn unlink(&mut self, id: EntityId, chunk: &ChunkPos) {
        if let Some(ids) = self.chunk_entities.get_mut(chunk) {
            ids.retain(|e| *e != id);
            if ids.is_empty() {
                self.chunk_entities.remove(chunk);
            }
        }
    }
}

/// A single dimension shared by every session.
///
/// Viewer callbacks are always collected under the state lock and invoked
/// after it is released.
pub struct World {
    name: String,
    generator: Box<dyn Generator>,
    ids: EntityIdAllocator,
    next_loader: AtomicU64,
    closed: AtomicBool,
    state: RwLock<WorldState>,
}

impl World {
    pub fn new(name: impl Into<String>, generator: Box<dyn Generator>) -> Self {
        Self {
            name: name.into(),
            generator,
            ids: EntityIdAllocator::new(),
            next_loader: AtomicU64::new(1),
            closed: AtomicBool::new(false),
            state: RwLock::new(WorldState::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Allocate a fresh world-unique entity ID.
    pub fn allocate_entity_id(&self) -> EntityId {
        self.ids.allocate()
    }

    pub(crate) fn allocate_loader_id(&self) -> LoaderId {
        self.next_loader.fetch_add(1, Ordering::Relaxed)
    }

    /// Add an entity and show it to everyone viewing its chunk.
    pub fn add_entity(&self, entity: Arc<dyn Entity>) {
        let id = entity.id();
        let chunk = entity.position().chunk_pos();
        let viewers = {
            let mut state = self.state.write();
            if let Some(old) = state.entities.remove(&id) {
                state.unlink(id, &old.chunk);
            }
            state.entities.insert(
                id,
                Registered {
                    entity: Arc::clone(&entity),
                    chunk,
                },
            );
            state.chunk_entities.entry(chunk).or_default().push(id);
            state.viewers_of(&chunk)
        };
        debug!("Entity {id} added to world '{}' at chunk {chunk}", self.name);
        for (_, viewer) in viewers {
            viewer.view_entity(entity.as_ref());
        }
    }

    /// Remove an entity, hiding it from everyone viewing its chunk.
    pub fn remove_entity(&self, id: EntityId) -> Option<Arc<dyn Entity>> {
        let (entity, viewers) = {
            let mut state = self.state.write();
            let registered = state.entities.remove(&id)?;
            state.unlink(id, &registered.chunk);
            let viewers = state.viewers_of(&registered.chunk);
            (registered.entity, viewers)
        };
        debug!("Entity {id} removed from world '{}'", self.name);
        for (_, viewer) in viewers {
            viewer.hide_entity(entity.as_ref());
        }
        Some(entity)
    }

    /// Propagate an entity's new position and rotation to viewers.
    ///
    /// Crossing a chunk boundary hides the entity from viewers that only see
    /// the old chunk and spawns it for viewers that only see the new one.
    pub fn entity_moved(&self, id: EntityId) {
        let (entity, hide, show, moved) = {
            let mut state = self.state.write();
            let Some(registered) = state.entities.get(&id) else {
                return;
            };
            let entity = Arc::clone(&registered.entity);
            let old_chunk = registered.chunk;
            let new_chunk = entity.position().chunk_pos();

            if old_chunk == new_chunk {
                let moved = state.viewers_of(&new_chunk);
                (entity, Vec::new(), Vec::new(), moved)
            } else {
                state.unlink(id, &old_chunk);
                state.chunk_entities.entry(new_chunk).or_default().push(id);
                if let Some(r) = state.entities.get_mut(&id) {
                    r.chunk = new_chunk;
                }
                let before = state.viewers_of(&old_chunk);
                let after = state.viewers_of(&new_chunk);
                let mut hide = Vec::new();
                let mut moved = Vec::new();
                for (loader, viewer) in before {
                    if after.iter().any(|(l, _)| *l == loader) {
                        moved.push((loader, viewer));
                    } else {
                        hide.push((loader, viewer));
                    }
                }
                let show: Vec<_> = after
                    .into_iter()
                    .filter(|(l, _)| !moved.iter().any(|(m, _)| m == l))
                    .collect();
                (entity, hide, show, moved)
            }
        };

        let position = entity.position();
        let (yaw, pitch) = entity.rotation();
        for (_, viewer) in hide {
            viewer.hide_entity(entity.as_ref());
        }
        for (_, viewer) in show {
            viewer.view_entity(entity.as_ref());
        }
        for (_, viewer) in moved {
            viewer.view_entity_movement(entity.as_ref(), position, yaw, pitch);
        }
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.state.read().entities.contains_key(&id)
    }

    pub fn entity_count(&self) -> usize {
        self.state.read().entities.len()
    }

    /// Get a chunk column, generating it on first access.
    pub fn chunk(&self, pos: ChunkPos) -> Result<Arc<ChunkColumn>, WorldError> {
        if self.is_closed() {
            return Err(WorldError::Closed);
        }
        if let Some(column) = self.state.read().columns.get(&pos) {
            return Ok(Arc::clone(column));
        }
        let generated = Arc::new(self.generator.generate(pos));
        let mut state = self.state.write();
        Ok(Arc::clone(state.columns.entry(pos).or_insert(generated)))
    }

    /// Register a viewer for a chunk. Returns the entities currently in it.
    pub(crate) fn add_viewer(
        &self,
        pos: ChunkPos,
        loader: LoaderId,
        viewer: Weak<dyn Viewer>,
    ) -> Vec<Arc<dyn Entity>> {
        let mut state = self.state.write();
        let list = state.viewers.entry(pos).or_default();
        if !list.iter().any(|(l, _)| *l == loader) {
            list.push((loader, viewer));
        }
        state.entities_in(&pos)
    }

    /// Drop a viewer's registration for a chunk. Returns the entities in it.
    pub(crate) fn remove_viewer(&self, pos: ChunkPos, loader: LoaderId) -> Vec<Arc<dyn Entity>> {
        let mut state = self.state.write();
        if let Some(list) = state.viewers.get_mut(&pos) {
            list.retain(|(l, _)| *l != loader);
            if list.is_empty() {
                state.viewers.remove(&pos);
            }
        }
        state.entities_in(&pos)
    }

    /// Shut the world down. Chunk access fails from now on.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.state.write().columns.clear();
        info!("World '{}' closed", self.name);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::entity::SpawnInfo;
    use crate::generator::FlatGenerator;
    use mc_rs_proto::types::Vec3;
    use parking_lot::Mutex;

    pub(crate) struct TestEntity {
        pub id: EntityId,
        pub pos: Mutex<Vec3>,
    }

    impl TestEntity {
        pub fn new(id: EntityId, pos: Vec3) -> Arc<Self> {
            Arc::new(Self {
                id,
                pos: Mutex::new(pos),
            })
        }
    }

    impl Entity for TestEntity {
        fn id(&self) -> EntityId {
            self.id
        }
        fn position(&self) -> Vec3 {
            *self.pos.lock()
        }
        fn rotation(&self) -> (f32, f32) {
            (0.0, 0.0)
        }
        fn spawn_info(&self) -> SpawnInfo {
            SpawnInfo::Actor {
                entity_type: "minecraft:pig".into(),
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum Event {
        Chunk(ChunkPos),
        View(EntityId),
        Hide(EntityId),
        Move(EntityId),
    }

    #[derive(Default)]
    pub(crate) struct Recorder {
        pub events: Mutex<Vec<Event>>,
    }

    impl Recorder {
        pub fn take(&self) -> Vec<Event> {
            std::mem::take(&mut *self.events.lock())
        }
    }

    impl Viewer for Recorder {
        fn view_chunk(&self, pos: ChunkPos, _column: &ChunkColumn) {
            self.events.lock().push(Event::Chunk(pos));
        }
        fn view_entity(&self, entity: &dyn Entity) {
            self.events.lock().push(Event::View(entity.id()));
        }
        fn hide_entity(&self, entity: &dyn Entity) {
            self.events.lock().push(Event::Hide(entity.id()));
        }
        fn view_entity_movement(&self, entity: &dyn Entity, _: Vec3, _: f32, _: f32) {
            self.events.lock().push(Event::Move(entity.id()));
        }
    }

    pub(crate) fn flat_world() -> Arc<World> {
        Arc::new(World::new("test", Box::new(FlatGenerator::default())))
    }

    fn watch(world: &World, recorder: &Arc<Recorder>, pos: ChunkPos) -> LoaderId {
        let id = world.allocate_loader_id();
        let weak: Weak<dyn Viewer> = Arc::downgrade(recorder) as Weak<dyn Viewer>;
        world.add_viewer(pos, id, weak);
        id
    }

    #[test]
    fn add_and_remove_notify_viewers() {
        let world = flat_world();
        let rec = Arc::new(Recorder::default());
        watch(&world, &rec, ChunkPos::new(0, 0));

        let e = TestEntity::new(world.allocate_entity_id(), Vec3::new(1.0, 4.0, 1.0));
        world.add_entity(e.clone());
        assert!(world.contains(e.id));
        assert_eq!(rec.take(), vec![Event::View(e.id)]);

        assert!(world.remove_entity(e.id).is_some());
        assert!(!world.contains(e.id));
        assert_eq!(rec.take(), vec![Event::Hide(e.id)]);
        assert!(world.remove_entity(e.id).is_none());
    }

    #[test]
    fn entity_outside_viewed_chunks_is_silent() {
        let world = flat_world();
        let rec = Arc::new(Recorder::default());
        watch(&world, &rec, ChunkPos::new(0, 0));

        let e = TestEntity::new(world.allocate_entity_id(), Vec3::new(100.0, 4.0, 100.0));
        world.add_entity(e.clone());
        assert!(rec.take().is_empty());
        assert_eq!(world.entity_count(), 1);
    }

    #[test]
    fn movement_within_and_across_chunks() {
        let world = flat_world();
        let a = Arc::new(Recorder::default());
        let b = Arc::new(Recorder::default());
        watch(&world, &a, ChunkPos::new(0, 0));
        watch(&world, &a, ChunkPos::new(1, 0));
        watch(&world, &b, ChunkPos::new(0, 0));

        let e = TestEntity::new(world.allocate_entity_id(), Vec3::new(1.0, 4.0, 1.0));
        world.add_entity(e.clone());
        a.take();
        b.take();

        *e.pos.lock() = Vec3::new(2.0, 4.0, 2.0);
        world.entity_moved(e.id);
        assert_eq!(a.take(), vec![Event::Move(e.id)]);
        assert_eq!(b.take(), vec![Event::Move(e.id)]);

        // Into chunk (1, 0): a still sees it, b loses it
        *e.pos.lock() = Vec3::new(17.0, 4.0, 2.0);
        world.entity_moved(e.id);
        assert_eq!(a.take(), vec![Event::Move(e.id)]);
        assert_eq!(b.take(), vec![Event::Hide(e.id)]);

        // Back into chunk (0, 0): b sees it spawn again
        *e.pos.lock() = Vec3::new(3.0, 4.0, 2.0);
        world.entity_moved(e.id);
        assert_eq!(a.take(), vec![Event::Move(e.id)]);
        assert_eq!(b.take(), vec![Event::View(e.id)]);
    }

    #[test]
    fn chunks_are_cached_until_close() {
        let world = flat_world();
        let first = world.chunk(ChunkPos::new(2, 3)).unwrap();
        let second = world.chunk(ChunkPos::new(2, 3)).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        world.close();
        assert!(world.is_closed());
        assert_eq!(world.chunk(ChunkPos::new(2, 3)).unwrap_err(), WorldError::Closed);
        // Closing twice is harmless
        world.close();
    }

    #[test]
    fn dropped_viewer_is_skipped() {
        let world = flat_world();
        let rec = Arc::new(Recorder::default());
        watch(&world, &rec, ChunkPos::new(0, 0));
        drop(rec);

        let e = TestEntity::new(world.allocate_entity_id(), Vec3::ZERO);
        world.add_entity(e);
        assert_eq!(world.entity_count(), 1);
    }
}
