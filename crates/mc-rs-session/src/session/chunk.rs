//! Chunk streaming and radius management.

use std::sync::atomic::Ordering;
use std::sync::{Arc, Weak};
use std::time::Duration;

use mc_rs_proto::packets::{
    ChunkRadiusUpdated, LevelChunk, NetworkChunkPublisherUpdate, Packet, RequestChunkRadius,
};
use mc_rs_proto::types::{BlockPos, ChunkPos, Vec3};
use mc_rs_world::chunk::ChunkColumn;
use mc_rs_world::serializer::serialize_column;
use mc_rs_world::{Entity, Loader, Viewer, WorldError};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use super::{Session, SessionError};

/// Chunks requested from the loader per streaming tick.
pub const CHUNKS_PER_TICK: usize = 4;

/// Streaming cadence (20 Hz).
pub const STREAM_INTERVAL: Duration = Duration::from_millis(50);

impl Session {
    pub fn chunk_radius(&self) -> i32 {
        self.chunk_radius.load(Ordering::Acquire)
    }

    pub fn max_chunk_radius(&self) -> i32 {
        self.max_chunk_radius
    }

    /// The loader currently streaming chunks to this session.
    pub fn loader(&self) -> Option<Arc<Loader>> {
        self.binding.as_ref().map(|b| b.loader.load_full())
    }

    /// Ask the loader for a few chunks every tick until told to stop.
    ///
    /// A failed load is logged and the tick skipped; the session stays open.
    pub(super) async fn send_chunks(self: Arc<Self>, mut stop: oneshot::Receiver<()>) {
        let Some(b) = &self.binding else {
            return;
        };
        let mut ticker = tokio::time::interval(STREAM_INTERVAL);
        loop {
            tokio::select! {
                biased;
                _ = &mut stop => return,
                _ = ticker.tick() => {
                    let loader = b.loader.load_full();
                    match loader.load(CHUNKS_PER_TICK) {
                        Ok(()) => {}
                        // The loader was swapped out mid-tick
                        Err(WorldError::LoaderClosed) => {
                            debug!("{}: skipped tick on a replaced loader", b.controllable.name());
                        }
                        Err(e) => {
                            warn!("{}: chunk loading failed: {e}", b.controllable.name());
                        }
                    }
                }
            }
        }
    }

    pub(super) fn send_chunk(&self, pos: ChunkPos, column: &ChunkColumn) {
        if self.is_nop() {
            return;
        }
        let (sub_chunk_count, payload) = {
            let mut buf = self.chunk_buf.lock();
            let count = serialize_column(column, &mut buf);
            (count, buf.to_vec())
        };
        self.write_packet(Packet::LevelChunk(LevelChunk {
            position: pos,
            dimension_id: 0,
            sub_chunk_count,
            payload,
        }));
    }

    /// Tell the client where to expect chunks around `position`.
    pub(super) fn send_publisher_update(&self, position: Vec3) {
        let radius = self.chunk_radius().max(0) as u32;
        self.write_packet(Packet::NetworkChunkPublisherUpdate(
            NetworkChunkPublisherUpdate {
                position: BlockPos::from_vec3(&position),
                radius: radius << 4,
            },
        ));
    }

    /// Apply a client's chunk radius request.
    ///
    /// Values above the maximum are clamped. Non-positive values are refused
    /// by answering with the current radius.
    pub(super) fn handle_request_chunk_radius(
        &self,
        pk: RequestChunkRadius,
    ) -> Result<(), SessionError> {
        let Some(b) = &self.binding else {
            return Ok(());
        };
        if pk.chunk_radius <= 0 {
            debug!(
                "{}: refused chunk radius {}",
                b.controllable.name(),
                pk.chunk_radius
            );
            self.write_packet(Packet::ChunkRadiusUpdated(ChunkRadiusUpdated {
                chunk_radius: self.chunk_radius(),
            }));
            return Ok(());
        }

        let radius = pk.chunk_radius.min(self.max_chunk_radius);
        self.chunk_radius.store(radius, Ordering::Release);

        let viewer: Weak<dyn Viewer> = b.me.clone();
        let loader = Loader::new(radius, Arc::clone(&b.world), viewer);
        let position = b.controllable.position();
        loader.move_to(position);
        b.loader.swap(Arc::new(loader)).close();
        // Teardown may have closed the previous loader before the swap
        if self.closed.load(Ordering::SeqCst) {
            b.loader.load().close();
            return Ok(());
        }

        debug!(
            "{}: chunk radius {} (requested {})",
            b.controllable.name(),
            radius,
            pk.chunk_radius
        );
        self.write_packet(Packet::ChunkRadiusUpdated(ChunkRadiusUpdated {
            chunk_radius: radius,
        }));
        self.send_publisher_update(position);
        Ok(())
    }
}
