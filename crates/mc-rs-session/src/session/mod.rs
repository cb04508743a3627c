//! The session: one client connection bound to one controllable.
//!
//! A session is created, started once, and closed once. Starting registers the
//! controllable with the world and the presence directory and spawns the read
//! loop; the read loop in turn spawns chunk streaming. Whatever ends the read
//! loop (transport failure, protocol violation, [`Session::request_close`])
//! funnels into [`Session::close`], which unwinds everything in a fixed order.

mod chunk;
mod controllable;
mod entity;
mod error;
mod handler;
mod player_list;


use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, Weak};

use arc_swap::ArcSwap;
use bytes::BytesMut;
use mc_rs_command::CommandRegistry;
use mc_rs_proto::packets::set_score::IDENTITY_FAKE_PLAYER;
use mc_rs_proto::packets::{
    AvailableCommands, CommandData, CommandOrigin, CommandOutput, Disconnect, IdentityData,
    Packet, RemoveObjective, ScoreEntry, SetDisplayObjective, SetScore, Text,
};
use mc_rs_world::{Entity, EntityId, Loader, Viewer, World};
use parking_lot::{Mutex, RwLock};
use tokio::sync::oneshot;
use tracing::{debug, error, info, trace};

use crate::chat::Chat;
use crate::conn::Conn;

pub use self::controllable::Controllable;
pub use self::entity::{EntityHandles, SELF_HANDLE};
pub use self::error::{SessionError, StartError};
pub use self::player_list::{PresenceDirectory, PresenceMember};

/// Callback run once when a started session has fully closed.
pub type StopFn = Box<dyn FnOnce(Arc<dyn Controllable>) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Created,
    Started,
    Closing,
    Closed,
}

/// Shared services every session is wired to.
#[derive(Clone)]
pub struct Services {
    pub world: Arc<World>,
    pub presence: Arc<PresenceDirectory>,
    pub chat: Arc<Chat>,
    pub commands: Arc<CommandRegistry>,
}

/// Everything a real session has and the no-op session lacks.
struct Binding {
    me: Weak<Session>,
    conn: Conn,
    controllable: Arc<dyn Controllable>,
    world: Arc<World>,
    presence: Arc<PresenceDirectory>,
    chat: Arc<Chat>,
    commands: Arc<CommandRegistry>,
    loader: ArcSwap<Loader>,
}

pub struct Session {
    /// `None` for the no-op session.
    binding: Option<Binding>,
    handles: EntityHandles,
    chunk_radius: AtomicI32,
    max_chunk_radius: i32,
    /// Objective name of the scoreboard currently shown, empty if none.
    scoreboard: RwLock<String>,
    cmd_origin: Mutex<CommandOrigin>,
    on_stop: Mutex<Option<StopFn>>,
    state: Mutex<SessionState>,
    closed: AtomicBool,
    chunk_buf: Mutex<BytesMut>,
}

impl Session {
    /// Create a session for `controllable` speaking over `conn`.
    ///
    /// The chunk radius starts at half of `max_chunk_radius`. Nothing becomes
    /// visible to the world or other sessions until [`Session::start`].
    pub fn new(
        controllable: Arc<dyn Controllable>,
        conn: Conn,
        services: &Services,
        max_chunk_radius: i32,
    ) -> Arc<Session> {
        let radius = max_chunk_radius / 2;
        let self_id = controllable.id();
        Arc::new_cyclic(|me: &Weak<Session>| {
            let viewer: Weak<dyn Viewer> = me.clone();
            let loader = Loader::new(radius, Arc::clone(&services.world), viewer);
            loader.move_to(controllable.position());
            Session {
                binding: Some(Binding {
                    me: me.clone(),
                    conn,
                    controllable,
                    world: Arc::clone(&services.world),
                    presence: Arc::clone(&services.presence),
                    chat: Arc::clone(&services.chat),
                    commands: Arc::clone(&services.commands),
                    loader: ArcSwap::from_pointee(loader),
                }),
                ..Session::unbound(self_id, radius, max_chunk_radius)
            }
        })
    }

    /// A session bound to nothing. Every operation on it is a no-op.
    pub fn nop() -> Arc<Session> {
        Arc::new(Session::unbound(EntityId(0), 0, 0))
    }

    fn unbound(self_id: EntityId, radius: i32, max_chunk_radius: i32) -> Session {
        Session {
            binding: None,
            handles: EntityHandles::new(self_id),
            chunk_radius: AtomicI32::new(radius),
            max_chunk_radius,
            scoreboard: RwLock::new(String::new()),
            cmd_origin: Mutex::new(CommandOrigin::default()),
            on_stop: Mutex::new(None),
            state: Mutex::new(SessionState::Created),
            closed: AtomicBool::new(false),
            chunk_buf: Mutex::new(BytesMut::new()),
        }
    }

    pub fn is_nop(&self) -> bool {
        self.binding.is_none()
    }

    pub fn state(&self) -> SessionState {
        *self.state.lock()
    }

    pub fn controllable(&self) -> Option<&Arc<dyn Controllable>> {
        self.binding.as_ref().map(|b| &b.controllable)
    }

    pub fn identity_data(&self) -> Option<&IdentityData> {
        self.binding.as_ref().map(|b| b.conn.identity_data())
    }

    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.binding.as_ref().map(|b| b.conn.remote_addr())
    }

    /// Register with the world and the presence directory and start reading.
    ///
    /// `on_stop` runs exactly once, at the end of [`Session::close`]. Fails
    /// when the directory is full; the session stays unstarted and should be
    /// closed. Starting twice is a no-op.
    pub fn start(
        self: &Arc<Self>,
        on_stop: impl FnOnce(Arc<dyn Controllable>) + Send + 'static,
    ) -> Result<(), StartError> {
        let Some(b) = &self.binding else {
            return Ok(());
        };
        {
            let mut state = self.state.lock();
            if *state != SessionState::Created {
                return Ok(());
            }
            if !b.presence.join(self) {
                return Err(StartError::Full(b.presence.limit()));
            }
            *state = SessionState::Started;
        }
        *self.on_stop.lock() = Some(Box::new(on_stop));

        b.world.add_entity(Arc::clone(&b.controllable).as_entity());
        self.send_available_commands();

        tokio::spawn(Arc::clone(self).handle_packets());

        info!(
            "{} ({}) joined, {} online",
            b.controllable.name(),
            b.conn.remote_addr(),
            b.presence.len()
        );
        b.chat
            .println(&format!("§e{} has joined the game", b.controllable.name()));
        Ok(())
    }

    /// Read packets until the connection fails or a handler rejects one,
    /// then stop streaming and close.
    async fn handle_packets(self: Arc<Self>) {
        let Some(b) = &self.binding else {
            return;
        };
        let (stop_tx, stop_rx) = oneshot::channel();
        let streaming = tokio::spawn(Arc::clone(&self).send_chunks(stop_rx));

        loop {
            let packet = match b.conn.read_packet().await {
                Ok(packet) => packet,
                Err(e) => {
                    debug!(
                        "{} ({}): connection ended: {e}",
                        b.controllable.name(),
                        b.conn.remote_addr()
                    );
                    break;
                }
            };
            if let Err(e) = self.handle_packet(packet) {
                error!(
                    "{} ({}): protocol violation: {e}",
                    b.controllable.name(),
                    b.conn.remote_addr()
                );
                break;
            }
        }

        let _ = stop_tx.send(());
        let _ = streaming.await;
        self.close();
    }

    /// Tear the session down. Only the first call does anything.
    ///
    /// A session that never started was never announced, so it is not
    /// removed from the world or the directory either.
    pub fn close(&self) {
        let Some(b) = &self.binding else {
            return;
        };
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        let started = {
            let mut state = self.state.lock();
            let started = *state != SessionState::Created;
            *state = SessionState::Closing;
            started
        };
        let name = b.controllable.name().to_string();

        if let Err(e) = b.controllable.close() {
            error!("{name}: closing controllable failed: {e}");
        }
        b.conn.close();
        b.loader.load().close();
        if started {
            b.world.remove_entity(b.controllable.id());
            b.chat.println(&format!("§e{name} has left the game"));
            b.presence.leave(self);
        }
        self.handles.reset();

        let on_stop = self.on_stop.lock().take();
        if let Some(on_stop) = on_stop {
            on_stop(Arc::clone(&b.controllable));
        }

        *self.state.lock() = SessionState::Closed;
        info!("{name} ({}) left, {} online", b.conn.remote_addr(), b.presence.len());
    }

    /// Ask the session to close. Only the connection is closed here; the read
    /// loop notices and runs [`Session::close`] itself.
    pub fn request_close(&self) {
        if let Some(b) = &self.binding {
            b.conn.close();
        }
    }

    /// Queue a packet for the client. Dropped on the no-op session, and
    /// write failures are ignored.
    pub fn write_packet(&self, packet: Packet) {
        let Some(b) = &self.binding else {
            return;
        };
        if let Err(e) = b.conn.write_packet(packet) {
            trace!("{}: dropped outbound packet: {e}", b.controllable.name());
        }
    }

    pub fn send_message(&self, message: &str) {
        self.write_packet(Packet::Text(Text::raw(message)));
    }

    /// Send the command listing clients use for autocompletion.
    pub fn send_available_commands(&self) {
        let Some(b) = &self.binding else {
            return;
        };
        let commands = b
            .commands
            .listing()
            .into_iter()
            .map(|c| CommandData {
                name: c.name,
                description: c.description,
                usage: c.usage,
            })
            .collect();
        self.write_packet(Packet::AvailableCommands(AvailableCommands { commands }));
    }

    /// Report a command's outcome, echoing the origin of the last request.
    pub fn send_command_output(&self, success: bool, messages: &[String]) {
        if self.is_nop() {
            return;
        }
        let origin = self.cmd_origin.lock().clone();
        self.write_packet(Packet::CommandOutput(CommandOutput::new(
            origin, success, messages,
        )));
    }

    /// Show a sidebar scoreboard, replacing the current one.
    pub fn send_scoreboard(&self, objective: &str, lines: &[String]) {
        if self.is_nop() {
            return;
        }
        let previous = std::mem::replace(&mut *self.scoreboard.write(), objective.to_string());
        if !previous.is_empty() {
            self.write_packet(Packet::RemoveObjective(RemoveObjective {
                objective_name: previous,
            }));
        }
        self.write_packet(Packet::SetDisplayObjective(SetDisplayObjective::sidebar(
            objective, objective,
        )));
        let entries = lines
            .iter()
            .enumerate()
            .map(|(i, line)| ScoreEntry {
                entry_id: i as i64,
                objective_name: objective.to_string(),
                score: i as i32,
                identity_type: IDENTITY_FAKE_PLAYER,
                custom_name: line.clone(),
            })
            .collect();
        self.write_packet(Packet::SetScore(SetScore::change(entries)));
    }

    /// Remove the current scoreboard, if any.
    pub fn remove_scoreboard(&self) {
        let previous = std::mem::take(&mut *self.scoreboard.write());
        if !previous.is_empty() {
            self.write_packet(Packet::RemoveObjective(RemoveObjective {
                objective_name: previous,
            }));
        }
    }

    pub fn scoreboard_objective(&self) -> String {
        self.scoreboard.read().clone()
    }

    /// Tell the client why it is being dropped, then close.
    pub fn disconnect(&self, message: &str) {
        self.write_packet(Packet::Disconnect(Disconnect::with_message(message)));
        self.request_close();
    }
}
