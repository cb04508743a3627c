//! The player: the controllable a human client drives.

use std::sync::Arc;

use mc_rs_command::CommandRegistry;
use mc_rs_proto::types::{Uuid, Vec3};
use mc_rs_world::{Entity, EntityId, SpawnInfo, World};
use parking_lot::RwLock;

use crate::chat::{Chat, Subscriber};
use crate::session::{Controllable, Services, Session};

#[derive(Debug, Clone, Copy)]
struct Motion {
    position: Vec3,
    yaw: f32,
    pitch: f32,
}

pub struct Player {
    id: EntityId,
    name: String,
    uuid: Uuid,
    motion: RwLock<Motion>,
    world: Arc<World>,
    chat: Arc<Chat>,
    commands: Arc<CommandRegistry>,
    /// The no-op session until attached, and again after close.
    session: RwLock<Arc<Session>>,
}

impl Player {
    pub fn new(name: impl Into<String>, uuid: Uuid, position: Vec3, services: &Services) -> Arc<Self> {
        Arc::new(Self {
            id: services.world.allocate_entity_id(),
            name: name.into(),
            uuid,
            motion: RwLock::new(Motion {
                position,
                yaw: 0.0,
                pitch: 0.0,
            }),
            world: Arc::clone(&services.world),
            chat: Arc::clone(&services.chat),
            commands: Arc::clone(&services.commands),
            session: RwLock::new(Session::nop()),
        })
    }

    /// Bind the player to its session and start receiving chat.
    pub fn attach(self: &Arc<Self>, session: Arc<Session>) {
        *self.session.write() = session;
        self.chat.subscribe(self.uuid, Arc::clone(self) as Arc<dyn Subscriber>);
    }

    pub fn session(&self) -> Arc<Session> {
        Arc::clone(&self.session.read())
    }
}

impl Entity for Player {
    fn id(&self) -> EntityId {
        self.id
    }

    fn position(&self) -> Vec3 {
        self.motion.read().position
    }

    fn rotation(&self) -> (f32, f32) {
        let m = self.motion.read();
        (m.yaw, m.pitch)
    }

    fn spawn_info(&self) -> SpawnInfo {
        SpawnInfo::Player {
            username: self.name.clone(),
            uuid: self.uuid,
        }
    }
}

impl Subscriber for Player {
    fn message(&self, text: &str) {
        self.session().send_message(text);
    }
}

impl Controllable for Player {
    fn name(&self) -> &str {
        &self.name
    }

    fn uuid(&self) -> Uuid {
        self.uuid
    }

    fn move_by(&self, delta: Vec3) {
        {
            let mut m = self.motion.write();
            m.position = m.position + delta;
        }
        self.world.entity_moved(self.id);
    }

    fn rotate(&self, delta_yaw: f32, delta_pitch: f32) {
        {
            let mut m = self.motion.write();
            m.yaw += delta_yaw;
            m.pitch += delta_pitch;
        }
        self.world.entity_moved(self.id);
    }

    fn chat(&self, message: &str) {
        self.chat.println(&format!("<{}> {}", self.name, message));
    }

    fn execute_command(&self, command_line: &str) {
        let result = self.commands.execute_line(&self.name, command_line);
        if let Some(broadcast) = &result.broadcast {
            self.chat.println(broadcast);
        }
        self.session()
            .send_command_output(result.success, &result.messages);
    }

    fn close(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.chat.unsubscribe(&self.uuid);
        *self.session.write() = Session::nop();
        Ok(())
    }

    fn as_entity(self: Arc<Self>) -> Arc<dyn Entity> {
        self
    }
}
