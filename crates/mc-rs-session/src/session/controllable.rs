use std::sync::Arc;

use mc_rs_proto::types::{Uuid, Vec3};
use mc_rs_world::Entity;

/// The actor a session drives on behalf of its client.
pub trait Controllable: Entity {
    fn name(&self) -> &str;
    fn uuid(&self) -> Uuid;

    /// Move by `delta` and propagate the change to the world.
    fn move_by(&self, delta: Vec3);
    /// Rotate by the given yaw and pitch deltas, in degrees.
    fn rotate(&self, delta_yaw: f32, delta_pitch: f32);

    /// Say something in chat.
    fn chat(&self, message: &str);
    /// Run a command line typed by the client.
    fn execute_command(&self, command_line: &str);

    fn close(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    fn as_entity(self: Arc<Self>) -> Arc<dyn Entity>;
}
