//! CommandRequest (0x4D), Client → Server.
//!
//! Sent when the player types a `/command` in chat.

use serde::{Deserialize, Serialize};

use crate::types::Uuid;

/// Origin types for a command request.
pub mod origin {
    pub const PLAYER: u32 = 0;
    pub const BLOCK: u32 = 1;
    pub const MINECART_BLOCK: u32 = 2;
    pub const DEV_CONSOLE: u32 = 3;
    pub const TEST: u32 = 4;
    pub const AUTOMATION_PLAYER: u32 = 5;
}

/// Origin information for a command request.
///
/// Must be echoed back verbatim in CommandOutput.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOrigin {
    pub origin_type: u32,
    pub uuid: Uuid,
    pub request_id: String,
}

impl CommandOrigin {
    /// A player origin with the given request UUID.
    pub fn player(uuid: Uuid) -> Self {
        Self {
            origin_type: origin::PLAYER,
            uuid,
            request_id: String::new(),
        }
    }
}

impl Default for CommandOrigin {
    fn default() -> Self {
        Self::player(Uuid::ZERO)
    }
}

/// CommandRequest packet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRequest {
    pub command: String,
    pub origin: CommandOrigin,
    pub internal: bool,
}
