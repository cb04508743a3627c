//! AvailableCommands (0x4C), Server → Client.
//!
//! Lists the commands the client may offer for autocompletion.

use serde::{Deserialize, Serialize};

/// A single command entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandData {
    pub name: String,
    pub description: String,
    pub usage: String,
}

/// AvailableCommands packet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableCommands {
    pub commands: Vec<CommandData>,
}
