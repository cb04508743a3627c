//! CommandOutput (0x4F), Server → Client.
//!
//! Sent in response to a CommandRequest with the execution result.

use serde::{Deserialize, Serialize};

use crate::packets::command_request::CommandOrigin;

/// One line of command output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputMessage {
    pub is_success: bool,
    pub message: String,
}

/// CommandOutput packet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOutput {
    pub origin: CommandOrigin,
    pub success_count: u32,
    pub messages: Vec<OutputMessage>,
}

impl CommandOutput {
    /// Build an output where every message shares the same success flag.
    pub fn new(origin: CommandOrigin, success: bool, messages: &[String]) -> Self {
        Self {
            origin,
            success_count: u32::from(success),
            messages: messages
                .iter()
                .map(|m| OutputMessage {
                    is_success: success,
                    message: m.clone(),
                })
                .collect(),
        }
    }
}
