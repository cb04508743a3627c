//! Text (0x09), Bidirectional.
//!
//! Chat messages, system messages, and raw server messages.

use serde::{Deserialize, Serialize};

/// Text message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextType {
    Raw,
    Chat,
    Translation,
    Popup,
    Tip,
    System,
    Whisper,
    Announcement,
}

/// Text packet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub text_type: TextType,
    pub source_name: String,
    pub message: String,
    pub xuid: String,
}

impl Text {
    /// Create a Raw text message (server → client).
    pub fn raw(message: impl Into<String>) -> Self {
        Self {
            text_type: TextType::Raw,
            source_name: String::new(),
            message: message.into(),
            xuid: String::new(),
        }
    }

    /// Create a Chat message as a client sends it.
    pub fn chat(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            text_type: TextType::Chat,
            source_name: source_name.into(),
            message: message.into(),
            xuid: String::new(),
        }
    }
}
