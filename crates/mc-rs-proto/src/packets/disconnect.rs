//! Disconnect (0x05), Server → Client.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disconnect {
    pub hide_disconnect_screen: bool,
    pub message: String,
}

impl Disconnect {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            hide_disconnect_screen: false,
            message: message.into(),
        }
    }
}
