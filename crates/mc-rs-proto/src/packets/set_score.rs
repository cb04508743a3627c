//! SetScore (0x6C), Server → Client.
//!
//! Updates scoreboard score entries.

use serde::{Deserialize, Serialize};

/// Score action: set/update scores.
pub const SCORE_ACTION_CHANGE: u8 = 0;
/// Score action: remove scores.
pub const SCORE_ACTION_REMOVE: u8 = 1;

/// Identity type for fake player entries.
pub const IDENTITY_FAKE_PLAYER: u8 = 3;

/// A scoreboard score entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub entry_id: i64,
    pub objective_name: String,
    pub score: i32,
    pub identity_type: u8,
    /// Line text for fake player entries.
    pub custom_name: String,
}

/// SetScore packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetScore {
    pub action_type: u8,
    pub entries: Vec<ScoreEntry>,
}

impl SetScore {
    /// Create a change (set/update) packet.
    pub fn change(entries: Vec<ScoreEntry>) -> Self {
        Self {
            action_type: SCORE_ACTION_CHANGE,
            entries,
        }
    }
}
