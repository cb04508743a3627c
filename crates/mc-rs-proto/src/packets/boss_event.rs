//! BossEvent (0x4A), Bidirectional.
//!
//! Controls boss bar display. Clients echo these back; the server ignores them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossEvent {
    pub boss_entity_id: i64,
    pub event_type: u32,
    pub title: String,
    pub health_percent: f32,
}
