//! RemoveObjective (0x6A), Server → Client.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveObjective {
    pub objective_name: String,
}
