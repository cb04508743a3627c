//! Login (0x01), Client → Server.
//!
//! The first frame on a connection. Carries the identity the transport hands
//! to the session layer; no authentication is performed.

use serde::{Deserialize, Serialize};

use crate::types::Uuid;

/// Identity of the player behind a connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityData {
    pub display_name: String,
    pub identity: Uuid,
    pub xuid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Login {
    pub identity: IdentityData,
}
