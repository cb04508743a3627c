//! Game packet definitions handled at the session boundary.

pub mod add_actor;
pub mod add_player;
pub mod animate;
pub mod available_commands;
pub mod boss_event;
pub mod chunk_radius_updated;
pub mod command_output;
pub mod command_request;
pub mod disconnect;
pub mod level_chunk;
pub mod login;
pub mod move_actor_absolute;
pub mod move_player;
pub mod network_chunk_publisher_update;
pub mod player_list;
pub mod remove_entity;
pub mod remove_objective;
pub mod request_chunk_radius;
pub mod set_display_objective;
pub mod set_score;
pub mod text;

use serde::{Deserialize, Serialize};

pub use add_actor::AddActor;
pub use add_player::AddPlayer;
pub use animate::Animate;
pub use available_commands::{AvailableCommands, CommandData};
pub use boss_event::BossEvent;
pub use chunk_radius_updated::ChunkRadiusUpdated;
pub use command_output::{CommandOutput, OutputMessage};
pub use command_request::{CommandOrigin, CommandRequest};
pub use disconnect::Disconnect;
pub use level_chunk::LevelChunk;
pub use login::{IdentityData, Login};
pub use move_actor_absolute::MoveActorAbsolute;
pub use move_player::{MoveMode, MovePlayer};
pub use network_chunk_publisher_update::NetworkChunkPublisherUpdate;
pub use player_list::{PlayerList, PlayerListEntry};
pub use remove_entity::RemoveEntity;
pub use remove_objective::RemoveObjective;
pub use request_chunk_radius::RequestChunkRadius;
pub use set_display_objective::SetDisplayObjective;
pub use set_score::{ScoreEntry, SetScore};
pub use text::{Text, TextType};

/// Game packet IDs.
pub mod id {
    pub const LOGIN: u32 = 0x01;
    pub const DISCONNECT: u32 = 0x05;
    pub const TEXT: u32 = 0x09;
    pub const ADD_PLAYER: u32 = 0x0C;
    pub const ADD_ACTOR: u32 = 0x0D;
    pub const REMOVE_ENTITY: u32 = 0x0E;
    pub const MOVE_ACTOR_ABSOLUTE: u32 = 0x10;
    pub const MOVE_PLAYER: u32 = 0x13;
    pub const ANIMATE: u32 = 0x2C;
    pub const LEVEL_CHUNK: u32 = 0x3A;
    pub const PLAYER_LIST: u32 = 0x3F;
    pub const REQUEST_CHUNK_RADIUS: u32 = 0x45;
    pub const CHUNK_RADIUS_UPDATED: u32 = 0x46;
    pub const BOSS_EVENT: u32 = 0x4A;
    pub const AVAILABLE_COMMANDS: u32 = 0x4C;
    pub const COMMAND_REQUEST: u32 = 0x4D;
    pub const COMMAND_OUTPUT: u32 = 0x4F;
    pub const REMOVE_OBJECTIVE: u32 = 0x6A;
    pub const SET_DISPLAY_OBJECTIVE: u32 = 0x6B;
    pub const SET_SCORE: u32 = 0x6C;
    pub const NETWORK_CHUNK_PUBLISHER_UPDATE: u32 = 0x7A;
}

/// A decoded packet, as handed between the transport and the session layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "body")]
pub enum Packet {
    Login(Login),
    Disconnect(Disconnect),
    Text(Text),
    AddPlayer(AddPlayer),
    AddActor(AddActor),
    RemoveEntity(RemoveEntity),
    MoveActorAbsolute(MoveActorAbsolute),
    MovePlayer(MovePlayer),
    Animate(Animate),
    LevelChunk(LevelChunk),
    PlayerList(PlayerList),
    RequestChunkRadius(RequestChunkRadius),
    ChunkRadiusUpdated(ChunkRadiusUpdated),
    BossEvent(BossEvent),
    AvailableCommands(AvailableCommands),
    CommandRequest(CommandRequest),
    CommandOutput(CommandOutput),
    RemoveObjective(RemoveObjective),
    SetDisplayObjective(SetDisplayObjective),
    SetScore(SetScore),
    NetworkChunkPublisherUpdate(NetworkChunkPublisherUpdate),
}

impl Packet {
    /// The Bedrock packet ID of this packet.
    pub fn id(&self) -> u32 {
        match self {
            Packet::Login(_) => id::LOGIN,
            Packet::Disconnect(_) => id::DISCONNECT,
            Packet::Text(_) => id::TEXT,
            Packet::AddPlayer(_) => id::ADD_PLAYER,
            Packet::AddActor(_) => id::ADD_ACTOR,
            Packet::RemoveEntity(_) => id::REMOVE_ENTITY,
            Packet::MoveActorAbsolute(_) => id::MOVE_ACTOR_ABSOLUTE,
            Packet::MovePlayer(_) => id::MOVE_PLAYER,
            Packet::Animate(_) => id::ANIMATE,
            Packet::LevelChunk(_) => id::LEVEL_CHUNK,
            Packet::PlayerList(_) => id::PLAYER_LIST,
            Packet::RequestChunkRadius(_) => id::REQUEST_CHUNK_RADIUS,
            Packet::ChunkRadiusUpdated(_) => id::CHUNK_RADIUS_UPDATED,
            Packet::BossEvent(_) => id::BOSS_EVENT,
            Packet::AvailableCommands(_) => id::AVAILABLE_COMMANDS,
            Packet::CommandRequest(_) => id::COMMAND_REQUEST,
            Packet::CommandOutput(_) => id::COMMAND_OUTPUT,
            Packet::RemoveObjective(_) => id::REMOVE_OBJECTIVE,
            Packet::SetDisplayObjective(_) => id::SET_DISPLAY_OBJECTIVE,
            Packet::SetScore(_) => id::SET_SCORE,
            Packet::NetworkChunkPublisherUpdate(_) => id::NETWORK_CHUNK_PUBLISHER_UPDATE,
        }
    }

    /// Packet name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Packet::Login(_) => "Login",
            Packet::Disconnect(_) => "Disconnect",
            Packet::Text(_) => "Text",
            Packet::AddPlayer(_) => "AddPlayer",
            Packet::AddActor(_) => "AddActor",
            Packet::RemoveEntity(_) => "RemoveEntity",
            Packet::MoveActorAbsolute(_) => "MoveActorAbsolute",
            Packet::MovePlayer(_) => "MovePlayer",
            Packet::Animate(_) => "Animate",
            Packet::LevelChunk(_) => "LevelChunk",
            Packet::PlayerList(_) => "PlayerList",
            Packet::RequestChunkRadius(_) => "RequestChunkRadius",
            Packet::ChunkRadiusUpdated(_) => "ChunkRadiusUpdated",
            Packet::BossEvent(_) => "BossEvent",
            Packet::AvailableCommands(_) => "AvailableCommands",
            Packet::CommandRequest(_) => "CommandRequest",
            Packet::CommandOutput(_) => "CommandOutput",
            Packet::RemoveObjective(_) => "RemoveObjective",
            Packet::SetDisplayObjective(_) => "SetDisplayObjective",
            Packet::SetScore(_) => "SetScore",
            Packet::NetworkChunkPublisherUpdate(_) => "NetworkChunkPublisherUpdate",
        }
    }
}
