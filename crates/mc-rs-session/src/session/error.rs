use mc_rs_proto::packets::TextType;
use mc_rs_proto::types::Vec3;
use thiserror::Error;

/// A protocol violation: input a well-behaved client never sends.
///
/// Any of these ends the session.
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("text packet of type {0:?}, expected Chat")]
    InvalidTextType(TextType),

    #[error("text source {got:?} does not match display name {expected:?}")]
    TextSourceMismatch { expected: String, got: String },

    #[error("command request origin type {0} is not a player")]
    InvalidCommandOrigin(u32),

    #[error("movement for runtime ID {0}, expected the player's own")]
    ForeignRuntimeId(u64),

    #[error("movement to non-finite position {0}")]
    NonFinitePosition(Vec3),

    #[error("movement with non-finite rotation (yaw {yaw}, pitch {pitch})")]
    NonFiniteRotation { yaw: f32, pitch: f32 },
}

/// Why a session could not start.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StartError {
    #[error("server is full ({0} players)")]
    Full(usize),
}
