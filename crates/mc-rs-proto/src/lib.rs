//! Bedrock-style packet values, core types, and the frame codec used between
//! the transport and the session layer.

pub mod codec;
pub mod error;
pub mod packets;
pub mod types;
