//! Per-connection session layer: binds one client connection to one
//! controllable actor and streams world state back to it.

pub mod chat;
pub mod config;
pub mod conn;
pub mod listener;
pub mod player;
pub mod session;

pub use chat::Chat;
pub use conn::{Conn, ConnError, ConnPeer};
pub use player::Player;
pub use session::{Controllable, PresenceDirectory, Services, Session, SessionError};
