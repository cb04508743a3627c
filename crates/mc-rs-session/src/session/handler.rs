//! Inbound packet dispatch.

use mc_rs_proto::packets::command_request::origin;
use mc_rs_proto::packets::{CommandRequest, MovePlayer, Packet, Text, TextType};
use mc_rs_proto::types::Vec3;
use mc_rs_world::Entity;
use tracing::debug;

use super::{Session, SessionError, SELF_HANDLE};

/// Eye height above the feet; MovePlayer carries the eye position.
const EYE_HEIGHT: f32 = 1.62;

impl Session {
    /// Route one inbound packet. An error means the client broke protocol.
    pub(super) fn handle_packet(&self, packet: Packet) -> Result<(), SessionError> {
        match packet {
            Packet::Text(pk) => self.handle_text(pk),
            Packet::CommandRequest(pk) => self.handle_command_request(pk),
            Packet::MovePlayer(pk) => self.handle_move_player(pk),
            Packet::RequestChunkRadius(pk) => self.handle_request_chunk_radius(pk),
            Packet::BossEvent(_) => Ok(()),
            other => {
                debug!("Unhandled packet {} (0x{:02X})", other.name(), other.id());
                Ok(())
            }
        }
    }

    fn handle_text(&self, pk: Text) -> Result<(), SessionError> {
        let Some(b) = &self.binding else {
            return Ok(());
        };
        if pk.text_type != TextType::Chat {
            return Err(SessionError::InvalidTextType(pk.text_type));
        }
        let display_name = &b.conn.identity_data().display_name;
        if pk.source_name != *display_name {
            return Err(SessionError::TextSourceMismatch {
                expected: display_name.clone(),
                got: pk.source_name,
            });
        }
        b.controllable.chat(&pk.message);
        Ok(())
    }

    fn handle_command_request(&self, pk: CommandRequest) -> Result<(), SessionError> {
        let Some(b) = &self.binding else {
            return Ok(());
        };
        if pk.origin.origin_type != origin::PLAYER {
            return Err(SessionError::InvalidCommandOrigin(pk.origin.origin_type));
        }
        *self.cmd_origin.lock() = pk.origin;
        b.controllable.execute_command(&pk.command);
        Ok(())
    }

    fn handle_move_player(&self, pk: MovePlayer) -> Result<(), SessionError> {
        let Some(b) = &self.binding else {
            return Ok(());
        };
        if pk.runtime_entity_id != SELF_HANDLE {
            return Err(SessionError::ForeignRuntimeId(pk.runtime_entity_id));
        }
        if !pk.position.is_finite() {
            return Err(SessionError::NonFinitePosition(pk.position));
        }
        if !pk.yaw.is_finite() || !pk.pitch.is_finite() {
            return Err(SessionError::NonFiniteRotation {
                yaw: pk.yaw,
                pitch: pk.pitch,
            });
        }

        let c = &b.controllable;
        let old_pos = c.position();
        let (yaw, pitch) = c.rotation();
        let new_pos = pk.position - Vec3::new(0.0, EYE_HEIGHT, 0.0);

        c.move_by(new_pos - old_pos);
        c.rotate(pk.yaw - yaw, pk.pitch - pitch);

        b.loader.load().move_to(new_pos);
        if old_pos.chunk_pos() != new_pos.chunk_pos() {
            self.send_publisher_update(new_pos);
        }
        Ok(())
    }
}
