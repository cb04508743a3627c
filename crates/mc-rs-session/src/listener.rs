//! TCP transport: accepts clients and pumps framed packets between each
//! socket and its session's connection.

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::BytesMut;
use mc_rs_proto::codec::{decode_frame, encode_frame};
use mc_rs_proto::error::ProtoError;
use mc_rs_proto::packets::{Disconnect, Packet};
use mc_rs_proto::types::Vec3;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use crate::conn::{self, ConnPeer};
use crate::player::Player;
use crate::session::{Controllable, Services, Session};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Per-connection settings taken from the server config.
#[derive(Debug, Clone)]
pub struct ListenerSettings {
    pub max_chunk_radius: i32,
    pub spawn: Vec3,
}

/// Accept connections forever, one task per client.
pub async fn serve(listener: TcpListener, services: Services, settings: ListenerSettings) {
    let settings = Arc::new(settings);
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                debug!("Connection from {peer}");
                let services = services.clone();
                let settings = Arc::clone(&settings);
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, peer, services, &settings).await {
                        debug!("Connection {peer} closed: {e}");
                    }
                });
            }
            Err(e) => {
                warn!("Accept error: {e}");
            }
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    services: Services,
    settings: &ListenerSettings,
) -> Result<(), BoxError> {
    let (mut reader, mut writer) = stream.into_split();
    let mut inbound = BytesMut::with_capacity(4096);
    let mut outbound = BytesMut::new();

    // The first frame must be a Login
    let first = loop {
        if let Some(packet) = decode_frame(&mut inbound)? {
            break packet;
        }
        if reader.read_buf(&mut inbound).await? == 0 {
            return Ok(());
        }
    };
    let login = match first {
        Packet::Login(login) => login,
        other => {
            return Err(ProtoError::UnexpectedPacket {
                expected: "Login",
                got: other.name(),
            }
            .into())
        }
    };

    let identity = login.identity;
    let (conn, mut peer) = conn::pipe(addr, identity.clone());
    let player = Player::new(
        identity.display_name.clone(),
        identity.identity,
        settings.spawn,
        &services,
    );
    let session = Session::new(player.clone(), conn, &services, settings.max_chunk_radius);
    player.attach(Arc::clone(&session));
    if let Err(e) = session.start(move |c| debug!("Session of {} stopped", c.name())) {
        info!("Refused {} ({addr}): {e}", identity.display_name);
        session.close();
        encode_frame(
            &Packet::Disconnect(Disconnect::with_message("Server is full")),
            &mut outbound,
        )?;
        writer.write_all(&outbound).await?;
        writer.shutdown().await?;
        return Ok(());
    }

    let result = pump(&mut reader, &mut writer, &mut peer, inbound, &mut outbound).await;
    // Whatever ended the pump, the session's next read fails
    peer.disconnect();
    result
}

/// Shuttle frames until either side goes away.
async fn pump(
    reader: &mut tokio::net::tcp::OwnedReadHalf,
    writer: &mut tokio::net::tcp::OwnedWriteHalf,
    peer: &mut ConnPeer,
    mut inbound: BytesMut,
    outbound: &mut BytesMut,
) -> Result<(), BoxError> {
    // Frames that arrived together with the Login
    while let Some(packet) = decode_frame(&mut inbound)? {
        peer.send(packet)?;
    }
    loop {
        tokio::select! {
            packet = peer.recv() => match packet {
                Some(packet) => {
                    outbound.clear();
                    encode_frame(&packet, outbound)?;
                    writer.write_all(outbound).await?;
                }
                None => {
                    // Session closed the connection
                    writer.shutdown().await?;
                    return Ok(());
                }
            },
            read = reader.read_buf(&mut inbound) => {
                if read? == 0 {
                    return Ok(());
                }
                while let Some(packet) = decode_frame(&mut inbound)? {
                    peer.send(packet)?;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Chat;
    use crate::session::PresenceDirectory;
    use mc_rs_command::CommandRegistry;
    use mc_rs_proto::packets::{IdentityData, Login, Text};
    use mc_rs_proto::types::Uuid;
    use mc_rs_world::generator::FlatGenerator;
    use mc_rs_world::World;
    use std::time::Duration;

    fn services(max_players: usize) -> Services {
        Services {
            world: Arc::new(World::new("test", Box::new(FlatGenerator::default()))),
            presence: Arc::new(PresenceDirectory::with_limit(max_players)),
            chat: Arc::new(Chat::new()),
            commands: Arc::new(CommandRegistry::new()),
        }
    }

    async fn start(services: Services) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let settings = ListenerSettings {
            max_chunk_radius: 2,
            spawn: Vec3::new(0.5, 4.0, 0.5),
        };
        tokio::spawn(serve(listener, services, settings));
        addr
    }

    async fn send(stream: &mut TcpStream, packet: &Packet) {
        let mut buf = BytesMut::new();
        encode_frame(packet, &mut buf).unwrap();
        stream.write_all(&buf).await.unwrap();
    }

    async fn recv(stream: &mut TcpStream, buf: &mut BytesMut) -> Option<Packet> {
        loop {
            if let Some(packet) = decode_frame(buf).unwrap() {
                return Some(packet);
            }
            let read = tokio::time::timeout(Duration::from_secs(5), stream.read_buf(buf))
                .await
                .expect("timed out waiting for a frame")
                .unwrap();
            if read == 0 {
                return None;
            }
        }
    }

    fn login(name: &str) -> Packet {
        Packet::Login(Login {
            identity: IdentityData {
                display_name: name.into(),
                identity: Uuid::new(7, name.bytes().map(u64::from).sum()),
                xuid: String::new(),
            },
        })
    }

    async fn wait_until(mut cond: impl FnMut() -> bool) {
        for _ in 0..200 {
            if cond() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not reached");
    }

    #[tokio::test]
    async fn login_joins_and_eof_leaves() {
        let services = services(10);
        let addr = start(services.clone()).await;

        let mut client = TcpStream::connect(addr).await.unwrap();
        send(&mut client, &login("Steve")).await;

        let mut buf = BytesMut::new();
        let mut saw_commands = false;
        let mut saw_chunk = false;
        while !(saw_commands && saw_chunk) {
            match recv(&mut client, &mut buf).await {
                Some(Packet::AvailableCommands(_)) => saw_commands = true,
                Some(Packet::LevelChunk(_)) => saw_chunk = true,
                Some(_) => {}
                None => panic!("connection closed early"),
            }
        }
        assert_eq!(services.presence.len(), 1);
        assert_eq!(services.world.entity_count(), 1);

        drop(client);
        let presence = Arc::clone(&services.presence);
        wait_until(|| presence.is_empty()).await;
        assert_eq!(services.world.entity_count(), 0);
    }

    #[tokio::test]
    async fn first_frame_must_be_login() {
        let addr = start(services(10)).await;
        let mut client = TcpStream::connect(addr).await.unwrap();
        send(&mut client, &Packet::Text(Text::chat("Steve", "hi"))).await;

        let mut buf = BytesMut::new();
        assert_eq!(recv(&mut client, &mut buf).await, None);
    }

    #[tokio::test]
    async fn full_server_refuses() {
        let services = services(0);
        let addr = start(services.clone()).await;
        let mut client = TcpStream::connect(addr).await.unwrap();
        send(&mut client, &login("Alex")).await;

        let mut buf = BytesMut::new();
        match recv(&mut client, &mut buf).await {
            Some(Packet::Disconnect(d)) => assert_eq!(d.message, "Server is full"),
            other => panic!("expected Disconnect, got {other:?}"),
        }
        assert_eq!(recv(&mut client, &mut buf).await, None);
        assert!(services.presence.is_empty());
        assert_eq!(services.world.entity_count(), 0);
    }

    #[tokio::test]
    async fn last_slot_goes_to_one_client() {
        let services = services(1);
        let addr = start(services.clone()).await;

        let mut clients = Vec::new();
        for name in ["Alex", "Steve", "Brook"] {
            let mut client = TcpStream::connect(addr).await.unwrap();
            send(&mut client, &login(name)).await;
            clients.push(client);
        }

        let mut refused = 0;
        for client in &mut clients {
            let mut buf = BytesMut::new();
            if let Some(Packet::Disconnect(d)) = recv(client, &mut buf).await {
                assert_eq!(d.message, "Server is full");
                refused += 1;
            }
        }
        assert_eq!(refused, 2);
        assert_eq!(services.presence.len(), 1);
    }

    #[tokio::test]
    async fn protocol_violation_closes_socket() {
        let services = services(10);
        let addr = start(services.clone()).await;
        let mut client = TcpStream::connect(addr).await.unwrap();
        send(&mut client, &login("Steve")).await;
        // Chat with someone else's name
        send(&mut client, &Packet::Text(Text::chat("Herobrine", "boo"))).await;

        let mut buf = BytesMut::new();
        while recv(&mut client, &mut buf).await.is_some() {}
        let presence = Arc::clone(&services.presence);
        wait_until(|| presence.is_empty()).await;
    }
}
