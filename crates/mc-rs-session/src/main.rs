use std::net::SocketAddr;
use std::sync::Arc;

use mc_rs_command::CommandRegistry;
use mc_rs_session::config::ServerConfig;
use mc_rs_session::listener::{self, ListenerSettings};
use mc_rs_session::{Chat, PresenceDirectory, Services};
use mc_rs_world::generator::{FlatGenerator, Generator};
use mc_rs_world::World;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    let config = match ServerConfig::load("server.toml") {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load server.toml: {e}");
            std::process::exit(1);
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!(
        "MC-RS Session v{} starting on {}:{}",
        env!("CARGO_PKG_VERSION"),
        config.server.address,
        config.server.port
    );
    info!("MOTD: {}", config.server.motd);
    info!("Max players: {}", config.server.max_players);
    info!(
        "World: {} (generator: {}), max chunk radius {}",
        config.world.name, config.world.generator, config.server.max_chunk_radius
    );

    let generator: Box<dyn Generator> = match config.world.generator.as_str() {
        "flat" => Box::new(FlatGenerator::default()),
        other => {
            warn!("Unknown generator '{other}', using flat");
            Box::new(FlatGenerator::default())
        }
    };

    let services = Services {
        world: Arc::new(World::new(config.world.name.clone(), generator)),
        presence: Arc::new(PresenceDirectory::with_limit(
            config.server.max_players as usize,
        )),
        chat: Arc::new(Chat::new()),
        commands: Arc::new(CommandRegistry::new()),
    };

    let addr: SocketAddr = match format!("{}:{}", config.server.address, config.server.port).parse()
    {
        Ok(addr) => addr,
        Err(e) => {
            eprintln!("Invalid bind address: {e}");
            std::process::exit(1);
        }
    };
    let tcp = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };
    info!("Listening on {addr}");

    let settings = ListenerSettings {
        max_chunk_radius: config.server.max_chunk_radius,
        spawn: config.world.spawn_position(),
    };

    tokio::select! {
        _ = listener::serve(tcp, services.clone(), settings) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    services.world.close();
    let sessions = services.presence.members();
    info!("Closing {} session(s)", sessions.len());
    for session in sessions {
        session.disconnect("Server closed");
    }
    // Give read loops a moment to unwind
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    info!("Server stopped.");
}
