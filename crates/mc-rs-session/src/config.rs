use serde::Deserialize;
use std::path::Path;

use mc_rs_proto::types::Vec3;

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    pub server: ServerSection,
    pub world: WorldSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Deserialize)]
pub struct ServerSection {
    pub address: String,
    pub port: u16,
    pub motd: String,
    pub max_players: u32,
    /// Upper bound for client chunk radius requests. Sessions start at half.
    #[serde(default = "default_max_chunk_radius")]
    pub max_chunk_radius: i32,
}

fn default_max_chunk_radius() -> i32 {
    16
}

#[derive(Debug, Deserialize)]
pub struct WorldSection {
    pub name: String,
    pub generator: String,
    /// Spawn position as `[x, y, z]`.
    #[serde(default = "default_spawn")]
    pub spawn: [f32; 3],
}

fn default_spawn() -> [f32; 3] {
    [0.5, 4.0, 0.5]
}

impl WorldSection {
    pub fn spawn_position(&self) -> Vec3 {
        Vec3::new(self.spawn[0], self.spawn[1], self.spawn[2])
    }
}

#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    pub level: String,
}

impl ServerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }
}
