use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub game: GameConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory of the built frontend, served for any unmatched path
    pub static_dir: String,
    /// Outgoing message buffer per WebSocket connection
    pub channel_capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    pub dictionary_path: String,
    /// Re-run the move evaluator on every relayed move
    pub revalidate_moves: bool,
    pub timer_seconds: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3001,
                static_dir: "./dist".to_string(),
                channel_capacity: 100,
            },
            game: GameConfig {
                dictionary_path: "./bg-dictionary.txt".to_string(),
                revalidate_moves: true,
                timer_seconds: 105,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Config::default();

        let server = ServerConfig {
            host: env::var("HOST").unwrap_or(defaults.server.host),
            port: env::var("PORT")
                .unwrap_or_else(|_| defaults.server.port.to_string())
                .parse()
                .context("PORT must be a number")?,
            static_dir: env::var("STATIC_DIR").unwrap_or(defaults.server.static_dir),
            channel_capacity: env::var("CHANNEL_CAPACITY")
                .unwrap_or_else(|_| defaults.server.channel_capacity.to_string())
                .parse()
                .context("CHANNEL_CAPACITY must be a number")?,
        };

        let game = GameConfig {
            dictionary_path: env::var("DICTIONARY_PATH").unwrap_or(defaults.game.dictionary_path),
            revalidate_moves: env::var("REVALIDATE_MOVES")
                .unwrap_or_else(|_| defaults.game.revalidate_moves.to_string())
                .parse()
                .context("REVALIDATE_MOVES must be true or false")?,
            timer_seconds: env::var("TIMER_SECONDS")
                .unwrap_or_else(|_| defaults.game.timer_seconds.to_string())
                .parse()
                .context("TIMER_SECONDS must be a number")?,
        };

        anyhow::ensure!(server.channel_capacity > 0, "CHANNEL_CAPACITY must be positive");

        Ok(Config { server, game })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
