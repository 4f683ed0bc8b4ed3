use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

use fanpage_likes::config::{validate, ConfigError};
use fanpage_likes::LikesConfig;

pub const CONFIG_PATH_ENV: &str = "FANPAGE_CONFIG";
pub const API_ADDR_ENV: &str = "FANPAGE_API_ADDR";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_api_addr")]
    pub api_addr: SocketAddr,
    #[serde(default)]
    pub likes: LikesConfig,
}

#[derive(Debug, Error)]
pub enum ServerConfigError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("likes: {0}")]
    Likes(#[from] ConfigError),

    #[error("invalid FANPAGE_API_ADDR: {0}")]
    ApiAddr(#[from] std::net::AddrParseError),
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_addr: default_api_addr(),
            likes: LikesConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Reads the file named by `FANPAGE_CONFIG` if set, then applies
    /// `FANPAGE_API_ADDR`.
    pub fn from_env() -> Result<Self, ServerConfigError> {
        let mut cfg = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => {
                tracing::info!(%path, "loading config file");
                Self::load_from_file(Path::new(&path))?
            }
            Err(_) => {
                tracing::info!("{CONFIG_PATH_ENV} not set, using defaults");
                Self::default()
            }
        };
        if let Ok(addr) = std::env::var(API_ADDR_ENV) {
            cfg.api_addr = addr.parse()?;
        }
        Ok(cfg)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ServerConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::load_from_str(&contents)
    }

    pub fn load_from_str(yaml: &str) -> Result<Self, ServerConfigError> {
        let cfg: Self = serde_yaml::from_str(yaml)?;
        validate(&cfg.likes)?;
        Ok(cfg)
    }
}

fn default_api_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 9090))
}
