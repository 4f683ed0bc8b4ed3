use std::path::Path;
use thiserror::Error;

use super::schema::LikesConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("validation: {0}")]
    Validation(String),
}

pub fn load_from_file(path: &Path) -> Result<LikesConfig, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    load_from_str(&contents)
}

pub fn load_from_str(yaml: &str) -> Result<LikesConfig, ConfigError> {
    let cfg: LikesConfig = serde_yaml::from_str(yaml)?;
    validate(&cfg)?;
    Ok(cfg)
}

pub fn validate(cfg: &LikesConfig) -> Result<(), ConfigError> {
    if cfg.window_seconds == 0 {
        return Err(ConfigError::Validation("window_seconds must be > 0".into()));
    }
    if cfg.rate_cap == 0 {
        return Err(ConfigError::Validation("rate_cap must be > 0".into()));
    }
    if cfg.sweep_interval_seconds == 0 {
        return Err(ConfigError::Validation(
            "sweep_interval_seconds must be > 0".into(),
        ));
    }
    if cfg.store_timeout_ms == 0 {
        return Err(ConfigError::Validation("store_timeout_ms must be > 0".into()));
    }
    Ok(())
}
