//! JSON file configuration store.
//!
//! A missing file is not an error: [`load`](ConfigPort::load) falls back
//! to [`SimConfig::default()`].  Both directions validate.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::info;

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::SimConfig;

pub struct JsonConfigStore {
    path: PathBuf,
}

impl JsonConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigPort for JsonConfigStore {
    fn load(&self) -> Result<SimConfig, ConfigError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(
                    "JsonConfigStore: {} not found, using defaults",
                    self.path.display()
                );
                return Ok(SimConfig::default());
            }
            Err(e) => return Err(ConfigError::IoError(e.kind())),
        };
        let cfg: SimConfig =
            serde_json::from_str(&text).map_err(|e| ConfigError::Corrupted(e.to_string()))?;
        cfg.validate()?;
        info!("JsonConfigStore: loaded {}", self.path.display());
        Ok(cfg)
    }

    fn save(&self, config: &SimConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let text = serde_json::to_string_pretty(config)
            .map_err(|e| ConfigError::Corrupted(e.to_string()))?;
        std::fs::write(&self.path, text).map_err(|e| ConfigError::IoError(e.kind()))?;
        info!("JsonConfigStore: saved {}", self.path.display());
        Ok(())
    }
}
