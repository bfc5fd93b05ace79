use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

pub const DEFAULT_CANONICAL_SIZE: f64 = 0.6;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct AssetId(Uuid);

impl AssetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AssetId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub canonical_size: f64,
    pub min_object_scale: f64,
    pub max_object_scale: f64,
    pub audio_volume: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            canonical_size: DEFAULT_CANONICAL_SIZE,
            min_object_scale: 0.1,
            max_object_scale: 10.0,
            audio_volume: 1.0,
        }
    }
}

impl ControllerConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|err| Error::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.canonical_size > 0.0) {
            return Err(Error::InvalidConfig(
                "canonical_size must be > 0".to_string(),
            ));
        }
        if !(self.min_object_scale > 0.0) {
            return Err(Error::InvalidConfig(
                "min_object_scale must be > 0".to_string(),
            ));
        }
        if self.max_object_scale < self.min_object_scale {
            return Err(Error::InvalidConfig(
                "max_object_scale must be >= min_object_scale".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.audio_volume) {
            return Err(Error::InvalidConfig(
                "audio_volume must be within 0..=1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("unsupported asset format: {0}")]
    UnsupportedFormat(String),
    #[error("malformed asset: {0}")]
    Malformed(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("AR hit-test is not supported by this device")]
    HitTestUnsupported,
    #[error("no active AR session")]
    NoActiveSession,
    #[error("hit-test source unavailable: {0}")]
    SourceUnavailable(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() -> Result<()> {
        let config = ControllerConfig::from_json_str(r#"{ "max_object_scale": 4.0 }"#)?;
        assert_eq!(config.canonical_size, DEFAULT_CANONICAL_SIZE);
        assert_eq!(config.max_object_scale, 4.0);
        Ok(())
    }

    #[test]
    fn inverted_scale_bounds_are_rejected() {
        let result =
            ControllerConfig::from_json_str(r#"{ "min_object_scale": 2.0, "max_object_scale": 1.0 }"#);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn asset_ids_are_unique() {
        assert_ne!(AssetId::new(), AssetId::new());
    }
}
