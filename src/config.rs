//! Decoder configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid decoder configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Knobs applied by [`crate::Codec`] around each top-level decode.
///
/// Protocol maxima are not configurable; they live in [`crate::constants`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecodeConfig {
    /// Reject input with bytes left over after the decoded value
    pub strict: bool,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self { strict: true }
    }
}

impl DecodeConfig {
    /// Accepts and ignores trailing bytes
    pub fn lenient() -> Self {
        Self { strict: false }
    }

    /// Parses a JSON document; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}
