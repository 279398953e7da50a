use ::config::{Config, Environment};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::{DigestHashMaker, HashAlgorithm, InvalidSaltLen, DEFAULT_SALT_LEN};

/// Prefix of the environment variables read by [`HashSettings::load`],
/// e.g. `KANKRI_HASH_ALGORITHM=sha512`, `KANKRI_HASH_SALT_LEN=32`.
pub const HASH_ENV_PREFIX: &str = "KANKRI_HASH";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Config error: {0}")]
    Source(#[from] ::config::ConfigError),
    #[error("Invalid setting: {0}")]
    Invalid(String),
}

/// How the default hash maker salts and hashes passwords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashSettings {
    pub algorithm: HashAlgorithm,
    pub salt_len: usize,
}

impl Default for HashSettings {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::default(),
            salt_len: DEFAULT_SALT_LEN,
        }
    }
}

impl HashSettings {
    /// Defaults overridden by `KANKRI_HASH_*` environment variables.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(Environment::with_prefix(HASH_ENV_PREFIX))
    }

    pub fn load_from(env: Environment) -> Result<Self, SettingsError> {
        let cfg = Config::builder()
            .set_default("algorithm", HashAlgorithm::default().name())?
            .set_default("salt_len", DEFAULT_SALT_LEN as u64)?
            .add_source(env.try_parsing(true))
            .build()?;

        let settings: Self = cfg.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        DigestHashMaker::try_from(self)
            .map(drop)
            .map_err(|e| SettingsError::Invalid(e.to_string()))
    }
}

impl TryFrom<&HashSettings> for DigestHashMaker {
    type Error = InvalidSaltLen;

    fn try_from(settings: &HashSettings) -> Result<Self, Self::Error> {
        DigestHashMaker::new(settings.algorithm, settings.salt_len)
    }
}
