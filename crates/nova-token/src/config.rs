//! Codec defaults, optionally loaded from environment variables.
//!
//! Keys are never part of the configuration; they are passed on every call.
//!
//! | Variable                     | Values                        | Default        |
//! |------------------------------|-------------------------------|----------------|
//! | `NOVA_TOKEN_MODE`            | `encrypted`, `sign_only`      | `encrypted`    |
//! | `NOVA_TOKEN_TIMEOUT_MINUTES` | minutes, `0` = never expires  | `0`            |
//! | `NOVA_TOKEN_IV_SOURCE`       | `key_derived`, `random`       | `key_derived`  |

use serde::Deserialize;

use crate::codec::Mode;
use crate::crypto::IvSource;
use crate::error::ConfigError;

/// Prefix shared by every environment variable read by [`Settings::from_env`].
pub const ENV_PREFIX: &str = "NOVA_TOKEN";

/// Defaults applied by [`TokenCodec::encode`](crate::TokenCodec::encode) and
/// [`TokenCodec::decode`](crate::TokenCodec::decode).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Whether bodies are encrypted or only signed.
    #[serde(default)]
    pub mode: Mode,

    /// Lifetime stamped into new tokens, in minutes. `0` disables expiry.
    #[serde(default)]
    pub timeout_minutes: u32,

    /// How the CBC IV is chosen for encrypted bodies.
    #[serde(default)]
    pub iv_source: IvSource,
}

impl Settings {
    /// Load and validate settings from `NOVA_TOKEN_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or the combination is
    /// contradictory.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(config::Environment::with_prefix(ENV_PREFIX))
    }

    fn from_source(env: config::Environment) -> Result<Self, ConfigError> {
        let cfg = config::Config::builder()
            .add_source(env.try_parsing(true))
            .build()?;

        let s: Settings = cfg.try_deserialize()?;
        s.validate()?;
        Ok(s)
    }

    /// Reject combinations that cannot describe a working codec.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mode == Mode::SignOnly && self.iv_source == IvSource::Random {
            return Err(ConfigError::Invalid(
                "NOVA_TOKEN_IV_SOURCE=random requires NOVA_TOKEN_MODE=encrypted".into(),
            ));
        }
        Ok(())
    }
}
