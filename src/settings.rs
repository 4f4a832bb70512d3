use crate::error::{ConversionError, Result};
use crate::utils::constants::{
    DEFAULT_DIRECTION, DEFAULT_ECHO_INPUT, DEFAULT_INPUT_FILENAME, DEFAULT_LOCAL_PIPELINE,
    DEFAULT_MODE, DEFAULT_RESPONSE_ENCODING, DEFAULT_STEP_TIMEOUT_SECS, DEFAULT_ZONE, ENV_PREFIX,
};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Runtime settings: built-in defaults, then an optional settings file, then
/// `TRACK_DATUM__*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub authority: AuthoritySettings,
    pub local: LocalSettings,
}

/// How to reach and drive the web conversion service
#[derive(Debug, Clone, Deserialize)]
pub struct AuthoritySettings {
    pub base_url: String,
    pub direction: String,
    pub mode: String,
    pub zone: String,
    pub echo_input: String,
    pub input_filename: String,
    pub response_encoding: String,
    pub step_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocalSettings {
    /// geodesy operator definition applied to each point
    pub pipeline: String,
}

impl Settings {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("authority.base_url", "")?
            .set_default("authority.direction", DEFAULT_DIRECTION)?
            .set_default("authority.mode", DEFAULT_MODE)?
            .set_default("authority.zone", DEFAULT_ZONE)?
            .set_default("authority.echo_input", DEFAULT_ECHO_INPUT)?
            .set_default("authority.input_filename", DEFAULT_INPUT_FILENAME)?
            .set_default("authority.response_encoding", DEFAULT_RESPONSE_ENCODING)?
            .set_default("authority.step_timeout_secs", DEFAULT_STEP_TIMEOUT_SECS as i64)?
            .set_default("local.pipeline", DEFAULT_LOCAL_PIPELINE)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings: Settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }
}

impl AuthoritySettings {
    pub fn step_timeout(&self) -> Duration {
        Duration::from_secs(self.step_timeout_secs)
    }

    /// Base URL without a trailing slash; fails if none was configured
    pub fn base_url(&self) -> Result<&str> {
        let base = self.base_url.trim().trim_end_matches('/');
        if base.is_empty() {
            return Err(ConversionError::Config(
                "authority.base_url is not set (use a settings file or TRACK_DATUM__AUTHORITY__BASE_URL)"
                    .to_string(),
            ));
        }
        Ok(base)
    }
}

impl Default for AuthoritySettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            direction: DEFAULT_DIRECTION.to_string(),
            mode: DEFAULT_MODE.to_string(),
            zone: DEFAULT_ZONE.to_string(),
            echo_input: DEFAULT_ECHO_INPUT.to_string(),
            input_filename: DEFAULT_INPUT_FILENAME.to_string(),
            response_encoding: DEFAULT_RESPONSE_ENCODING.to_string(),
            step_timeout_secs: DEFAULT_STEP_TIMEOUT_SECS,
        }
    }
}

impl Default for LocalSettings {
    fn default() -> Self {
        Self {
            pipeline: DEFAULT_LOCAL_PIPELINE.to_string(),
        }
    }
}
