use crate::Result;
use crate::popular::BatchPolicy;
use camino::{Utf8Path, Utf8PathBuf};
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// Name of the configuration file looked up when no explicit path is given
pub const CONFIG_FILE_NAME: &str = "popular.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Number of applications queried concurrently, which is also the batch size
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Pause between two consecutive batches
    #[serde(default = "default_batch_delay", with = "humantime_serde")]
    pub batch_delay: Duration,

    /// Maximum time to wait for a single hosting service request
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,
}

const fn default_batch_size() -> usize {
    20
}

const fn default_batch_delay() -> Duration {
    Duration::from_secs(2)
}

const fn default_request_timeout() -> Duration {
    Duration::from_secs(60)
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// When `config_path` is `None`, `popular.toml` is looked up in `base_dir` and the
    /// defaults are used if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or holds invalid values
    pub fn load(base_dir: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading configuration file '{path}'"))?;
            (path.clone(), text)
        } else {
            let path = base_dir.join(CONFIG_FILE_NAME);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    return Ok(Self::default());
                }
                Err(e) => return Err(e).into_app_err_with(|| format!("reading configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate()?;

        Ok(config)
    }

    /// Save the default configuration to a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    /// The batching policy described by this configuration.
    #[must_use]
    pub const fn batch_policy(&self) -> BatchPolicy {
        BatchPolicy {
            size: self.batch_size,
            delay: self.batch_delay,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(app_err!("batch_size must be greater than zero"));
        }

        if self.request_timeout.is_zero() {
            return Err(app_err!("request_timeout must be greater than zero"));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            batch_delay: default_batch_delay(),
            request_timeout: default_request_timeout(),
        }
    }
}
