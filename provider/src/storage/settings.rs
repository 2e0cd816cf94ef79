//! Settings file management

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::app::options::{AwsOptions, ProviderOptions};
use crate::deploy::controller::ControllerOptions;
use crate::deploy::resolver::ResolverOptions;
use crate::deploy::waiter::WaitOptions;
use crate::errors::ProviderError;
use crate::filesys::file::File;
use crate::logs::{LogLevel, LogOptions};

/// Environment variable consulted when no region is configured
pub const REGION_ENV_VAR: &str = "AWS_REGION";

/// Provider settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Directory for rolling log files
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Emit JSON logs on stderr
    #[serde(default)]
    pub json_logs: bool,

    /// AWS configuration
    #[serde(default)]
    pub aws: AwsSettings,

    /// Create wait configuration
    #[serde(default)]
    pub wait: WaitSettings,

    /// Reject explicit AppSpec digests that do not match their content
    #[serde(default)]
    pub verify_appspec_sha256: bool,
}

/// AWS settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AwsSettings {
    /// Region; falls back to `AWS_REGION`
    #[serde(default)]
    pub region: Option<String>,

    /// Endpoint override
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

/// Wait settings, in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitSettings {
    #[serde(default = "default_create_timeout")]
    pub create_timeout_secs: u64,

    #[serde(default = "default_poll_min_delay")]
    pub poll_min_delay_secs: u64,

    #[serde(default = "default_poll_max_delay")]
    pub poll_max_delay_secs: u64,
}

fn default_create_timeout() -> u64 {
    60 * 60
}

fn default_poll_min_delay() -> u64 {
    5
}

fn default_poll_max_delay() -> u64 {
    15
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self {
            create_timeout_secs: default_create_timeout(),
            poll_min_delay_secs: default_poll_min_delay(),
            poll_max_delay_secs: default_poll_max_delay(),
        }
    }
}

impl Settings {
    /// Read settings, falling back to defaults when the file does not exist
    pub async fn load(file: &File) -> Result<Self, ProviderError> {
        if !file.exists().await {
            return Ok(Self::default());
        }
        file.read_json().await
    }

    /// Region from settings, else from `env_region`
    pub fn resolve_region(&self, env_region: Option<String>) -> Result<String, ProviderError> {
        self.aws
            .region
            .clone()
            .or(env_region)
            .map(|region| region.trim().to_string())
            .filter(|region| !region.is_empty())
            .ok_or_else(|| {
                ProviderError::ConfigError(format!(
                    "region is required: set aws.region or {}",
                    REGION_ENV_VAR
                ))
            })
    }

    /// Build provider options, reading `AWS_REGION` from the environment
    pub fn provider_options(&self) -> Result<ProviderOptions, ProviderError> {
        self.provider_options_with_env(std::env::var(REGION_ENV_VAR).ok())
    }

    /// Build provider options with an explicit fallback region
    pub fn provider_options_with_env(
        &self,
        env_region: Option<String>,
    ) -> Result<ProviderOptions, ProviderError> {
        let region = self.resolve_region(env_region)?;

        let endpoint_url = match &self.aws.endpoint_url {
            Some(raw) => Some(Url::parse(raw).map_err(|e| {
                ProviderError::ConfigError(format!("invalid endpoint_url {}: {}", raw, e))
            })?),
            None => None,
        };

        if self.wait.create_timeout_secs == 0 {
            return Err(ProviderError::ConfigError(
                "wait.create_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.wait.poll_min_delay_secs == 0 {
            return Err(ProviderError::ConfigError(
                "wait.poll_min_delay_secs must be greater than zero".to_string(),
            ));
        }
        if self.wait.poll_max_delay_secs == 0 {
            return Err(ProviderError::ConfigError(
                "wait.poll_max_delay_secs must be greater than zero".to_string(),
            ));
        }

        Ok(ProviderOptions {
            aws: AwsOptions {
                region,
                endpoint_url,
            },
            controller: ControllerOptions {
                wait: WaitOptions {
                    timeout: Duration::from_secs(self.wait.create_timeout_secs),
                    min_delay: Duration::from_secs(self.wait.poll_min_delay_secs),
                    max_delay: Duration::from_secs(self.wait.poll_max_delay_secs),
                },
                resolver: ResolverOptions {
                    verify_appspec_sha256: self.verify_appspec_sha256,
                },
            },
            logging: LogOptions {
                log_level: self.log_level.clone(),
                log_dir: self.log_dir.clone(),
                json_format: self.json_logs,
            },
        })
    }
}
