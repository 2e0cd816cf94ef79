//! Provider configuration options

use url::Url;

use crate::deploy::controller::ControllerOptions;
use crate::logs::LogOptions;

/// Main provider options
#[derive(Debug, Clone)]
pub struct ProviderOptions {
    /// AWS client configuration
    pub aws: AwsOptions,

    /// Lifecycle controller configuration
    pub controller: ControllerOptions,

    /// Logging configuration
    pub logging: LogOptions,
}

/// Options used once to construct the CodeDeploy client
#[derive(Debug, Clone)]
pub struct AwsOptions {
    /// AWS region
    pub region: String,

    /// Endpoint override, e.g. a local emulator
    pub endpoint_url: Option<Url>,
}
