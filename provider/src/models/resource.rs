//! Declared configuration and persisted state of the `codedeploy_deployment`
//! resource

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::models::deployment::{BundleType, DeploymentRecord, RevisionLocation, RevisionType};

/// Nested blocks arrive either as a bare object or, as the host encodes
/// them, as a list holding at most one object.
#[derive(Deserialize)]
#[serde(untagged)]
enum BlockList<T> {
    One(T),
    Many(Vec<T>),
}

fn single_block<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    match BlockList::<T>::deserialize(deserializer)? {
        BlockList::One(block) => Ok(block),
        BlockList::Many(mut blocks) if blocks.len() == 1 => Ok(blocks.remove(0)),
        BlockList::Many(blocks) => Err(de::Error::invalid_length(
            blocks.len(),
            &"exactly one block",
        )),
    }
}

fn optional_block<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    match Option::<BlockList<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BlockList::One(block)) => Ok(Some(block)),
        Some(BlockList::Many(mut blocks)) => match blocks.len() {
            0 => Ok(None),
            1 => Ok(Some(blocks.remove(0))),
            n => Err(de::Error::invalid_length(n, &"at most one block")),
        },
    }
}

fn default_true() -> bool {
    true
}

/// `s3_location` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3LocationBlock {
    pub bucket: String,
    pub key: String,
    pub bundle_type: BundleType,
}

/// `github_location` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubLocationBlock {
    pub repository: String,
    pub commit_id: String,
}

/// `appspec_content` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSpecContentBlock {
    pub content: String,

    /// Digest of `content`; computed on submission when unset or empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

/// `revision` block: the discriminator plus up to three location blocks.
/// Only the block named by `revision_type` is ever read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionBlock {
    pub revision_type: RevisionType,

    #[serde(
        default,
        deserialize_with = "optional_block",
        skip_serializing_if = "Option::is_none"
    )]
    pub s3_location: Option<S3LocationBlock>,

    #[serde(
        default,
        deserialize_with = "optional_block",
        skip_serializing_if = "Option::is_none"
    )]
    pub github_location: Option<GitHubLocationBlock>,

    #[serde(
        default,
        deserialize_with = "optional_block",
        skip_serializing_if = "Option::is_none"
    )]
    pub appspec_content: Option<AppSpecContentBlock>,
}

/// `timeouts` block, values in seconds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTimeouts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create: Option<u64>,
}

impl ResourceTimeouts {
    pub fn create_timeout(&self) -> Option<Duration> {
        self.create.map(Duration::from_secs)
    }
}

/// Declared configuration of one deployment resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceConfig {
    pub application_name: String,

    pub deployment_group_name: String,

    #[serde(deserialize_with = "single_block")]
    pub revision: RevisionBlock,

    #[serde(default = "default_true")]
    pub auto_rollback_enabled: bool,

    #[serde(default)]
    pub timeouts: ResourceTimeouts,
}

impl ResourceConfig {
    /// Parse the declared configuration JSON handed over by the host
    pub fn parse(json: &str) -> Result<Self, ProviderError> {
        let config: ResourceConfig = serde_json::from_str(json)
            .map_err(|e| ProviderError::ValidationError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the schema cannot express through types alone
    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.application_name.trim().is_empty() {
            return Err(ProviderError::ValidationError(
                "application_name must not be empty".to_string(),
            ));
        }
        if self.deployment_group_name.trim().is_empty() {
            return Err(ProviderError::ValidationError(
                "deployment_group_name must not be empty".to_string(),
            ));
        }
        if self.timeouts.create == Some(0) {
            return Err(ProviderError::ValidationError(
                "timeouts.create must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Names of replace-only attributes that differ between `self` and
    /// `desired`
    pub fn replacement_fields(&self, desired: &ResourceConfig) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.application_name != desired.application_name {
            fields.push("application_name");
        }
        if self.deployment_group_name != desired.deployment_group_name {
            fields.push("deployment_group_name");
        }
        if self.revision != desired.revision {
            fields.push("revision");
        }
        fields
    }
}

/// Persisted state of one deployment resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceState {
    /// Deployment id; the only key used after creation
    pub id: String,

    /// Configuration the resource was created or last updated with
    pub config: ResourceConfig,

    /// Revision as submitted, including any computed AppSpec digest
    pub revision: RevisionLocation,

    /// Last observed remote status, verbatim
    pub deployment_status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_observed_at: Option<DateTime<Utc>>,
}

impl ResourceState {
    pub fn new(config: ResourceConfig, revision: RevisionLocation, record: &DeploymentRecord) -> Self {
        Self {
            id: record.deployment_id.clone(),
            config,
            revision,
            deployment_status: record.status.as_str().to_string(),
            error_message: record.error_message.clone(),
            last_observed_at: None,
        }
    }
}
