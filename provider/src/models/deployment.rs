//! Deployment models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Revision location discriminator, as named by the CodeDeploy API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RevisionType {
    S3,
    GitHub,
    AppSpecContent,
}

impl RevisionType {
    /// Every supported revision type
    pub const ALL: [RevisionType; 3] = [
        RevisionType::S3,
        RevisionType::GitHub,
        RevisionType::AppSpecContent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RevisionType::S3 => "S3",
            RevisionType::GitHub => "GitHub",
            RevisionType::AppSpecContent => "AppSpecContent",
        }
    }
}

impl std::fmt::Display for RevisionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Archive format of an S3 revision bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundleType {
    Zip,
    Tar,
}

impl BundleType {
    pub const ALL: [BundleType; 2] = [BundleType::Zip, BundleType::Tar];

    pub fn as_str(&self) -> &'static str {
        match self {
            BundleType::Zip => "zip",
            BundleType::Tar => "tar",
        }
    }
}

/// Revision stored as an object in S3
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Location {
    pub bucket: String,
    pub key: String,
    pub bundle_type: BundleType,
}

/// Revision stored as a commit in a GitHub repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubLocation {
    pub repository: String,
    pub commit_id: String,
}

/// Inline AppSpec document with its SHA-256 digest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSpecContent {
    pub content: String,
    pub sha256: String,
}

/// Canonical revision descriptor. Exactly one location is ever populated and
/// the serialized `revision_type` tag always matches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "revision_type")]
pub enum RevisionLocation {
    S3(S3Location),
    GitHub(GitHubLocation),
    AppSpecContent(AppSpecContent),
}

impl RevisionLocation {
    pub fn revision_type(&self) -> RevisionType {
        match self {
            RevisionLocation::S3(_) => RevisionType::S3,
            RevisionLocation::GitHub(_) => RevisionType::GitHub,
            RevisionLocation::AppSpecContent(_) => RevisionType::AppSpecContent,
        }
    }
}

/// Submission payload for a new deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRequest {
    pub application_name: String,
    pub deployment_group_name: String,
    pub revision: RevisionLocation,

    /// Rollback flag used for any stop issued on behalf of this request
    pub auto_rollback_enabled: bool,
}

/// Remote deployment status.
///
/// Statuses this crate does not know about are kept verbatim in `Unknown` so
/// that new values introduced by the service never break a read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeploymentStatus {
    Created,
    Queued,
    InProgress,
    Baking,
    Ready,
    Succeeded,
    Failed,
    Stopped,
    Unknown(String),
}

impl DeploymentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            DeploymentStatus::Created => "Created",
            DeploymentStatus::Queued => "Queued",
            DeploymentStatus::InProgress => "InProgress",
            DeploymentStatus::Baking => "Baking",
            DeploymentStatus::Ready => "Ready",
            DeploymentStatus::Succeeded => "Succeeded",
            DeploymentStatus::Failed => "Failed",
            DeploymentStatus::Stopped => "Stopped",
            DeploymentStatus::Unknown(raw) => raw,
        }
    }

    /// No further transition happens from a terminal status
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DeploymentStatus::Succeeded | DeploymentStatus::Failed | DeploymentStatus::Stopped
        )
    }
}

impl From<&str> for DeploymentStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "Created" => DeploymentStatus::Created,
            "Queued" => DeploymentStatus::Queued,
            "InProgress" => DeploymentStatus::InProgress,
            "Baking" => DeploymentStatus::Baking,
            "Ready" => DeploymentStatus::Ready,
            "Succeeded" => DeploymentStatus::Succeeded,
            "Failed" => DeploymentStatus::Failed,
            "Stopped" => DeploymentStatus::Stopped,
            other => DeploymentStatus::Unknown(other.to_string()),
        }
    }
}

impl std::fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DeploymentStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DeploymentStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(DeploymentStatus::from(s.as_str()))
    }
}

/// One remote deployment as last observed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    /// Identifier assigned by the service
    pub deployment_id: String,

    pub status: DeploymentStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_group_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complete_time: Option<DateTime<Utc>>,

    /// Service-reported reason for a failed or stopped deployment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl DeploymentRecord {
    /// Record carrying only an id and a status
    pub fn new(deployment_id: impl Into<String>, status: DeploymentStatus) -> Self {
        Self {
            deployment_id: deployment_id.into(),
            status,
            application_name: None,
            deployment_group_name: None,
            create_time: None,
            complete_time: None,
            error_message: None,
        }
    }
}
