//! Deployment service client

pub mod codedeploy;

use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::models::deployment::{DeploymentRecord, DeploymentRequest};

/// Remote operations the lifecycle controller depends on.
///
/// Every error is terminal for the calling step; retries and throttling
/// backoff belong to the implementation's transport.
#[async_trait]
pub trait DeploymentClient: Send + Sync {
    /// Create a deployment and return its id
    async fn submit(&self, request: &DeploymentRequest) -> Result<String, ProviderError>;

    /// Fetch the current state of a deployment
    async fn fetch_status(&self, deployment_id: &str) -> Result<DeploymentRecord, ProviderError>;

    /// Stop a deployment, optionally rolling the fleet back
    async fn stop(&self, deployment_id: &str, auto_rollback_enabled: bool)
        -> Result<(), ProviderError>;
}
