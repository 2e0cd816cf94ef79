//! AWS CodeDeploy implementation of [`DeploymentClient`]

use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_codedeploy::error::DisplayErrorContext;
use aws_sdk_codedeploy::types as sdk;
use aws_sdk_codedeploy::Client;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::app::options::AwsOptions;
use crate::client::DeploymentClient;
use crate::errors::ProviderError;
use crate::models::deployment::{
    DeploymentRecord, DeploymentRequest, DeploymentStatus, RevisionLocation,
};

/// CodeDeploy client backed by the AWS SDK
pub struct CodeDeployClient {
    client: Client,
}

impl CodeDeployClient {
    /// Build a client from the ambient credential chain, the configured
    /// region and adaptive retry mode
    pub async fn new(options: &AwsOptions) -> Result<Self, ProviderError> {
        if options.region.trim().is_empty() {
            return Err(ProviderError::ConfigError("region must not be empty".to_string()));
        }

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(options.region.clone()))
            .retry_config(RetryConfig::adaptive());

        if let Some(endpoint) = &options.endpoint_url {
            info!("Using CodeDeploy endpoint override {}", endpoint);
            loader = loader.endpoint_url(endpoint.as_str());
        }

        let sdk_config = loader.load().await;
        Ok(Self::with_sdk_config(&sdk_config))
    }

    /// Build a client from an already loaded SDK configuration
    pub fn with_sdk_config(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl DeploymentClient for CodeDeployClient {
    async fn submit(&self, request: &DeploymentRequest) -> Result<String, ProviderError> {
        debug!(
            "CreateDeployment {}/{} ({})",
            request.application_name,
            request.deployment_group_name,
            request.revision.revision_type()
        );

        let output = self
            .client
            .create_deployment()
            .application_name(&request.application_name)
            .deployment_group_name(&request.deployment_group_name)
            .revision(to_sdk_revision(&request.revision))
            .send()
            .await
            .map_err(|e| ProviderError::SubmitError(DisplayErrorContext(&e).to_string()))?;

        output
            .deployment_id()
            .map(str::to_string)
            .ok_or_else(|| {
                ProviderError::SubmitError("response carried no deployment id".to_string())
            })
    }

    async fn fetch_status(&self, deployment_id: &str) -> Result<DeploymentRecord, ProviderError> {
        debug!("GetDeployment {}", deployment_id);

        let output = self
            .client
            .get_deployment()
            .deployment_id(deployment_id)
            .send()
            .await
            .map_err(|e| ProviderError::FetchError(DisplayErrorContext(&e).to_string()))?;

        let info = output.deployment_info().ok_or_else(|| {
            ProviderError::FetchError(format!("no deployment info returned for {}", deployment_id))
        })?;

        Ok(DeploymentRecord {
            deployment_id: info.deployment_id().unwrap_or(deployment_id).to_string(),
            status: info
                .status()
                .map(|status| DeploymentStatus::from(status.as_str()))
                .unwrap_or_else(|| DeploymentStatus::Unknown(String::new())),
            application_name: info.application_name().map(str::to_string),
            deployment_group_name: info.deployment_group_name().map(str::to_string),
            create_time: info.create_time().and_then(to_utc),
            complete_time: info.complete_time().and_then(to_utc),
            error_message: info
                .error_information()
                .and_then(|e| e.message())
                .map(str::to_string),
        })
    }

    async fn stop(
        &self,
        deployment_id: &str,
        auto_rollback_enabled: bool,
    ) -> Result<(), ProviderError> {
        debug!(
            "StopDeployment {} (auto rollback: {})",
            deployment_id, auto_rollback_enabled
        );

        let output = self
            .client
            .stop_deployment()
            .deployment_id(deployment_id)
            .auto_rollback_enabled(auto_rollback_enabled)
            .send()
            .await
            .map_err(|e| ProviderError::StopError(DisplayErrorContext(&e).to_string()))?;

        info!(
            "Stop requested for {}: {} {}",
            deployment_id,
            output.status().map(|s| s.as_str()).unwrap_or("unknown"),
            output.status_message().unwrap_or_default()
        );
        Ok(())
    }
}

fn to_sdk_revision(revision: &RevisionLocation) -> sdk::RevisionLocation {
    let builder = sdk::RevisionLocation::builder()
        .revision_type(sdk::RevisionLocationType::from(revision.revision_type().as_str()));

    match revision {
        RevisionLocation::S3(s3) => builder
            .s3_location(
                sdk::S3Location::builder()
                    .bucket(&s3.bucket)
                    .key(&s3.key)
                    .bundle_type(sdk::BundleType::from(s3.bundle_type.as_str()))
                    .build(),
            )
            .build(),
        RevisionLocation::GitHub(github) => builder
            .git_hub_location(
                sdk::GitHubLocation::builder()
                    .repository(&github.repository)
                    .commit_id(&github.commit_id)
                    .build(),
            )
            .build(),
        RevisionLocation::AppSpecContent(appspec) => builder
            .app_spec_content(
                sdk::AppSpecContent::builder()
                    .content(&appspec.content)
                    .sha256(&appspec.sha256)
                    .build(),
            )
            .build(),
    }
}

fn to_utc(time: &aws_sdk_codedeploy::primitives::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(time.secs(), time.subsec_nanos())
}
