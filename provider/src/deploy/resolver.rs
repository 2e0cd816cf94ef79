//! Revision resolution
//!
//! Turns the declared `revision` block into the canonical
//! [`RevisionLocation`] sent to the service. Dispatch is on `revision_type`
//! alone; location blocks for other types are ignored.

use crate::errors::ProviderError;
use crate::models::deployment::{
    AppSpecContent, DeploymentRequest, GitHubLocation, RevisionLocation, RevisionType, S3Location,
};
use crate::models::resource::{AppSpecContentBlock, ResourceConfig, RevisionBlock};
use crate::utils::sha256_hex;

/// Resolver settings
#[derive(Debug, Clone, Default)]
pub struct ResolverOptions {
    /// Reject an explicit AppSpec digest that does not match its content.
    /// Off by default: a supplied digest is passed through untouched.
    pub verify_appspec_sha256: bool,
}

/// Digest used for inline AppSpec content
pub fn appspec_sha256(content: &str) -> String {
    sha256_hex(content.as_bytes())
}

/// Resolve the declared revision block
pub fn resolve(
    block: &RevisionBlock,
    options: &ResolverOptions,
) -> Result<RevisionLocation, ProviderError> {
    match block.revision_type {
        RevisionType::S3 => {
            let s3 = block
                .s3_location
                .as_ref()
                .ok_or_else(|| missing_block(block.revision_type, "s3_location"))?;
            Ok(RevisionLocation::S3(S3Location {
                bucket: s3.bucket.clone(),
                key: s3.key.clone(),
                bundle_type: s3.bundle_type,
            }))
        }
        RevisionType::GitHub => {
            let github = block
                .github_location
                .as_ref()
                .ok_or_else(|| missing_block(block.revision_type, "github_location"))?;
            Ok(RevisionLocation::GitHub(GitHubLocation {
                repository: github.repository.clone(),
                commit_id: github.commit_id.clone(),
            }))
        }
        RevisionType::AppSpecContent => {
            let appspec = block
                .appspec_content
                .as_ref()
                .ok_or_else(|| missing_block(block.revision_type, "appspec_content"))?;
            resolve_appspec(appspec, options).map(RevisionLocation::AppSpecContent)
        }
    }
}

fn resolve_appspec(
    block: &AppSpecContentBlock,
    options: &ResolverOptions,
) -> Result<AppSpecContent, ProviderError> {
    let sha256 = match block.sha256.as_deref() {
        Some(supplied) if !supplied.is_empty() => {
            if options.verify_appspec_sha256 {
                let actual = appspec_sha256(&block.content);
                if !supplied.eq_ignore_ascii_case(&actual) {
                    return Err(ProviderError::ValidationError(format!(
                        "appspec_content.sha256 {} does not match content digest {}",
                        supplied, actual
                    )));
                }
            }
            supplied.to_string()
        }
        _ => appspec_sha256(&block.content),
    };

    Ok(AppSpecContent {
        content: block.content.clone(),
        sha256,
    })
}

fn missing_block(revision_type: RevisionType, block: &str) -> ProviderError {
    ProviderError::ValidationError(format!(
        "revision_type {} requires a {} block",
        revision_type, block
    ))
}

/// Build the submission payload for a declared resource
pub fn build_request(
    config: &ResourceConfig,
    options: &ResolverOptions,
) -> Result<DeploymentRequest, ProviderError> {
    Ok(DeploymentRequest {
        application_name: config.application_name.clone(),
        deployment_group_name: config.deployment_group_name.clone(),
        revision: resolve(&config.revision, options)?,
        auto_rollback_enabled: config.auto_rollback_enabled,
    })
}
