//! Shared test fixtures

use std::sync::Arc;
use std::time::Duration;

use codedeploy_provider::deploy::controller::{ControllerOptions, DeploymentController};
use codedeploy_provider::deploy::resolver::ResolverOptions;
use codedeploy_provider::deploy::waiter::WaitOptions;
use codedeploy_provider::models::deployment::{BundleType, RevisionType};
use codedeploy_provider::models::resource::{
    AppSpecContentBlock, GitHubLocationBlock, ResourceConfig, ResourceTimeouts, RevisionBlock,
    S3LocationBlock,
};

use crate::mock::ScriptedClient;

pub const APPSPEC: &str = "version: 0.0\nos: linux\n";

/// Wait options scaled down to milliseconds
pub fn fast_wait(timeout_ms: u64) -> WaitOptions {
    WaitOptions {
        timeout: Duration::from_millis(timeout_ms),
        min_delay: Duration::from_millis(5),
        max_delay: Duration::from_millis(20),
    }
}

pub fn controller(client: Arc<ScriptedClient>, timeout_ms: u64) -> DeploymentController {
    DeploymentController::new(
        client,
        ControllerOptions {
            wait: fast_wait(timeout_ms),
            resolver: ResolverOptions::default(),
        },
    )
}

fn empty_revision(revision_type: RevisionType) -> RevisionBlock {
    RevisionBlock {
        revision_type,
        s3_location: None,
        github_location: None,
        appspec_content: None,
    }
}

pub fn s3_revision() -> RevisionBlock {
    RevisionBlock {
        s3_location: Some(S3LocationBlock {
            bucket: "artifacts".to_string(),
            key: "web/release-42.zip".to_string(),
            bundle_type: BundleType::Zip,
        }),
        ..empty_revision(RevisionType::S3)
    }
}

pub fn github_revision() -> RevisionBlock {
    RevisionBlock {
        github_location: Some(GitHubLocationBlock {
            repository: "acme/web".to_string(),
            commit_id: "4f2a9c1e".to_string(),
        }),
        ..empty_revision(RevisionType::GitHub)
    }
}

pub fn appspec_revision(sha256: Option<&str>) -> RevisionBlock {
    RevisionBlock {
        appspec_content: Some(AppSpecContentBlock {
            content: APPSPEC.to_string(),
            sha256: sha256.map(str::to_string),
        }),
        ..empty_revision(RevisionType::AppSpecContent)
    }
}

/// Revision declaring a type without its matching block
pub fn revision_without_block(revision_type: RevisionType) -> RevisionBlock {
    empty_revision(revision_type)
}

pub fn config(revision: RevisionBlock) -> ResourceConfig {
    ResourceConfig {
        application_name: "web".to_string(),
        deployment_group_name: "web-prod".to_string(),
        revision,
        auto_rollback_enabled: true,
        timeouts: ResourceTimeouts::default(),
    }
}
