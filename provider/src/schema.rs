//! Provider and resource schema declarations

use resource_schema::{Attribute, Block, ProviderSchema, ResourceSchema, Timeouts, ValueType};
use serde_json::json;

use crate::models::deployment::{BundleType, RevisionType};

/// Resource type name of the deployment resource
pub const DEPLOYMENT_RESOURCE: &str = "codedeploy_deployment";

/// Provider configuration and resources
pub fn provider_schema() -> ProviderSchema {
    ProviderSchema::new()
        .attribute(
            Attribute::new("region", ValueType::String, "AWS region, defaults to AWS_REGION")
                .required(),
        )
        .resource(deployment_resource_schema())
}

/// Schema of `codedeploy_deployment`
pub fn deployment_resource_schema() -> ResourceSchema {
    let revision_types: Vec<&str> = RevisionType::ALL.iter().map(|t| t.as_str()).collect();
    let bundle_types: Vec<&str> = BundleType::ALL.iter().map(|t| t.as_str()).collect();

    let s3_location = Block::new("s3_location", "S3 location details for the revision")
        .max_items(1)
        .attribute(
            Attribute::new("bucket", ValueType::String, "Name of the S3 bucket").required(),
        )
        .attribute(Attribute::new("key", ValueType::String, "Key of the S3 object").required())
        .attribute(
            Attribute::new("bundle_type", ValueType::String, "Type of the revision bundle")
                .required()
                .one_of(&bundle_types),
        );

    let github_location = Block::new("github_location", "GitHub location details for the revision")
        .max_items(1)
        .attribute(
            Attribute::new("repository", ValueType::String, "Name of the GitHub repository")
                .required(),
        )
        .attribute(
            Attribute::new("commit_id", ValueType::String, "Commit ID of the revision").required(),
        );

    let appspec_content = Block::new("appspec_content", "Inline AppSpec content for the revision")
        .max_items(1)
        .attribute(
            Attribute::new(
                "content",
                ValueType::String,
                "The YAML-formatted or JSON-formatted revision string",
            )
            .required(),
        )
        .attribute(Attribute::new(
            "sha256",
            ValueType::String,
            "SHA-256 of the content; computed when omitted",
        ));

    let revision = Block::new("revision", "Revision details for the deployment")
        .required()
        .force_new()
        .max_items(1)
        .attribute(
            Attribute::new("revision_type", ValueType::String, "Type of the revision")
                .required()
                .one_of(&revision_types),
        )
        .block(s3_location)
        .block(github_location)
        .block(appspec_content);

    ResourceSchema::new(DEPLOYMENT_RESOURCE, "Runs a CodeDeploy deployment and tracks its status")
        .attribute(
            Attribute::new(
                "application_name",
                ValueType::String,
                "Name of the CodeDeploy application",
            )
            .required()
            .force_new(),
        )
        .attribute(
            Attribute::new(
                "deployment_group_name",
                ValueType::String,
                "Name of the CodeDeploy deployment group",
            )
            .required()
            .force_new(),
        )
        .attribute(
            Attribute::new(
                "auto_rollback_enabled",
                ValueType::Bool,
                "Roll the fleet back when this resource stops an unfinished deployment",
            )
            .default_value(json!(true)),
        )
        .attribute(
            Attribute::new("deployment_status", ValueType::String, "Status of the deployment")
                .computed(),
        )
        .block(revision)
        .timeouts(Timeouts {
            create: Some(60 * 60),
            ..Default::default()
        })
}
