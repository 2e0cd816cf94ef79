//! Revision resolution tests

use tokio_test::{assert_err, assert_ok};

use codedeploy_provider::deploy::resolver::{appspec_sha256, build_request, resolve, ResolverOptions};
use codedeploy_provider::errors::ProviderError;
use codedeploy_provider::models::deployment::{BundleType, RevisionLocation, RevisionType};

use crate::fixtures::{
    appspec_revision, config, github_revision, revision_without_block, s3_revision, APPSPEC,
};

#[test]
fn test_resolve_s3() {
    let resolved = assert_ok!(resolve(&s3_revision(), &ResolverOptions::default()));
    match resolved {
        RevisionLocation::S3(s3) => {
            assert_eq!(s3.bucket, "artifacts");
            assert_eq!(s3.key, "web/release-42.zip");
            assert_eq!(s3.bundle_type, BundleType::Zip);
        }
        other => panic!("unexpected revision {:?}", other),
    }
}

#[test]
fn test_resolve_github() {
    let resolved = assert_ok!(resolve(&github_revision(), &ResolverOptions::default()));
    match resolved {
        RevisionLocation::GitHub(github) => {
            assert_eq!(github.repository, "acme/web");
            assert_eq!(github.commit_id, "4f2a9c1e");
        }
        other => panic!("unexpected revision {:?}", other),
    }
}

#[test]
fn test_resolve_appspec_computes_digest() {
    let resolved = assert_ok!(resolve(&appspec_revision(None), &ResolverOptions::default()));
    match resolved {
        RevisionLocation::AppSpecContent(appspec) => {
            assert_eq!(appspec.content, APPSPEC);
            assert_eq!(appspec.sha256, appspec_sha256(APPSPEC));
            assert_eq!(appspec.sha256.len(), 64);
        }
        other => panic!("unexpected revision {:?}", other),
    }
}

#[test]
fn test_resolve_appspec_passes_explicit_digest_through() {
    let resolved = assert_ok!(resolve(
        &appspec_revision(Some("not-a-real-digest")),
        &ResolverOptions::default()
    ));
    match resolved {
        RevisionLocation::AppSpecContent(appspec) => {
            assert_eq!(appspec.sha256, "not-a-real-digest");
        }
        other => panic!("unexpected revision {:?}", other),
    }
}

#[test]
fn test_resolve_missing_block() {
    for revision_type in RevisionType::ALL {
        let err = assert_err!(resolve(
            &revision_without_block(revision_type),
            &ResolverOptions::default()
        ));
        assert!(matches!(err, ProviderError::ValidationError(_)), "{:?}", err);
    }
}

#[test]
fn test_build_request_copies_config() {
    let mut declared = config(github_revision());
    declared.auto_rollback_enabled = false;

    let request = assert_ok!(build_request(&declared, &ResolverOptions::default()));

    assert_eq!(request.application_name, "web");
    assert_eq!(request.deployment_group_name, "web-prod");
    assert!(!request.auto_rollback_enabled);
    assert_eq!(request.revision.revision_type(), RevisionType::GitHub);
}
