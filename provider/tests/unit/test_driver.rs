//! Single-resource driver tests over real files

use std::path::PathBuf;
use std::sync::Arc;

use codedeploy_provider::app::run::{run, Operation, ResourceFiles};
use codedeploy_provider::deploy::waiter::never_cancel;
use codedeploy_provider::errors::ProviderError;
use codedeploy_provider::filesys::file::File;
use codedeploy_provider::models::deployment::DeploymentStatus;
use codedeploy_provider::models::resource::ResourceState;

use crate::fixtures::{config, controller, s3_revision};
use crate::mock::{FetchStep, ScriptedClient};

struct Workspace {
    root: PathBuf,
}

impl Workspace {
    fn new(name: &str) -> Self {
        let root = std::env::temp_dir().join(format!(
            "codedeploy-provider-{}-{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(&root).unwrap();
        Self { root }
    }

    fn files(&self) -> ResourceFiles {
        ResourceFiles {
            config: Some(File::new(self.root.join("config.json"))),
            state: File::new(self.root.join("state.json")),
        }
    }

    fn write_config(&self, json: &str) {
        std::fs::write(self.root.join("config.json"), json).unwrap();
    }

    fn state_exists(&self) -> bool {
        self.root.join("state.json").exists()
    }

    fn read_state(&self) -> ResourceState {
        let raw = std::fs::read_to_string(self.root.join("state.json")).unwrap();
        serde_json::from_str(&raw).unwrap()
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

fn declared_json() -> String {
    serde_json::to_string(&config(s3_revision())).unwrap()
}

#[tokio::test]
async fn test_full_lifecycle() {
    let ws = Workspace::new("lifecycle");
    ws.write_config(&declared_json());
    let client = Arc::new(ScriptedClient::new("d-123").with_statuses(&[
        DeploymentStatus::InProgress,
        DeploymentStatus::Succeeded,
    ]));
    let controller = controller(client.clone(), 1_000);
    let files = ws.files();

    let diags = run(Operation::Create, &controller, &files, never_cancel())
        .await
        .unwrap();
    assert!(diags.is_empty());
    let state = ws.read_state();
    assert_eq!(state.id, "d-123");
    assert_eq!(state.deployment_status, "Succeeded");

    let diags = run(Operation::Read, &controller, &files, never_cancel())
        .await
        .unwrap();
    assert!(diags.is_empty());
    assert_eq!(ws.read_state().id, "d-123");

    let mut changed = config(s3_revision());
    changed.auto_rollback_enabled = false;
    ws.write_config(&serde_json::to_string(&changed).unwrap());
    let diags = run(Operation::Update, &controller, &files, never_cancel())
        .await
        .unwrap();
    assert!(diags.is_empty());
    assert!(!ws.read_state().config.auto_rollback_enabled);

    let diags = run(Operation::Delete, &controller, &files, never_cancel())
        .await
        .unwrap();
    assert!(diags.is_empty());
    assert!(!ws.state_exists());
    assert!(client.stops().is_empty());
}

#[tokio::test]
async fn test_failed_create_writes_no_state() {
    let ws = Workspace::new("failed-create");
    ws.write_config(&declared_json());
    let client = Arc::new(ScriptedClient::new("d-456").with_statuses(&[DeploymentStatus::Failed]));

    let diags = run(
        Operation::Create,
        &controller(client, 1_000),
        &ws.files(),
        never_cancel(),
    )
    .await
    .unwrap();

    assert!(diags.has_error());
    assert!(!ws.state_exists());
}

#[tokio::test]
async fn test_create_refuses_existing_state() {
    let ws = Workspace::new("existing-state");
    ws.write_config(&declared_json());
    let client = Arc::new(ScriptedClient::new("d-123").with_statuses(&[DeploymentStatus::Succeeded]));
    let controller = controller(client.clone(), 1_000);

    run(Operation::Create, &controller, &ws.files(), never_cancel())
        .await
        .unwrap();
    let err = run(Operation::Create, &controller, &ws.files(), never_cancel())
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::ConfigError(_)), "{:?}", err);
    assert_eq!(client.submitted().len(), 1);
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let ws = Workspace::new("invalid-config");
    ws.write_config(r#"{"application_name": "web"}"#);
    let client = Arc::new(ScriptedClient::new("d-123"));

    let err = run(
        Operation::Create,
        &controller(client.clone(), 1_000),
        &ws.files(),
        never_cancel(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ProviderError::ValidationError(_)), "{:?}", err);
    assert!(client.submitted().is_empty());
}

#[tokio::test]
async fn test_read_without_state() {
    let ws = Workspace::new("missing-state");
    let client = Arc::new(ScriptedClient::new("d-123"));

    let err = run(
        Operation::Read,
        &controller(client, 1_000),
        &ws.files(),
        never_cancel(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ProviderError::NotFound(_)), "{:?}", err);
}

#[tokio::test]
async fn test_delete_drops_state_when_service_unreachable() {
    let ws = Workspace::new("unreachable-delete");
    ws.write_config(&declared_json());
    let client = Arc::new(ScriptedClient::new("d-123").with_statuses(&[DeploymentStatus::Succeeded]));
    let controller = controller(client.clone(), 1_000);

    run(Operation::Create, &controller, &ws.files(), never_cancel())
        .await
        .unwrap();
    client.script(vec![FetchStep::Fail("endpoint unreachable".to_string())]);
    let diags = run(Operation::Delete, &controller, &ws.files(), never_cancel())
        .await
        .unwrap();

    assert!(!diags.has_error());
    assert_eq!(diags.warnings().count(), 1);
    assert!(!ws.state_exists());
}
