//! Deployment lifecycle controller
//!
//! Entry points the host drives for the `codedeploy_deployment` resource.
//! Create submits and waits; read reconciles; update only touches local
//! state; delete stops whatever is still running, best effort.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::client::DeploymentClient;
use crate::deploy::fsm::{LifecycleEvent, LifecycleFsm};
use crate::deploy::reconcile::reconcile;
use crate::deploy::resolver::{self, ResolverOptions};
use crate::deploy::waiter::{self, CancelSignal, WaitOptions};
use crate::diag::Diagnostics;
use crate::errors::ProviderError;
use crate::models::deployment::DeploymentRecord;
use crate::models::resource::{ResourceConfig, ResourceState};

/// Controller settings
#[derive(Debug, Clone, Default)]
pub struct ControllerOptions {
    /// Default wait cadence and budget for create
    pub wait: WaitOptions,

    pub resolver: ResolverOptions,
}

/// Lifecycle controller for deployment resources
pub struct DeploymentController {
    client: Arc<dyn DeploymentClient>,
    options: ControllerOptions,
}

impl DeploymentController {
    pub fn new(client: Arc<dyn DeploymentClient>, options: ControllerOptions) -> Self {
        Self { client, options }
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    /// Create a deployment and wait for it to succeed.
    ///
    /// Returns a state only once a deployment id has been persisted; a
    /// failed submit or wait yields `None` with error diagnostics.
    pub async fn create(
        &self,
        config: ResourceConfig,
        cancel: CancelSignal,
    ) -> (Option<ResourceState>, Diagnostics) {
        let request = match config
            .validate()
            .and_then(|_| resolver::build_request(&config, &self.options.resolver))
        {
            Ok(request) => request,
            Err(e) => return (None, Diagnostics::from_error(&e)),
        };

        info!(
            "Creating deployment for {}/{} from {} revision",
            request.application_name,
            request.deployment_group_name,
            request.revision.revision_type()
        );

        let deployment_id = match self.client.submit(&request).await {
            Ok(id) => id,
            Err(e) => {
                error!("Failed to create deployment: {}", e);
                return (None, Diagnostics::from_error(&e));
            }
        };

        let mut fsm = LifecycleFsm::new();
        if let Err(e) = fsm.process(LifecycleEvent::Submit(deployment_id.clone())) {
            return (None, Diagnostics::from_error(&ProviderError::TransitionError(e)));
        }
        info!("Deployment {} submitted, waiting for completion", deployment_id);

        let wait_options = match config.timeouts.create_timeout() {
            Some(timeout) => self.options.wait.with_timeout(timeout),
            None => self.options.wait.clone(),
        };

        match waiter::wait_for_completion(
            self.client.as_ref(),
            &deployment_id,
            &wait_options,
            &mut fsm,
            cancel,
        )
        .await
        {
            Ok(record) => {
                info!(
                    "Deployment {} succeeded after {} polls",
                    deployment_id,
                    fsm.polls()
                );
                let mut state = ResourceState::new(config, request.revision, &record);
                let diags = self.read(&mut state).await;
                (Some(state), diags)
            }
            Err(failure) => {
                error!("Deployment {} did not complete: {}", deployment_id, failure.error);
                let mut diags = Diagnostics::from_error(&failure.error);
                diags.extend(
                    self.stop_after_failed_wait(
                        &deployment_id,
                        failure.observed.as_ref(),
                        request.auto_rollback_enabled,
                    )
                    .await,
                );
                (None, diags)
            }
        }
    }

    async fn stop_after_failed_wait(
        &self,
        deployment_id: &str,
        observed: Option<&DeploymentRecord>,
        auto_rollback_enabled: bool,
    ) -> Diagnostics {
        let mut diags = Diagnostics::new();

        let Some(record) = observed else {
            debug!("Deployment {} was never observed, not stopping it", deployment_id);
            return diags;
        };
        // Same rule as delete: a deployment already Failed or Stopped is not stopped again
        if record.status.is_terminal() {
            debug!(
                "Deployment {} already {}, nothing to stop",
                deployment_id, record.status
            );
            return diags;
        }

        info!(
            "Stopping deployment {} (auto rollback: {})",
            deployment_id, auto_rollback_enabled
        );
        if let Err(e) = self.client.stop(deployment_id, auto_rollback_enabled).await {
            warn!("Failed to stop deployment {}: {}", deployment_id, e);
            diags.push_warning(
                format!("Unable to stop deployment {}", deployment_id),
                Some(e.to_string()),
            );
        }
        diags
    }

    /// Refresh the observed status of an existing deployment
    pub async fn read(&self, state: &mut ResourceState) -> Diagnostics {
        match self.client.fetch_status(&state.id).await {
            Ok(record) => {
                if reconcile(state, &record) {
                    info!("Deployment {} is now {}", state.id, state.deployment_status);
                }
                Diagnostics::new()
            }
            Err(e) => {
                error!("Failed to read deployment {}: {}", state.id, e);
                Diagnostics::from_error(&e)
            }
        }
    }

    /// Apply an in-place change. Only the rollback flag and timeouts can
    /// change without replacement, and neither touches the remote side.
    pub fn update(&self, state: &mut ResourceState, desired: ResourceConfig) -> Diagnostics {
        if let Err(e) = desired.validate() {
            return Diagnostics::from_error(&e);
        }

        let replaced = state.config.replacement_fields(&desired);
        if !replaced.is_empty() {
            let mut diags = Diagnostics::new();
            diags.push_error(
                "Changed attributes require replacing the deployment",
                Some(replaced.join(", ")),
            );
            return diags;
        }

        state.config.auto_rollback_enabled = desired.auto_rollback_enabled;
        state.config.timeouts = desired.timeouts;
        Diagnostics::new()
    }

    /// Stop the deployment if it is still running.
    ///
    /// Never fails: remote problems come back as warnings so the host can
    /// always drop the resource.
    pub async fn delete(&self, state: &ResourceState) -> Diagnostics {
        let mut diags = Diagnostics::new();

        let record = match self.client.fetch_status(&state.id).await {
            Ok(record) => record,
            Err(e) => {
                warn!("Unable to read deployment {} before delete: {}", state.id, e);
                diags.push_warning(
                    format!("Unable to read deployment {}", state.id),
                    Some(e.to_string()),
                );
                return diags;
            }
        };

        if record.status.is_terminal() {
            debug!("Deployment {} already {}, nothing to stop", state.id, record.status);
            return diags;
        }

        info!(
            "Stopping deployment {} (auto rollback: {})",
            state.id, state.config.auto_rollback_enabled
        );
        if let Err(e) = self
            .client
            .stop(&state.id, state.config.auto_rollback_enabled)
            .await
        {
            warn!("Failed to stop deployment {}: {}", state.id, e);
            diags.push_warning(
                format!("Unable to stop deployment {}", state.id),
                Some(e.to_string()),
            );
        }
        diags
    }
}
