//! Write observed remote status back into resource state

use chrono::Utc;

use crate::models::deployment::DeploymentRecord;
use crate::models::resource::ResourceState;

/// Copy the observed status of `record` into `state`.
///
/// Unrecognized statuses are stored verbatim. Returns whether the persisted
/// status or error message changed.
pub fn reconcile(state: &mut ResourceState, record: &DeploymentRecord) -> bool {
    let status = record.status.as_str();
    let changed =
        state.deployment_status != status || state.error_message != record.error_message;

    state.deployment_status = status.to_string();
    state.error_message = record.error_message.clone();
    state.last_observed_at = Some(Utc::now());
    changed
}
