//! Bounded wait for a deployment to reach a terminal status

use std::time::Duration;

use futures::future::{self, BoxFuture, FutureExt};
use tokio::time::Instant;
use tracing::debug;

use crate::client::DeploymentClient;
use crate::deploy::fsm::{LifecycleEvent, LifecycleFsm};
use crate::errors::ProviderError;
use crate::models::deployment::{DeploymentRecord, DeploymentStatus};
use crate::utils::{calc_exp_backoff, CooldownOptions};

/// External cancellation: the wait aborts as soon as this future completes
pub type CancelSignal = BoxFuture<'static, ()>;

/// Cancellation signal that never fires
pub fn never_cancel() -> CancelSignal {
    future::pending().boxed()
}

/// Floor applied to both poll delays
const MIN_POLL_DELAY: Duration = Duration::from_millis(1);

/// Wait options
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Total budget for the wait
    pub timeout: Duration,

    /// Delay before the second poll; doubles every round
    pub min_delay: Duration,

    /// Cap on the delay between polls
    pub max_delay: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60 * 60),
            min_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(15),
        }
    }
}

impl WaitOptions {
    /// Same cadence with a different total budget
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            timeout,
            ..self.clone()
        }
    }

    fn cooldown(&self) -> CooldownOptions {
        // A zero base delay would never grow and poll in a tight loop
        let max_delay = self.max_delay.max(MIN_POLL_DELAY);
        CooldownOptions {
            base_delay: self.min_delay.clamp(MIN_POLL_DELAY, max_delay),
            max_delay,
            multiplier: 2.0,
        }
    }
}

/// Why a wait failed, and what had been seen of the deployment by then
#[derive(Debug)]
pub struct WaitFailure {
    pub error: ProviderError,

    /// Last record returned by the service, `None` if no poll ever returned
    pub observed: Option<DeploymentRecord>,
}

/// Poll `deployment_id` until it succeeds, fails, or the wait is abandoned.
///
/// New rounds are only scheduled while less than `timeout - max_delay` has
/// elapsed, and each poll is itself bounded by the full `timeout`, so the
/// wait never overruns its budget. `cancel` aborts an in-flight poll or
/// sleep immediately.
pub async fn wait_for_completion(
    client: &dyn DeploymentClient,
    deployment_id: &str,
    options: &WaitOptions,
    fsm: &mut LifecycleFsm,
    mut cancel: CancelSignal,
) -> Result<DeploymentRecord, WaitFailure> {
    let started = Instant::now();
    let hard_deadline = started + options.timeout;
    let poll_window = options.timeout.saturating_sub(options.max_delay);
    let cooldown = options.cooldown();

    let mut observed: Option<DeploymentRecord> = None;
    let mut attempt = 0u32;

    loop {
        transition(fsm, LifecycleEvent::Poll, &observed)?;

        let fetched = tokio::select! {
            _ = &mut cancel => {
                return Err(abandon(fsm, ProviderError::Cancelled(deployment_id.to_string()), observed));
            }
            result = tokio::time::timeout_at(hard_deadline, client.fetch_status(deployment_id)) => result,
        };

        let record = match fetched {
            Ok(Ok(record)) => record,
            Ok(Err(e)) => return Err(abandon(fsm, e, observed)),
            Err(_) => {
                let err = ProviderError::Timeout(format!(
                    "{} after {:?}",
                    deployment_id, options.timeout
                ));
                return Err(abandon(fsm, err, observed));
            }
        };

        debug!(
            "Deployment {} is {} (poll {})",
            deployment_id,
            record.status,
            fsm.polls()
        );
        transition(fsm, LifecycleEvent::Observe(record.status.clone()), &observed)?;

        match record.status {
            DeploymentStatus::Succeeded => return Ok(record),
            DeploymentStatus::Failed | DeploymentStatus::Stopped => {
                let reason = match &record.error_message {
                    Some(message) => format!("{} is {}: {}", deployment_id, record.status, message),
                    None => format!("{} is {}", deployment_id, record.status),
                };
                return Err(WaitFailure {
                    error: ProviderError::DeploymentFailed(reason),
                    observed: Some(record),
                });
            }
            _ => observed = Some(record),
        }

        let elapsed = started.elapsed();
        if elapsed >= poll_window {
            let err = ProviderError::Timeout(format!(
                "{} still {} after {:?}",
                deployment_id,
                observed.as_ref().map(|r| r.status.as_str()).unwrap_or("unknown"),
                options.timeout
            ));
            return Err(abandon(fsm, err, observed));
        }

        let delay = calc_exp_backoff(&cooldown, attempt).min(poll_window - elapsed);
        attempt += 1;

        tokio::select! {
            _ = &mut cancel => {
                return Err(abandon(fsm, ProviderError::Cancelled(deployment_id.to_string()), observed));
            }
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

fn transition(
    fsm: &mut LifecycleFsm,
    event: LifecycleEvent,
    observed: &Option<DeploymentRecord>,
) -> Result<(), WaitFailure> {
    fsm.process(event).map_err(|e| WaitFailure {
        error: ProviderError::TransitionError(e),
        observed: observed.clone(),
    })
}

fn abandon(
    fsm: &mut LifecycleFsm,
    error: ProviderError,
    observed: Option<DeploymentRecord>,
) -> WaitFailure {
    // Expire is valid from every phase the loop can be in here
    let _ = fsm.process(LifecycleEvent::Expire(error.to_string()));
    WaitFailure { error, observed }
}
