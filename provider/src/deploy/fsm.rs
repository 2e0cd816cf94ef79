//! Finite state machine for one deployment execution

use serde::{Deserialize, Serialize};

use crate::models::deployment::DeploymentStatus;

/// Lifecycle phase of a deployment during create
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecyclePhase {
    /// Nothing submitted yet
    Pending,

    /// Submit returned a deployment id
    Submitted,

    /// Polling the service for a terminal status
    Waiting,

    /// Deployment finished successfully
    Succeeded,

    /// Deployment finished unsuccessfully
    Failed,

    /// Deployment was stopped remotely
    Stopped,

    /// The wait ended without a terminal status (deadline, cancellation or
    /// an unreadable deployment). Local only.
    TimedOut,
}

impl LifecyclePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            LifecyclePhase::Succeeded
                | LifecyclePhase::Failed
                | LifecyclePhase::Stopped
                | LifecyclePhase::TimedOut
        )
    }
}

/// Lifecycle event
#[derive(Debug, Clone)]
pub enum LifecycleEvent {
    /// Submit succeeded with the given deployment id
    Submit(String),

    /// A status poll is about to be issued
    Poll,

    /// A status was observed
    Observe(DeploymentStatus),

    /// The wait was abandoned
    Expire(String),
}

/// Deployment lifecycle FSM
#[derive(Debug, Clone)]
pub struct LifecycleFsm {
    phase: LifecyclePhase,
    deployment_id: Option<String>,
    last_status: Option<DeploymentStatus>,
    error: Option<String>,
    polls: u32,
}

impl LifecycleFsm {
    /// Create a new FSM in pending phase
    pub fn new() -> Self {
        Self {
            phase: LifecyclePhase::Pending,
            deployment_id: None,
            last_status: None,
            error: None,
            polls: 0,
        }
    }

    pub fn phase(&self) -> &LifecyclePhase {
        &self.phase
    }

    pub fn deployment_id(&self) -> Option<&str> {
        self.deployment_id.as_deref()
    }

    /// Last status observed from the service, if any poll returned
    pub fn last_status(&self) -> Option<&DeploymentStatus> {
        self.last_status.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Number of status polls issued
    pub fn polls(&self) -> u32 {
        self.polls
    }

    /// Process an event and transition phase
    pub fn process(&mut self, event: LifecycleEvent) -> Result<(), String> {
        let new_phase = match (&self.phase, &event) {
            (LifecyclePhase::Pending, LifecycleEvent::Submit(id)) => {
                self.deployment_id = Some(id.clone());
                LifecyclePhase::Submitted
            }

            (LifecyclePhase::Submitted | LifecyclePhase::Waiting, LifecycleEvent::Poll) => {
                self.polls += 1;
                LifecyclePhase::Waiting
            }

            (LifecyclePhase::Waiting, LifecycleEvent::Observe(status)) => {
                self.last_status = Some(status.clone());
                match status {
                    DeploymentStatus::Succeeded => LifecyclePhase::Succeeded,
                    DeploymentStatus::Failed => LifecyclePhase::Failed,
                    DeploymentStatus::Stopped => LifecyclePhase::Stopped,
                    _ => LifecyclePhase::Waiting,
                }
            }

            (LifecyclePhase::Submitted | LifecyclePhase::Waiting, LifecycleEvent::Expire(reason)) => {
                self.error = Some(reason.clone());
                LifecyclePhase::TimedOut
            }

            (phase, event) => {
                return Err(format!("{:?} -> {:?}", phase, event));
            }
        };

        self.phase = new_phase;
        Ok(())
    }
}

impl Default for LifecycleFsm {
    fn default() -> Self {
        Self::new()
    }
}
