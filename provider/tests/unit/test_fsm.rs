//! FSM unit tests

use codedeploy_provider::deploy::fsm::{LifecycleEvent, LifecycleFsm, LifecyclePhase};
use codedeploy_provider::models::deployment::DeploymentStatus;

#[test]
fn test_fsm_initial_state() {
    let fsm = LifecycleFsm::new();
    assert_eq!(fsm.phase(), &LifecyclePhase::Pending);
    assert!(fsm.deployment_id().is_none());
    assert!(fsm.error().is_none());
    assert_eq!(fsm.polls(), 0);
}

#[test]
fn test_fsm_terminal_statuses() {
    for (status, phase) in [
        (DeploymentStatus::Succeeded, LifecyclePhase::Succeeded),
        (DeploymentStatus::Failed, LifecyclePhase::Failed),
        (DeploymentStatus::Stopped, LifecyclePhase::Stopped),
    ] {
        let mut fsm = LifecycleFsm::new();
        fsm.process(LifecycleEvent::Submit("d-1".to_string())).unwrap();
        fsm.process(LifecycleEvent::Poll).unwrap();
        fsm.process(LifecycleEvent::Observe(status.clone())).unwrap();

        assert_eq!(fsm.phase(), &phase);
        assert!(fsm.phase().is_terminal());
        assert_eq!(fsm.last_status(), Some(&status));
    }
}

#[test]
fn test_fsm_unknown_status_keeps_waiting() {
    let mut fsm = LifecycleFsm::new();
    fsm.process(LifecycleEvent::Submit("d-1".to_string())).unwrap();
    fsm.process(LifecycleEvent::Poll).unwrap();
    fsm.process(LifecycleEvent::Observe(DeploymentStatus::from("Rebalancing")))
        .unwrap();

    assert_eq!(fsm.phase(), &LifecyclePhase::Waiting);
    assert!(!fsm.phase().is_terminal());
}

#[test]
fn test_fsm_expire_before_first_poll_returns() {
    let mut fsm = LifecycleFsm::new();
    fsm.process(LifecycleEvent::Submit("d-1".to_string())).unwrap();
    fsm.process(LifecycleEvent::Expire("cancelled".to_string()))
        .unwrap();

    assert_eq!(fsm.phase(), &LifecyclePhase::TimedOut);
    assert_eq!(fsm.error(), Some("cancelled"));
}

#[test]
fn test_fsm_invalid_transitions() {
    let mut fsm = LifecycleFsm::new();

    // Cannot poll before submitting
    assert!(fsm.process(LifecycleEvent::Poll).is_err());

    // Cannot observe before polling
    fsm.process(LifecycleEvent::Submit("d-1".to_string())).unwrap();
    assert!(fsm
        .process(LifecycleEvent::Observe(DeploymentStatus::InProgress))
        .is_err());

    // Nothing leaves a terminal phase
    fsm.process(LifecycleEvent::Poll).unwrap();
    fsm.process(LifecycleEvent::Observe(DeploymentStatus::Succeeded))
        .unwrap();
    assert!(fsm.process(LifecycleEvent::Poll).is_err());
    assert!(fsm
        .process(LifecycleEvent::Expire("late".to_string()))
        .is_err());
    assert_eq!(fsm.phase(), &LifecyclePhase::Succeeded);
}
