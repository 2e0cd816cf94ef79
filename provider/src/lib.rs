//! CodeDeploy Provider Library
//!
//! Lifecycle logic of the `codedeploy_deployment` resource: resolve the
//! declared revision, submit a deployment, wait for it, reconcile its status,
//! and stop it on teardown.

pub mod app;
pub mod client;
pub mod deploy;
pub mod diag;
pub mod errors;
pub mod filesys;
pub mod logs;
pub mod models;
pub mod schema;
pub mod storage;
pub mod utils;
