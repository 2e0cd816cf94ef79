//! Deployment lifecycle

pub mod controller;
pub mod fsm;
pub mod reconcile;
pub mod resolver;
pub mod waiter;
