//! Settings and resource state on disk

pub mod settings;
pub mod state;
