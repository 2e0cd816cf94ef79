//! Provider process wiring

pub mod options;
pub mod run;
