//! Small helpers shared by the workspace crates: environment lookup and
//! the configuration error they report.

pub mod config;
pub mod env;
