//! CLI command implementations.

pub mod config;
pub mod map_link;
pub mod run;
