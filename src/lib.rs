// ABOUTME: Library root for hatch - one lifecycle client over many container engines.
// ABOUTME: The command-line front end is in main.rs.

pub mod config;
pub mod error;
pub mod probe;
pub mod runtime;
pub mod types;
