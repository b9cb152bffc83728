// ABOUTME: Library root for gitship - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod deploy;
pub mod diagnostics;
pub mod environment;
pub mod error;
pub mod notify;
pub mod output;
pub mod report;
pub mod runner;
pub mod types;
pub mod validate;
