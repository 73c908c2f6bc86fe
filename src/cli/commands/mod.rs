//! CLI command implementations
//!
//! Every command receives the repository it operates on and returns a
//! process exit code.

pub mod download;
pub mod region;
pub mod repo;
pub mod session;
pub mod set;
pub mod show;

/// Successful run
pub const EXIT_OK: i32 = 0;
/// The command ran but could not do what was asked
pub const EXIT_FAILURE: i32 = 1;
/// Invalid argument value
pub const EXIT_USAGE: i32 = 2;
/// Logging setup or command execution failed
pub const EXIT_FATAL: i32 = 5;
