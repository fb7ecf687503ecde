//! Standard exit codes for CLI operations
//!
//! Argument errors are reported by clap with its own exit code.

/// Success - operation completed without errors
pub const SUCCESS: i32 = 0;

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Validation error - an object, chart name or id was rejected
pub const VALIDATION_ERROR: i32 = 2;

/// Reference error - an aggregation points at a chart that is not synthesized
pub const REFERENCE_ERROR: i32 = 3;

/// Load error - synthesized output could not be read back
pub const LOAD_ERROR: i32 = 4;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;
