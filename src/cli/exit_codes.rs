//! exit codes for ruleframe commands
//!
//! 0 = success, non-zero = failure; JSON-RPC error codes are derived from these

/// command completed successfully
pub const SUCCESS: i32 = 0;

/// general or unknown error
pub const ERROR: i32 = 1;

/// invalid command-line arguments (bad --size, unknown shell)
pub const INVALID_ARGS: i32 = 4;

/// layout file missing, unreadable or invalid
pub const CONFIG_ERROR: i32 = 5;

/// --child names no child in the layout file
pub const UNKNOWN_CHILD: i32 = 6;
