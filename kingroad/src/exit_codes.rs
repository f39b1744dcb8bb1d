//! Stable exit codes for kingroad CLI commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Command failed due to unreadable config/storage or other errors.
pub const INVALID: i32 = 1;
/// Route operation was rejected (no active route, unknown id, blank destination).
pub const REJECTED: i32 = 2;
