//! Constants for the download module (output folder, limits).

/// Folder, relative to the working directory, that receives downloads.
pub const DEFAULT_OUTPUT_DIR: &str = "downloads";

/// Minimum allowed bounded concurrency value.
pub const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed bounded concurrency value.
pub const MAX_CONCURRENCY: usize = 100;

/// Upper bound for a per-request timeout (1 hour).
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Permissions for a freshly created output folder (rwxr-xr-x).
#[cfg(unix)]
pub const OUTPUT_DIR_MODE: u32 = 0o755;
