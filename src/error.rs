pub use masterror::{AppError, AppResult};

/// Create file read error
pub fn file_read_error(path: &str, source: std::io::Error) -> AppError {
    AppError::internal(format!("Failed to read file '{}': {}", path, source))
}

/// Create project snapshot parse error
pub fn snapshot_parse_error(message: impl Into<String>) -> AppError {
    AppError::bad_request(format!("Invalid project snapshot:\n  {}", message.into()))
}

/// Create config error
pub fn config_error(message: impl Into<String>) -> AppError {
    AppError::bad_request(message.into())
}

/// Create quick-fix apply error
///
/// Fix application failures are recoverable: callers log them and keep the
/// source tree untouched.
pub fn fix_error(message: impl Into<String>) -> AppError {
    AppError::internal(format!("Quick fix not applied: {}", message.into()))
}

/// Create cancellation error
///
/// Raised when the host's cancel flag flips between call sites of a long
/// file.
pub fn cancelled() -> AppError {
    AppError::internal("Inspection cancelled")
}
