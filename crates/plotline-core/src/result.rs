//! Convenience result type alias for Plotline.

use crate::error::AppError;

/// A specialized `Result` type for Plotline operations.
pub type AppResult<T> = Result<T, AppError>;
