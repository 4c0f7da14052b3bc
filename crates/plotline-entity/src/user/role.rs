//! User role enum.

use serde::{Deserialize, Serialize};

/// Platform role carried in access-token claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum UserRole {
    /// Full platform administration.
    Admin,
    /// Content review and curation.
    Moderator,
    /// Story submission.
    Author,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::Moderator => write!(f, "moderator"),
            UserRole::Author => write!(f, "author"),
        }
    }
}
