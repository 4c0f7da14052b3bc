//! Cache key builders for all Plotline cache entries.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses.

use uuid::Uuid;

/// Prefix applied to all Plotline cache keys.
const PREFIX: &str = "plotline";

/// Cache key for the denormalized list of a user's active sessions.
pub fn user_sessions(user_id: Uuid) -> String {
    format!("{PREFIX}:session:user:{user_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_sessions_key() {
        let id = Uuid::nil();
        assert_eq!(
            user_sessions(id),
            "plotline:session:user:00000000-0000-0000-0000-000000000000"
        );
    }
}
