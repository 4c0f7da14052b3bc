//! Refresh-attempt verification.

use tracing::debug;

use plotline_core::error::AppError;
use plotline_entity::session::Session;

/// Decides whether a presented refresh token authorizes a refresh.
///
/// The lookup itself happens in the store; the verifier judges the row it
/// produced. Fingerprint mismatch and expiry both surface as the uniform
/// access-denied error so the caller cannot tell which check failed; the
/// precise reason is logged server-side only.
#[derive(Debug, Clone, Default)]
pub struct Verifier;

impl Verifier {
    /// Creates a new verifier.
    pub fn new() -> Self {
        Self
    }

    /// Checks the presented fingerprint and the session's expiry.
    pub fn check(&self, session: &Session, fingerprint: &str) -> Result<(), AppError> {
        if session.fingerprint != fingerprint {
            debug!(session_id = %session.id, "Refresh rejected: fingerprint mismatch");
            return Err(AppError::access_denied());
        }

        if session.is_expired() {
            debug!(session_id = %session.id, "Refresh rejected: session expired");
            return Err(AppError::access_denied());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use plotline_core::error::ErrorKind;
    use uuid::Uuid;

    fn session(fingerprint: &str, expires_in: Duration) -> Session {
        let now = Utc::now();
        Session {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            refresh_token: Uuid::new_v4().to_string(),
            ip: "203.0.113.7".to_string(),
            user_agent: None,
            fingerprint: fingerprint.to_string(),
            expires_at: now + expires_in,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn valid_session_passes() {
        let s = session("fp-1", Duration::hours(1));
        assert!(Verifier::new().check(&s, "fp-1").is_ok());
    }

    #[test]
    fn fingerprint_mismatch_is_denied() {
        let s = session("fp-1", Duration::hours(1));
        let err = Verifier::new().check(&s, "fp-2").unwrap_err();
        assert_eq!(err.kind, ErrorKind::AccessDenied);
    }

    #[test]
    fn expired_session_is_denied() {
        let s = session("fp-1", Duration::seconds(-10));
        let err = Verifier::new().check(&s, "fp-1").unwrap_err();
        assert_eq!(err.kind, ErrorKind::AccessDenied);
    }

    #[test]
    fn rejections_are_indistinguishable() {
        let mismatched = Verifier::new()
            .check(&session("fp-1", Duration::hours(1)), "fp-2")
            .unwrap_err();
        let expired = Verifier::new()
            .check(&session("fp-1", Duration::seconds(-10)), "fp-1")
            .unwrap_err();
        assert_eq!(mismatched.kind, expired.kind);
        assert_eq!(mismatched.message, expired.message);
    }
}
