//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Login email.
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// Client device signature.
    #[validate(length(min = 1, message = "Fingerprint is required"))]
    pub fingerprint: String,
}

/// Token refresh request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// Refresh token to rotate.
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
    /// Client device signature.
    #[validate(length(min = 1, message = "Fingerprint is required"))]
    pub fingerprint: String,
}

/// Logout request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    /// Refresh token identifying the session to end.
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_request_uses_camel_case() {
        let req: RefreshRequest =
            serde_json::from_str(r#"{"refreshToken": "t", "fingerprint": "f"}"#).unwrap();
        assert_eq!(req.refresh_token, "t");
    }

    #[test]
    fn login_request_rejects_bad_email() {
        let req = LoginRequest {
            email: "not-an-email".to_string(),
            password: "secret".to_string(),
            fingerprint: "fp".to_string(),
        };
        assert!(req.validate().is_err());
    }
}
