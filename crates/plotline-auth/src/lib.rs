//! # plotline-auth
//!
//! Session lifecycle and refresh-token rotation for the Plotline platform.
//!
//! ## Modules
//!
//! - `jwt` — access-token claims, issuance, and validation
//! - `password` — Argon2id password hashing and verification
//! - `session` — session store, cache mirror, cap policy, verifier, and the
//!   lifecycle orchestrator
//! - `geo` — IP geolocation lookup for session listings

pub mod geo;
pub mod jwt;
pub mod password;
pub mod session;

pub use jwt::{AccessClaims, AccessTokenDecoder, TokenIssuer};
pub use password::PasswordHasher;
pub use session::{
    SessionCache, SessionCleanup, SessionLifecycle, SessionPolicy, SessionStore, Verifier,
};
