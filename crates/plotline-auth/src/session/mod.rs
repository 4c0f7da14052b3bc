//! Session lifecycle and refresh-token rotation.
//!
//! The session store is the source of truth; the cache holds a best-effort
//! per-user mirror of it. The lifecycle orchestrator composes store, cache,
//! cap policy, verifier, and token issuer into the login/refresh/logout
//! operations.

pub mod cache;
pub mod cleanup;
pub mod lifecycle;
pub mod policy;
pub mod store;
pub mod verifier;

#[cfg(test)]
pub(crate) mod support;

pub use cache::SessionCache;
pub use cleanup::SessionCleanup;
pub use lifecycle::SessionLifecycle;
pub use policy::SessionPolicy;
pub use store::SessionStore;
pub use verifier::Verifier;
