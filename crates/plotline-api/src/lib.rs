//! # plotline-api
//!
//! HTTP API layer for Plotline built on Axum.
//!
//! Exposes the authentication endpoints (login, token refresh, logout,
//! logout-all, session listing) plus health checks, with uniform error
//! mapping at the boundary.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
