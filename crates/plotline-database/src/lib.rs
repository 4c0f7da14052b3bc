//! # plotline-database
//!
//! PostgreSQL connection management and the concrete repository
//! implementations of the persistence traits consumed by the session core.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
