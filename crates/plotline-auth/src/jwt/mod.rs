//! Access-token claims, issuance, and validation.

pub mod claims;
pub mod decoder;
pub mod issuer;

pub use claims::AccessClaims;
pub use decoder::AccessTokenDecoder;
pub use issuer::TokenIssuer;
