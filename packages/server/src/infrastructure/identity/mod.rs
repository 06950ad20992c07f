//! IdentityVerifier の実装

pub mod jwt;

pub use jwt::{JwtIdentityVerifier, JwtSecretError, TOKEN_TTL_SECONDS};
