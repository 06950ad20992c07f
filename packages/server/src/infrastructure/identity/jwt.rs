//! HS256 JWT identity tokens
//!
//! Claims: `{uid, username, iat, exp}`. The CRUD layer issues these with the
//! same secret; the hub only verifies them.

use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use parlor_shared::time::{Clock, SystemClock};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{Identity, IdentityError, IdentityVerifier, UserId};

pub const TOKEN_TTL_SECONDS: i64 = 24 * 60 * 60;

const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("jwt secret must be at least {min} characters long (got {actual})")]
pub struct JwtSecretError {
    pub min: usize,
    pub actual: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IdentityClaims {
    uid: Uuid,
    username: String,
    iat: i64,
    exp: i64,
}

#[derive(Clone)]
pub struct JwtIdentityVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl JwtIdentityVerifier {
    pub fn new(secret: &str) -> Result<Self, JwtSecretError> {
        Self::with_clock(secret, Arc::new(SystemClock))
    }

    pub fn with_clock(secret: &str, clock: Arc<dyn Clock>) -> Result<Self, JwtSecretError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(JwtSecretError {
                min: MIN_SECRET_LEN,
                actual: secret.len(),
            });
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            clock,
        })
    }

    /// Mint a token for `identity`, valid for [`TOKEN_TTL_SECONDS`]
    pub fn issue_token(&self, identity: &Identity) -> Result<String, IdentityError> {
        self.issue_token_at(identity, self.clock.now().timestamp())
    }

    fn issue_token_at(&self, identity: &Identity, issued_at: i64) -> Result<String, IdentityError> {
        let claims = IdentityClaims {
            uid: *identity.user_id.as_uuid(),
            username: identity.display_name.clone(),
            iat: issued_at,
            exp: issued_at + TOKEN_TTL_SECONDS,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|error| IdentityError::Issue(error.to_string()))
    }
}

impl IdentityVerifier for JwtIdentityVerifier {
    fn verify(&self, token: &str) -> Result<Identity, IdentityError> {
        if token.is_empty() {
            return Err(IdentityError::MissingToken);
        }

        let claims = decode::<IdentityClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|error| IdentityError::InvalidToken(error.to_string()))?
            .claims;

        if claims.username.trim().is_empty() {
            return Err(IdentityError::InvalidPayload(
                "username claim is empty".to_string(),
            ));
        }

        Ok(Identity::new(UserId::new(claims.uid), claims.username))
    }
}
