//! JWT access token verification
//!
//! Tokens are issued by the identity service that shares the signing
//! secret. This service verifies them and resolves the caller's user id;
//! `issue_access_token` exists for operator tooling and tests.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

const ACCESS_TOKEN_TYPE: &str = "access";

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Only "access" tokens are accepted
    pub token_type: String,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|_| anyhow::anyhow!("Invalid user ID in token"))
    }
}

/// Pre-computed keys, shared across request handlers
#[derive(Clone)]
struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }
}

/// JWT verifier held in application state
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    access_token_expiry_secs: i64,
}

impl JwtService {
    /// Build the service once at startup; key derivation is not per-request.
    pub fn new(secret: &str, access_token_expiry_secs: i64) -> Self {
        Self {
            keys: JwtKeys::new(secret),
            access_token_expiry_secs,
        }
    }

    /// Sign an access token for `user_id`, valid from `issued_at`
    pub fn issue_access_token(&self, user_id: Uuid, issued_at: DateTime<Utc>) -> Result<String> {
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (issued_at + Duration::seconds(self.access_token_expiry_secs)).timestamp(),
            iat: issued_at.timestamp(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
        };

        encode(&Header::default(), &claims, &self.keys.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to sign access token: {}", e))
    }

    /// Verify signature, expiry and token type
    pub fn verify_access_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.keys.decoding, &Validation::default())
            .map_err(|e| anyhow::anyhow!("Invalid token: {}", e))?;

        if token_data.claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(anyhow::anyhow!("Not an access token"));
        }
        Ok(token_data.claims)
    }
}
