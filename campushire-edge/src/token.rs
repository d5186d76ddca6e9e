//! Company access token verification
//!
//! The company registration flow hands out a short-lived signed token,
//! delivered back to us as a cookie. This module signs and verifies those
//! tokens locally; no call to the auth service is ever involved.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{EdgeError, EdgeResult};

/// Environment variable holding the signing secret
pub const SECRET_ENV: &str = "COMPANY_ACCESS_TOKEN_SECRET";

/// Fallback secret for development mode only
const DEV_SECRET: &str = "campushire-dev-secret-change-in-production";

/// Claims carried by a company access token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccessClaims {
    /// Subject (the registration the token grants access to)
    pub sub: String,
    /// Issued at (timestamp)
    pub iat: i64,
    /// Expiration time (timestamp)
    pub exp: i64,
}

impl AccessClaims {
    /// Create claims valid for `ttl` from now
    pub fn new<S: Into<String>>(subject: S, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: subject.into(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Access token errors
#[derive(Debug, thiserror::Error)]
pub enum TokenVerificationError {
    #[error("Access token expired")]
    Expired,
    #[error("Invalid access token")]
    Invalid,
    #[error("Access token creation failed")]
    Creation,
}

/// HS256 signing and verification service
///
/// Constructed once at startup and passed down through application state, so
/// tests can run isolated instances with their own secrets.
pub struct AccessTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl AccessTokenService {
    /// Create a service from an explicit secret
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Create a service from the `COMPANY_ACCESS_TOKEN_SECRET` env value
    ///
    /// Outside development mode a missing secret is a startup error rather
    /// than a silent fallback.
    pub fn from_env(dev_mode: bool) -> EdgeResult<Self> {
        match std::env::var(SECRET_ENV) {
            Ok(secret) => Ok(Self::new(secret.as_bytes())),
            Err(_) if dev_mode => {
                warn!("{} not set, using the development secret", SECRET_ENV);
                Ok(Self::new(DEV_SECRET.as_bytes()))
            }
            Err(_) => Err(EdgeError::Config(format!(
                "{} must be set outside development mode",
                SECRET_ENV
            ))),
        }
    }

    /// Mint a token for the registration gating flow
    pub fn issue(&self, subject: &str, ttl: Duration) -> Result<String, TokenVerificationError> {
        self.sign(&AccessClaims::new(subject, ttl))
    }

    fn sign(&self, claims: &AccessClaims) -> Result<String, TokenVerificationError> {
        encode(&Header::default(), claims, &self.encoding).map_err(|e| {
            warn!("Failed to encode access token: {}", e);
            TokenVerificationError::Creation
        })
    }

    /// Verify and decode a token
    ///
    /// Expiry is re-checked against the raw timestamp after decoding, so a
    /// token inside the validator's leeway window still reads as expired.
    pub fn verify(&self, token: &str) -> Result<AccessClaims, TokenVerificationError> {
        let token_data = decode::<AccessClaims>(token, &self.decoding, &Validation::default())
            .map_err(|e| {
                debug!("Access token verification failed: {}", e);
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenVerificationError::Expired,
                    _ => TokenVerificationError::Invalid,
                }
            })?;

        let claims = token_data.claims;

        if claims.is_expired() {
            return Err(TokenVerificationError::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_then_verify_round_trips() {
        let service = AccessTokenService::new(b"test-secret");

        let token = service.issue("company-reg:c-9", Duration::minutes(30)).unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.sub, "company-reg:c-9");
        assert!(!claims.is_expired());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_is_rejected_as_expired() {
        let service = AccessTokenService::new(b"test-secret");

        let now = Utc::now();
        let stale = AccessClaims {
            sub: "company-reg:c-9".to_string(),
            iat: (now - Duration::minutes(10)).timestamp(),
            exp: (now - Duration::minutes(5)).timestamp(),
        };
        let token = service.sign(&stale).unwrap();

        assert!(matches!(
            service.verify(&token),
            Err(TokenVerificationError::Expired)
        ));
    }

    #[test]
    fn test_foreign_signature_is_rejected_as_invalid() {
        let issuer = AccessTokenService::new(b"secret-a");
        let verifier = AccessTokenService::new(b"secret-b");

        let token = issuer.issue("company-reg:c-9", Duration::minutes(30)).unwrap();

        assert!(matches!(
            verifier.verify(&token),
            Err(TokenVerificationError::Invalid)
        ));
    }

    #[test]
    fn test_garbage_is_rejected_as_invalid() {
        let service = AccessTokenService::new(b"test-secret");

        assert!(matches!(
            service.verify("not-a-token"),
            Err(TokenVerificationError::Invalid)
        ));
        assert!(matches!(
            service.verify(""),
            Err(TokenVerificationError::Invalid)
        ));
    }
}
