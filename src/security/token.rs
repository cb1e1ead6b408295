//! Signed identity tokens (HS256 JWT).
//!
//! # Responsibilities
//! - Issue a token for a subject after a successful login
//! - Verify signature, algorithm and validity window on protected requests
//!
//! # Design Decisions
//! - Key material is injected at construction, never read from the environment here
//! - Time checks use an explicit `now` so expiry is testable without sleeping
//! - No revocation: validity is signature + window at verification time

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, get_current_timestamp, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AuthConfig;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Claims carried by every identity token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (the username that logged in).
    pub sub: String,
    pub iss: String,
    pub iat: u64,
    pub nbf: u64,
    pub exp: u64,
}

/// A freshly signed token and its lifetime.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: u64,
}

#[derive(Debug, Error)]
#[error("failed to sign token: {0}")]
pub struct SigningError(#[from] jsonwebtoken::errors::Error);

/// Why a presented token was refused.
///
/// Callers treat every variant as "unauthenticated"; the distinction is for logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("malformed token")]
    MalformedToken,

    #[error("unexpected signing algorithm")]
    UnexpectedAlgorithm,

    #[error("signature does not verify")]
    BadSignature,

    #[error("token expired or not yet valid")]
    Expired,
}

impl From<jsonwebtoken::errors::Error> for VerificationError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidAlgorithm => VerificationError::UnexpectedAlgorithm,
            ErrorKind::InvalidSignature => VerificationError::BadSignature,
            ErrorKind::ExpiredSignature | ErrorKind::ImmatureSignature => VerificationError::Expired,
            _ => VerificationError::MalformedToken,
        }
    }
}

/// Issues and verifies identity tokens with a single symmetric key.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    ttl_secs: u64,
}

impl TokenService {
    pub fn new(secret: &[u8], issuer: impl Into<String>, ttl_secs: u64) -> Self {
        // Window checks happen in `verify_at` against the caller's clock.
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "nbf", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            issuer: issuer.into(),
            ttl_secs,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.jwt_secret.as_bytes(), config.issuer.clone(), config.token_ttl_secs)
    }

    pub fn issue(&self, subject: &str) -> Result<IssuedToken, SigningError> {
        self.issue_at(subject, get_current_timestamp())
    }

    /// Issue a token as if the current time were `now` (seconds since the Unix epoch).
    pub fn issue_at(&self, subject: &str, now: u64) -> Result<IssuedToken, SigningError> {
        let claims = Claims {
            sub: subject.to_string(),
            iss: self.issuer.clone(),
            iat: now,
            nbf: now,
            exp: now.saturating_add(self.ttl_secs),
        };
        let token = encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)?;

        Ok(IssuedToken {
            token,
            expires_in: self.ttl_secs,
        })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, VerificationError> {
        self.verify_at(token, get_current_timestamp())
    }

    /// Verify a token against the clock reading `now`.
    pub fn verify_at(&self, token: &str, now: u64) -> Result<Claims, VerificationError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        let claims = data.claims;

        if now > claims.exp || now < claims.nbf {
            return Err(VerificationError::Expired);
        }

        Ok(claims)
    }
}
