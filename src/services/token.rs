//! Signed, time-bound bearer tokens (HS256 JWT).
//!
//! Decoding checks the signature and structure only. Expiry is reported back
//! to the caller, which compares it against its own clock.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Upper bound accepted for `security.max_token_ttl_hours` (100 years).
pub const TTL_CEILING_HOURS: f64 = 100.0 * 365.0 * 24.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TokenError {
    #[error("Token signature does not verify")]
    InvalidSignature,

    #[error("Token is malformed")]
    Malformed,

    #[error("expiration_hours must be a positive number")]
    InvalidTtl,

    #[error("expiration_hours must not exceed {0} hours")]
    TtlTooLong(f64),

    #[error("Token signing failed: {0}")]
    Signing(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
    iat: i64,
    jti: String,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedToken {
    pub user_id: i32,
    pub expires_at: DateTime<Utc>,
}

impl DecodedToken {
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str) -> anyhow::Result<Self> {
        if secret.trim().is_empty() {
            anyhow::bail!("Token signing secret must not be empty");
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    pub fn issue(&self, user_id: i32, ttl: Duration) -> Result<IssuedToken, TokenError> {
        self.issue_at(user_id, ttl, Utc::now())
    }

    pub(crate) fn issue_at(
        &self,
        user_id: i32,
        ttl: Duration,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        if ttl <= Duration::zero() {
            return Err(TokenError::InvalidTtl);
        }

        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or(TokenError::InvalidTtl)?;
        let claims = Claims {
            sub: user_id.to_string(),
            exp: expires_at.timestamp(),
            iat: issued_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        // Round to the precision carried by the claim
        let expires_at = DateTime::from_timestamp(claims.exp, 0).unwrap_or(expires_at);

        Ok(IssuedToken { token, expires_at })
    }

    pub fn decode(&self, token: &str) -> Result<DecodedToken, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            }
        })?;

        let user_id = data
            .claims
            .sub
            .parse::<i32>()
            .map_err(|_| TokenError::Malformed)?;
        let expires_at =
            DateTime::from_timestamp(data.claims.exp, 0).ok_or(TokenError::Malformed)?;

        Ok(DecodedToken {
            user_id,
            expires_at,
        })
    }
}

/// Converts a caller-supplied lifetime in hours, bounded by `max_hours`.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn ttl_from_hours(hours: f64, max_hours: f64) -> Result<Duration, TokenError> {
    if !hours.is_finite() || hours <= 0.0 {
        return Err(TokenError::InvalidTtl);
    }
    if hours > max_hours {
        return Err(TokenError::TtlTooLong(max_hours));
    }

    let seconds = (hours * 3600.0).round();
    // `as` saturates at i64::MAX, so out-of-range values are refused first
    if seconds < 1.0 || seconds >= i64::MAX as f64 {
        return Err(TokenError::InvalidTtl);
    }
    Duration::try_seconds(seconds as i64).ok_or(TokenError::InvalidTtl)
}
