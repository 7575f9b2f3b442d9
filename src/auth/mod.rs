pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::SecurityConfig;

/// JWT claims carried by a session token. The subject is kept as a raw JSON
/// value because tokens minted by earlier revisions of this service encoded
/// it variously as a number or a numeric string; `verify` normalizes it.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Value,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

/// Identity extracted from a validated token. Attached to request
/// extensions by the auth middleware; lives only for the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub email: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid token")]
    InvalidToken,
    #[error("token expired")]
    ExpiredToken,
    #[error("token generation failed: {0}")]
    TokenGeneration(String),
    #[error("signing secret is not configured")]
    MisconfiguredSecret,
}

/// Issues and validates signed session tokens. Stateless by design: any
/// instance holding the shared secret can validate any token, at the cost
/// of no server-side revocation.
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    validity: Duration,
}

impl TokenService {
    pub fn new(security: &SecurityConfig) -> Self {
        Self {
            secret: security.jwt_secret.clone(),
            validity: Duration::hours(security.token_expiry_hours),
        }
    }

    /// Seconds until a freshly issued token expires, advertised to clients
    /// as `expires_in`.
    pub fn expires_in_secs(&self) -> i64 {
        self.validity.num_seconds()
    }

    /// Build and sign a token asserting `{sub, email, exp, iat}`.
    pub fn issue(&self, subject: i32, email: &str) -> Result<String, AuthError> {
        self.issue_with_validity(subject, email, self.validity)
    }

    /// Same as `issue` with an explicit validity window. A non-positive
    /// window produces an already-expired token.
    pub fn issue_with_validity(
        &self,
        subject: i32,
        email: &str,
        validity: Duration,
    ) -> Result<String, AuthError> {
        if self.secret.is_empty() {
            return Err(AuthError::MisconfiguredSecret);
        }

        let now = Utc::now();
        let claims = Claims {
            sub: Value::from(subject),
            email: email.to_string(),
            exp: (now + validity).timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    /// Validate signature, structure, and expiry, then normalize the
    /// subject claim to an `i32` user id.
    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if self.secret.is_empty() {
            return Err(AuthError::MisconfiguredSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // The default 60s leeway would accept tokens past their encoded
        // expiry; a token is invalid the moment `exp` passes.
        validation.leeway = 0;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::InvalidToken,
        })?;

        let user_id = coerce_subject(&data.claims.sub)?;
        Ok(AuthenticatedUser {
            user_id,
            email: data.claims.email,
        })
    }
}

/// Normalize the subject claim to an `i32`. Accepts integers, integral
/// floats in range, and numeric strings; fails closed on anything else.
fn coerce_subject(raw: &Value) -> Result<i32, AuthError> {
    match raw {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i32::try_from(i).map_err(|_| AuthError::InvalidToken)
            } else if let Some(f) = n.as_f64() {
                if f.fract() == 0.0 && f >= f64::from(i32::MIN) && f <= f64::from(i32::MAX) {
                    Ok(f as i32)
                } else {
                    Err(AuthError::InvalidToken)
                }
            } else {
                Err(AuthError::InvalidToken)
            }
        }
        Value::String(s) => s.parse::<i32>().map_err(|_| AuthError::InvalidToken),
        _ => Err(AuthError::InvalidToken),
    }
}
