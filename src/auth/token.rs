use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtSettings;
use crate::error::AppError;

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the authenticated username.
    pub sub: String,
    /// Unique token identifier, freshly generated per issuance.
    pub jti: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Issuer the token was signed for.
    pub iss: String,
    /// Audience the token was signed for.
    pub aud: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Issues and validates HS256 tokens against one immutable set of parameters.
///
/// Validation is a pure function of the token, these parameters and the current
/// time, so a single `TokenService` can be shared freely across workers.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    lifetime: Duration,
    leeway_seconds: i64,
}

impl TokenService {
    /// Builds the service from the configured settings.
    ///
    /// # Errors
    /// Returns `AppError::Configuration` if the signing secret is empty.
    pub fn new(settings: &JwtSettings) -> Result<Self, AppError> {
        if settings.secret.is_empty() {
            return Err(AppError::Configuration(
                "JWT signing secret must not be empty".into(),
            ));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[settings.issuer.as_str()]);
        validation.set_audience(&[settings.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        // Expiry is checked by `validate_at` against an explicit instant.
        validation.validate_exp = false;
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            validation,
            issuer: settings.issuer.clone(),
            audience: settings.audience.clone(),
            lifetime: Duration::hours(i64::from(settings.expiration_hours)),
            leeway_seconds: i64::try_from(settings.leeway_seconds).unwrap_or(i64::MAX),
        })
    }

    /// Issues a token for `username`, returning it with its expiry instant.
    pub fn issue(&self, username: &str) -> Result<(String, DateTime<Utc>), AppError> {
        self.issue_at(username, Utc::now())
    }

    /// Issues a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let expires_at = now
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| AppError::InternalServerError("Token expiry out of range".into()))?;

        let claims = Claims {
            sub: username.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))?;

        // The JWT carries whole seconds; report the instant the validator will enforce.
        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .unwrap_or(expires_at);

        Ok((token, expires_at))
    }

    /// Validates `token` against the current time.
    ///
    /// Every failure collapses to the same `AppError::Unauthorized`.
    pub fn validate(&self, token: &str) -> Result<Claims, AppError> {
        self.validate_at(token, Utc::now())
    }

    /// Validates `token` as if the current time were `now`.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AppError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                log::debug!("Rejected token: {}", e);
                AppError::unauthorized()
            })?;

        // Strictly before expiry; `exp == now` is already expired.
        if now.timestamp() >= claims.exp.saturating_add(self.leeway_seconds) {
            log::debug!("Rejected token {}: expired at {}", claims.jti, claims.exp);
            return Err(AppError::unauthorized());
        }

        Ok(claims)
    }
}
