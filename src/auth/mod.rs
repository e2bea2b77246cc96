pub mod credentials;
pub mod extractors;
pub mod middleware;
pub mod token;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::AppError;

// Re-export necessary items
pub use credentials::CredentialVerifier;
pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use token::{Claims, TokenService};

/// Represents the payload for a login request.
///
/// Both fields are required by deserialization; empty values simply fail verification.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response structure for a login attempt.
/// `token` and `expires_at` are present only when `success` is true.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Credential check followed by token issuance.
pub struct AuthService {
    verifier: CredentialVerifier,
    tokens: Arc<TokenService>,
}

impl AuthService {
    /// # Errors
    /// Returns `AppError::Configuration` if the signing secret is empty.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        Ok(Self {
            verifier: CredentialVerifier::new(config.admin.clone()),
            tokens: Arc::new(TokenService::new(&config.jwt)?),
        })
    }

    /// The token service shared with the access gate.
    pub fn tokens(&self) -> Arc<TokenService> {
        Arc::clone(&self.tokens)
    }

    /// Verifies the credentials and, only on success, issues a token.
    pub fn login(&self, request: &LoginRequest) -> Result<LoginResponse, AppError> {
        log::info!("Login attempt: {}", request.username);

        if !self.verifier.verify(&request.username, &request.password) {
            log::warn!("Login failed: {}", request.username);
            return Ok(LoginResponse {
                success: false,
                message: "Invalid username or password".into(),
                token: None,
                expires_at: None,
            });
        }

        let (token, expires_at) = self.tokens.issue(&request.username)?;
        log::info!("Login succeeded: {}", request.username);

        Ok(LoginResponse {
            success: true,
            message: "Login successful".into(),
            token: Some(token),
            expires_at: Some(expires_at),
        })
    }
}
