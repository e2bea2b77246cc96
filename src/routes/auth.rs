use crate::{
    auth::{AuthService, AuthenticatedUser, LoginRequest},
    error::AppError,
};
use actix_web::{post, web, HttpResponse};
use serde_json::json;

/// Login
///
/// Verifies the admin credentials and returns a signed token with its expiry.
/// A failed attempt answers 401 with `success: false` and no token.
#[post("/login")]
pub async fn login(
    auth: web::Data<AuthService>,
    credentials: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let response = auth.login(&credentials)?;

    if response.success {
        Ok(HttpResponse::Ok().json(response))
    } else {
        Ok(HttpResponse::Unauthorized().json(response))
    }
}

/// Current user
///
/// Reports the identity recovered from the bearer token.
pub async fn me(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "username": user.username(),
        "is_authenticated": true
    }))
}
