#![allow(dead_code)]

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::middleware::Logger;
use actix_web::{http::header, test, App};
use serde_json::json;
use taskgate::app::AppState;
use taskgate::auth::LoginResponse;
use taskgate::config::{AdminAccount, Config, JwtSettings};
use taskgate::routes;
use taskgate::store::InMemoryTaskRepository;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "Password123!";

pub fn test_config() -> Config {
    Config {
        database_url: None,
        server_port: 0,
        server_host: "127.0.0.1".into(),
        jwt: JwtSettings {
            secret: "integration_test_secret".into(),
            issuer: "taskgate".into(),
            audience: "taskgate-client".into(),
            expiration_hours: 24,
            leeway_seconds: 0,
        },
        admin: AdminAccount {
            username: ADMIN_USERNAME.into(),
            password: ADMIN_PASSWORD.into(),
        },
    }
}

/// App state over a fresh in-memory repository, which is returned for inspection.
pub fn test_state() -> (AppState, Arc<InMemoryTaskRepository>) {
    test_state_with(test_config())
}

pub fn test_state_with(config: Config) -> (AppState, Arc<InMemoryTaskRepository>) {
    let repository = Arc::new(InMemoryTaskRepository::new());
    let state = AppState::new(&config, repository.clone()).expect("valid test config");
    (state, repository)
}

pub async fn init_app(
    state: &AppState,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .wrap(Logger::default())
            .configure(|cfg| routes::config(cfg, state)),
    )
    .await
}

/// Logs in as the admin and returns the bearer token.
pub async fn login(
    app: &impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
) -> String {
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert!(resp.status().is_success(), "admin login failed");

    let body: LoginResponse = test::read_body_json(resp).await;
    body.token.expect("successful login carries a token")
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}
