pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::{error, web, HttpRequest};

use crate::app::AppState;
use crate::error::AppError;

fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

fn path_error(err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

/// Registers every route. `/health` and login are public; everything else sits
/// behind the access gate.
pub fn config(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg.app_data(state.auth.clone())
        .app_data(state.tasks.clone())
        .app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .service(health::health)
        .service(
            web::scope("/api")
                .service(
                    web::scope("/auth").service(auth::login).service(
                        web::resource("/me")
                            .wrap(state.gate())
                            .route(web::get().to(auth::me)),
                    ),
                )
                .service(
                    web::scope("/todo")
                        .wrap(state.gate())
                        .service(tasks::list_completed)
                        .service(tasks::list_pending)
                        .service(tasks::list_tasks)
                        .service(tasks::create_task)
                        .service(tasks::get_task)
                        .service(tasks::update_task)
                        .service(tasks::delete_task),
                ),
        );
}
