use actix_cors::Cors;
use actix_web::{middleware::Logger, App, HttpServer};
use std::io;

use taskgate::{app::AppState, config::Config, routes};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Configuration and signing-key problems stop the process before it binds.
    let config = Config::from_env().map_err(fatal)?;
    let state = AppState::from_config(&config).await.map_err(fatal)?;

    log::info!("Starting taskgate server at {}", config.server_url());
    log::info!("Admin account: {}", config.admin.username);

    HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(|cfg| routes::config(cfg, &state))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}

fn fatal(error: taskgate::error::AppError) -> io::Error {
    log::error!("{}", error);
    io::Error::other(error.to_string())
}
