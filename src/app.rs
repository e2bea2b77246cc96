use std::sync::Arc;

use actix_web::web;

use crate::auth::{AuthMiddleware, AuthService};
use crate::config::Config;
use crate::error::AppError;
use crate::store::{InMemoryTaskRepository, PgTaskRepository, TaskRepository, TaskStore};

/// Everything the HTTP layer shares across workers.
#[derive(Clone)]
pub struct AppState {
    pub auth: web::Data<AuthService>,
    pub tasks: web::Data<TaskStore>,
}

impl AppState {
    /// # Errors
    /// Fails with `AppError::Configuration` if the signing secret is empty.
    pub fn new(config: &Config, repository: Arc<dyn TaskRepository>) -> Result<Self, AppError> {
        Ok(Self {
            auth: web::Data::new(AuthService::new(config)?),
            tasks: web::Data::new(TaskStore::new(repository)),
        })
    }

    /// Connects the configured repository: Postgres when `DATABASE_URL` is set,
    /// otherwise a process-local in-memory store.
    pub async fn from_config(config: &Config) -> Result<Self, AppError> {
        let repository: Arc<dyn TaskRepository> = match &config.database_url {
            Some(url) => {
                log::info!("Connecting to Postgres task store");
                Arc::new(PgTaskRepository::connect(url).await?)
            }
            None => {
                log::warn!("DATABASE_URL not set; tasks are kept in memory only");
                Arc::new(InMemoryTaskRepository::new())
            }
        };
        Self::new(config, repository)
    }

    /// A fresh access gate bound to this state's token service.
    pub fn gate(&self) -> AuthMiddleware {
        AuthMiddleware::new(self.auth.tokens())
    }
}
