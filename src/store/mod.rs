//! Task storage.
//!
//! [`TaskRepository`] is the storage seam: a durable (or in-memory) engine that
//! can find, insert, update, delete and scan tasks. Implementations must apply
//! [`Task::apply_update`] inside the same atomic unit as the write so two
//! concurrent updates of one record never interleave.
//!
//! [`TaskStore`] sits in front of a repository and owns the rules that do not
//! depend on the engine: input validation before any access, not-found mapping,
//! and logging.

pub mod memory;
pub mod postgres;

use std::cmp::Reverse;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use validator::Validate;

use crate::error::AppError;
use crate::models::{NewTask, Task, TaskUpdate};

pub use memory::InMemoryTaskRepository;
pub use postgres::PgTaskRepository;

/// Which tasks a scan returns and in what order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskFilter {
    /// Every task, newest first by creation time.
    All,
    /// Completed tasks, most recently completed first.
    Completed,
    /// Pending tasks, newest first by creation time.
    Pending,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Completed => task.is_completed,
            TaskFilter::Pending => !task.is_completed,
        }
    }

    /// Sorts in place by this filter's ordering. Ties fall back to `id` descending.
    pub fn sort(&self, tasks: &mut [Task]) {
        match self {
            TaskFilter::Completed => {
                tasks.sort_by_key(|task| Reverse((task.completed_at, task.id)))
            }
            TaskFilter::All | TaskFilter::Pending => {
                tasks.sort_by_key(|task| Reverse((task.created_at, task.id)))
            }
        }
    }
}

/// Storage primitives for task records.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Task>, AppError>;

    /// Inserts a pending task created at `now` and returns it with its new identifier.
    async fn insert(&self, input: NewTask, now: DateTime<Utc>) -> Result<Task, AppError>;

    /// Atomically applies `update` to the task, or returns `None` if it does not exist.
    async fn update(
        &self,
        id: i32,
        update: TaskUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<Task>, AppError>;

    /// Returns `true` if a task was removed.
    async fn delete(&self, id: i32) -> Result<bool, AppError>;

    async fn list(&self, filter: TaskFilter) -> Result<Vec<Task>, AppError>;
}

/// The task operations exposed to request handlers.
#[derive(Clone)]
pub struct TaskStore {
    repository: Arc<dyn TaskRepository>,
}

impl TaskStore {
    pub fn new(repository: Arc<dyn TaskRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_all(&self) -> Result<Vec<Task>, AppError> {
        log::debug!("Listing all tasks");
        self.repository.list(TaskFilter::All).await
    }

    pub async fn list_completed(&self) -> Result<Vec<Task>, AppError> {
        log::debug!("Listing completed tasks");
        self.repository.list(TaskFilter::Completed).await
    }

    pub async fn list_pending(&self) -> Result<Vec<Task>, AppError> {
        log::debug!("Listing pending tasks");
        self.repository.list(TaskFilter::Pending).await
    }

    pub async fn get(&self, id: i32) -> Result<Task, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn create(&self, input: NewTask) -> Result<Task, AppError> {
        input.validate()?;
        let task = self.repository.insert(input, Utc::now()).await?;
        log::info!("Created task {}: {}", task.id, task.title);
        Ok(task)
    }

    pub async fn update(&self, id: i32, update: TaskUpdate) -> Result<Task, AppError> {
        update.validate()?;
        let task = self
            .repository
            .update(id, update, Utc::now())
            .await?
            .ok_or_else(|| not_found(id))?;
        log::info!("Updated task {} (completed: {})", task.id, task.is_completed);
        Ok(task)
    }

    /// Returns `false` when there was nothing to delete.
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let removed = self.repository.delete(id).await?;
        if removed {
            log::info!("Deleted task {}", id);
        }
        Ok(removed)
    }
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Task {} not found", id))
}
