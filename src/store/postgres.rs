use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::{NewTask, Task, TaskUpdate};

use super::{TaskFilter, TaskRepository};

const TASK_COLUMNS: &str = "id, title, description, is_completed, created_at, completed_at";

/// Postgres-backed repository. Migrations in `migrations/` run on connect.
#[derive(Clone)]
pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self::new(pool))
    }
}

fn list_query(filter: TaskFilter) -> String {
    let clause = match filter {
        TaskFilter::All => "ORDER BY created_at DESC, id DESC",
        TaskFilter::Completed => "WHERE is_completed ORDER BY completed_at DESC, id DESC",
        TaskFilter::Pending => "WHERE NOT is_completed ORDER BY created_at DESC, id DESC",
    };
    format!("SELECT {} FROM tasks {}", TASK_COLUMNS, clause)
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1",
            TASK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    async fn insert(&self, input: NewTask, now: DateTime<Utc>) -> Result<Task, AppError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (title, description, is_completed, created_at, completed_at)
             VALUES ($1, $2, FALSE, $3, NULL)
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(input.title)
        .bind(input.description)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(task)
    }

    async fn update(
        &self,
        id: i32,
        update: TaskUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<Task>, AppError> {
        let mut tx = self.pool.begin().await?;

        // Row lock: a concurrent update of the same task waits for this commit.
        let existing = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1 FOR UPDATE",
            TASK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(mut task) = existing else {
            return Ok(None);
        };
        task.apply_update(update, now);

        let updated = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks
             SET title = $1, description = $2, is_completed = $3, completed_at = $4
             WHERE id = $5
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.is_completed)
        .bind(task.completed_at)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, filter: TaskFilter) -> Result<Vec<Task>, AppError> {
        let tasks = sqlx::query_as::<_, Task>(&list_query(filter))
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }
}
