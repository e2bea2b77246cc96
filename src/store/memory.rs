//! In-memory task repository.
//!
//! Backed by a `DashMap`, so operations on different tasks only contend when
//! they hash to the same shard. An update mutates the record while holding that
//! entry's write guard, which makes the completion transition atomic.
//! Nothing survives a restart; this is the fallback when no database is configured.

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::error::AppError;
use crate::models::{NewTask, Task, TaskUpdate};

use super::{TaskFilter, TaskRepository};

#[derive(Debug)]
pub struct InMemoryTaskRepository {
    tasks: DashMap<i32, Task>,
    next_id: AtomicI32,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self {
            tasks: DashMap::new(),
            next_id: AtomicI32::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl Default for InMemoryTaskRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Task>, AppError> {
        Ok(self.tasks.get(&id).map(|entry| entry.value().clone()))
    }

    async fn insert(&self, input: NewTask, now: DateTime<Utc>) -> Result<Task, AppError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let task = Task::new(id, input, now);
        self.tasks.insert(id, task.clone());
        Ok(task)
    }

    async fn update(
        &self,
        id: i32,
        update: TaskUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<Task>, AppError> {
        Ok(self.tasks.get_mut(&id).map(|mut entry| {
            entry.apply_update(update, now);
            entry.value().clone()
        }))
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        Ok(self.tasks.remove(&id).is_some())
    }

    async fn list(&self, filter: TaskFilter) -> Result<Vec<Task>, AppError> {
        let mut tasks: Vec<Task> = self
            .tasks
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        filter.sort(&mut tasks);
        Ok(tasks)
    }
}
