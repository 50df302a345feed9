//! Business rules atop the task repository.
//!
//! Every operation takes the authenticated owner's id; a task that does not
//! exist and a task that belongs to someone else are both reported as
//! `NotFound`, deliberately indistinguishable to the caller.

use crate::error::AppError;
use crate::models::{Task, TaskCreate, TaskUpdate};
use crate::repo::TaskRepo;

#[derive(Clone)]
pub struct TaskService {
    tasks: TaskRepo,
}

impl TaskService {
    pub fn new(tasks: TaskRepo) -> Self {
        Self { tasks }
    }

    /// Title length is validated by the boundary payload contract.
    pub async fn create(&self, owner_id: i64, data: &TaskCreate) -> Result<Task, AppError> {
        self.tasks.create(owner_id, data).await
    }

    pub async fn get(&self, task_id: i64, owner_id: i64) -> Result<Task, AppError> {
        self.tasks
            .get(task_id, owner_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".into()))
    }

    /// Merges the partial payload into the stored task and refreshes
    /// `updated_at`. Concurrent updates to the same task are
    /// last-write-wins.
    pub async fn update(
        &self,
        task_id: i64,
        owner_id: i64,
        changes: &TaskUpdate,
    ) -> Result<Task, AppError> {
        // Ownership pre-check; covers "doesn't exist" and "not yours" alike.
        self.get(task_id, owner_id).await?;
        self.tasks
            .update(task_id, owner_id, changes)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".into()))
    }

    pub async fn delete(&self, task_id: i64, owner_id: i64) -> Result<(), AppError> {
        if !self.tasks.soft_delete(task_id, owner_id).await? {
            return Err(AppError::NotFound("Task not found".into()));
        }
        Ok(())
    }

    pub async fn mark_complete(&self, task_id: i64, owner_id: i64) -> Result<Task, AppError> {
        let changes = TaskUpdate {
            is_done: Some(true),
            ..Default::default()
        };
        self.update(task_id, owner_id, &changes).await
    }

    pub async fn list(
        &self,
        owner_id: i64,
        q: Option<&str>,
        is_done: Option<bool>,
        sort: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Task>, i64), AppError> {
        self.tasks
            .list(owner_id, q, is_done, sort, limit, offset)
            .await
    }

    pub async fn overdue(&self, owner_id: i64) -> Result<Vec<Task>, AppError> {
        self.tasks.overdue(owner_id).await
    }

    pub async fn due_today(&self, owner_id: i64) -> Result<Vec<Task>, AppError> {
        self.tasks.due_today(owner_id).await
    }
}
