use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::{Task, TaskCreate, TaskUpdate};

use super::storage_error;

const TASK_COLUMNS: &str =
    "id, title, description, is_done, due_date, tags, owner_id, created_at, updated_at, deleted_at";

/// Owner-scoped task storage.
///
/// Every predicate here includes `owner_id = ? AND deleted_at IS NULL`; a task
/// is never visible to, or mutable by, anyone but its owner, and a
/// soft-deleted task is gone from every query.
#[derive(Clone)]
pub struct TaskRepo {
    pool: SqlitePool,
}

impl TaskRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, owner_id: i64, data: &TaskCreate) -> Result<Task, AppError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO tasks (title, description, is_done, due_date, tags, owner_id, created_at, updated_at)
             VALUES (?, ?, 0, ?, ?, ?, ?, ?)
             RETURNING {}",
            TASK_COLUMNS
        );
        sqlx::query_as::<_, Task>(&sql)
            .bind(&data.title)
            .bind(&data.description)
            .bind(data.due_date)
            .bind(&data.tags)
            .bind(owner_id)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage_error("creating task", e))
    }

    pub async fn get(&self, task_id: i64, owner_id: i64) -> Result<Option<Task>, AppError> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE id = ? AND owner_id = ? AND deleted_at IS NULL",
            TASK_COLUMNS
        );
        sqlx::query_as::<_, Task>(&sql)
            .bind(task_id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("fetching task", e))
    }

    /// Field-merge update: only fields present in `changes` overwrite the
    /// stored values; an absent field is left unchanged. `updated_at` is
    /// always refreshed. Returns `None` when the task does not exist for this
    /// owner.
    pub async fn update(
        &self,
        task_id: i64,
        owner_id: i64,
        changes: &TaskUpdate,
    ) -> Result<Option<Task>, AppError> {
        let sql = format!(
            "UPDATE tasks
             SET title = COALESCE(?, title),
                 description = COALESCE(?, description),
                 is_done = COALESCE(?, is_done),
                 due_date = COALESCE(?, due_date),
                 tags = COALESCE(?, tags),
                 updated_at = ?
             WHERE id = ? AND owner_id = ? AND deleted_at IS NULL
             RETURNING {}",
            TASK_COLUMNS
        );
        sqlx::query_as::<_, Task>(&sql)
            .bind(&changes.title)
            .bind(&changes.description)
            .bind(changes.is_done)
            .bind(changes.due_date)
            .bind(&changes.tags)
            .bind(Utc::now())
            .bind(task_id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("updating task", e))
    }

    /// Soft delete: stamps `deleted_at` instead of removing the row. Returns
    /// false when nothing matched.
    pub async fn soft_delete(&self, task_id: i64, owner_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE tasks SET deleted_at = ? WHERE id = ? AND owner_id = ? AND deleted_at IS NULL",
        )
        .bind(Utc::now())
        .bind(task_id)
        .bind(owner_id)
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error("soft-deleting task", e))?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists one page of the owner's tasks plus the total count for the same
    /// filter predicate (without limit/offset), for pagination metadata.
    pub async fn list(
        &self,
        owner_id: i64,
        q: Option<&str>,
        is_done: Option<bool>,
        sort: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Task>, i64), AppError> {
        let mut filter = String::from("WHERE owner_id = ? AND deleted_at IS NULL");
        if q.is_some() {
            filter.push_str(" AND title LIKE ?");
        }
        if is_done.is_some() {
            filter.push_str(" AND is_done = ?");
        }

        let mut sql = format!("SELECT {} FROM tasks {}", TASK_COLUMNS, filter);
        match sort {
            Some("created_at") => sql.push_str(" ORDER BY created_at ASC"),
            Some("-created_at") => sql.push_str(" ORDER BY created_at DESC"),
            _ => {}
        }
        sql.push_str(" LIMIT ? OFFSET ?");

        let mut query = sqlx::query_as::<_, Task>(&sql).bind(owner_id);
        if let Some(q) = q {
            query = query.bind(format!("%{}%", q));
        }
        if let Some(is_done) = is_done {
            query = query.bind(is_done);
        }
        let items = query
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_error("listing tasks", e))?;

        let count_sql = format!("SELECT COUNT(*) FROM tasks {}", filter);
        let mut count_query = sqlx::query_as::<_, (i64,)>(&count_sql).bind(owner_id);
        if let Some(q) = q {
            count_query = count_query.bind(format!("%{}%", q));
        }
        if let Some(is_done) = is_done {
            count_query = count_query.bind(is_done);
        }
        let (total,) = count_query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage_error("counting tasks", e))?;

        Ok((items, total))
    }

    /// Incomplete tasks whose due date lies in the past.
    pub async fn overdue(&self, owner_id: i64) -> Result<Vec<Task>, AppError> {
        let sql = format!(
            "SELECT {} FROM tasks
             WHERE owner_id = ? AND deleted_at IS NULL AND is_done = 0
               AND due_date IS NOT NULL AND due_date < ?",
            TASK_COLUMNS
        );
        sqlx::query_as::<_, Task>(&sql)
            .bind(owner_id)
            .bind(Utc::now())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_error("listing overdue tasks", e))
    }

    /// Incomplete tasks due within today's UTC calendar bounds.
    pub async fn due_today(&self, owner_id: i64) -> Result<Vec<Task>, AppError> {
        let (day_start, day_end) = today_utc_bounds();
        let sql = format!(
            "SELECT {} FROM tasks
             WHERE owner_id = ? AND deleted_at IS NULL AND is_done = 0
               AND due_date IS NOT NULL AND due_date >= ? AND due_date <= ?",
            TASK_COLUMNS
        );
        sqlx::query_as::<_, Task>(&sql)
            .bind(owner_id)
            .bind(day_start)
            .bind(day_end)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_error("listing tasks due today", e))
    }
}

fn today_utc_bounds() -> (DateTime<Utc>, DateTime<Utc>) {
    let today = Utc::now().date_naive();
    let start = today.and_hms_opt(0, 0, 0).expect("valid timestamp").and_utc();
    let end = today
        .and_hms_micro_opt(23, 59, 59, 999_999)
        .expect("valid timestamp")
        .and_utc();
    (start, end)
}
