use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A task entity as stored in the database and returned by the API.
///
/// `deleted_at` is the soft-delete marker: once set, the row is permanently
/// excluded from every query but physically retained.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub is_done: bool,
    pub due_date: Option<DateTime<Utc>>,
    /// Free-text tags, e.g. "work,errands".
    pub tags: Option<String>,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Payload for creating a task (also used for full `PUT` updates).
#[derive(Debug, Deserialize, Validate)]
pub struct TaskCreate {
    /// Must be between 3 and 100 characters.
    #[validate(length(min = 3, max = 100, message = "title length must be 3-100"))]
    pub title: String,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub due_date: Option<DateTime<Utc>>,

    #[validate(length(max = 255))]
    pub tags: Option<String>,
}

/// Partial update payload. An absent field means "leave unchanged", never
/// "clear".
#[derive(Debug, Default, Deserialize, Validate)]
pub struct TaskUpdate {
    #[validate(length(min = 3, max = 100, message = "title length must be 3-100"))]
    pub title: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub is_done: Option<bool>,

    pub due_date: Option<DateTime<Utc>>,

    #[validate(length(max = 255))]
    pub tags: Option<String>,
}

/// Query parameters accepted when listing tasks.
///
/// Pagination can be expressed either directly (`limit`/`offset`) or through
/// the `page`/`page_size` convenience pair; page 1 maps to offset 0.
#[derive(Debug, Deserialize)]
pub struct TaskQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    /// Substring filter on the title.
    pub q: Option<String>,
    pub is_done: Option<bool>,
    /// `"created_at"` for ascending, `"-created_at"` for descending. Other
    /// values are ignored.
    pub sort: Option<String>,
}

impl TaskQuery {
    /// Resolves the effective limit/offset pair. `page`/`page_size` win over
    /// `limit`/`offset` when given. The limit is clamped to [1, 100].
    pub fn limit_offset(&self) -> (i64, i64) {
        if let Some(page) = self.page {
            let page = page.max(1);
            let size = self.page_size.unwrap_or(10).clamp(1, 100);
            return (size, (page - 1) * size);
        }
        let limit = self.limit.unwrap_or(10).clamp(1, 100);
        let offset = self.offset.unwrap_or(0).max(0);
        (limit, offset)
    }
}

/// One page of tasks plus the total count for the same filter.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskPage {
    pub items: Vec<Task>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}
