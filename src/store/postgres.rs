use async_trait::async_trait;
use sqlx::PgPool;

use super::{TaskStore, UserLookup, UserStore};
use crate::error::AppError;
use crate::models::{NewTask, NewUser, Task, TaskPatch, User};
use crate::tasks::query::{TaskQuery, TaskSortBy};

const USER_COLUMNS: &str = "id, username, email, first_name, last_name, password_hash, salt";
const TASK_COLUMNS: &str = "id, title, description, due_date, status, board_id, user_id";

/// Postgres-backed store. Uniqueness of `username` and `email` comes from the
/// unique indexes created in `migrations/`.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Builds the SELECT for a task query. Parameter `$1` is always the owner id.
///
/// Search uses `strpos` so the needle is matched literally and case-sensitively,
/// without `LIKE` wildcards.
fn task_select_sql(query: &TaskQuery) -> String {
    let mut sql = format!("SELECT {} FROM tasks WHERE user_id = $1", TASK_COLUMNS);
    let mut param_count = 2;

    if query.status().is_some() {
        sql.push_str(&format!(" AND status = ${}", param_count));
        param_count += 1;
    }
    if query.search().is_some() {
        sql.push_str(&format!(
            " AND (strpos(title, ${0}) > 0 OR strpos(COALESCE(description, ''), ${0}) > 0)",
            param_count
        ));
    }

    match query.sort() {
        Some((TaskSortBy::DueDate, order)) => sql.push_str(&format!(
            " ORDER BY due_date {} NULLS LAST, id ASC",
            order.as_sql()
        )),
        None => sql.push_str(" ORDER BY id ASC"),
    }
    sql
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert(&self, user: NewUser) -> Result<User, AppError> {
        let sql = format!(
            "INSERT INTO users (username, email, first_name, last_name, password_hash, salt) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            USER_COLUMNS
        );
        let stored = sqlx::query_as::<_, User>(&sql)
            .bind(user.username)
            .bind(user.email)
            .bind(user.first_name)
            .bind(user.last_name)
            .bind(user.password_hash)
            .bind(user.salt)
            .fetch_one(&self.pool)
            .await?;
        Ok(stored)
    }

    async fn find_one(&self, lookup: UserLookup<'_>) -> Result<Option<User>, AppError> {
        let column = match lookup {
            UserLookup::Id(_) => "id",
            UserLookup::Username(_) => "username",
            UserLookup::Email(_) => "email",
        };
        let sql = format!("SELECT {} FROM users WHERE {} = $1", USER_COLUMNS, column);
        let query = sqlx::query_as::<_, User>(&sql);
        let query = match lookup {
            UserLookup::Id(id) => query.bind(id),
            UserLookup::Username(username) => query.bind(username),
            UserLookup::Email(email) => query.bind(email),
        };
        Ok(query.fetch_optional(&self.pool).await?)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn insert(&self, task: NewTask) -> Result<Task, AppError> {
        let sql = format!(
            "INSERT INTO tasks (title, description, due_date, status, board_id, user_id) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            TASK_COLUMNS
        );
        let stored = sqlx::query_as::<_, Task>(&sql)
            .bind(task.title)
            .bind(task.description)
            .bind(task.due_date)
            .bind(task.status)
            .bind(task.board_id)
            .bind(task.user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(stored)
    }

    async fn find_one(&self, id: i32, owner_id: i32) -> Result<Option<Task>, AppError> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE id = $1 AND user_id = $2",
            TASK_COLUMNS
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn find(&self, query: &TaskQuery) -> Result<Vec<Task>, AppError> {
        let sql = task_select_sql(query);
        let mut query_builder = sqlx::query_as::<_, Task>(&sql).bind(query.owner_id());

        if let Some(status) = query.status() {
            query_builder = query_builder.bind(status);
        }
        if let Some(search) = query.search() {
            query_builder = query_builder.bind(search.to_string());
        }

        Ok(query_builder.fetch_all(&self.pool).await?)
    }

    async fn update(&self, id: i32, patch: TaskPatch) -> Result<Task, AppError> {
        let sql = format!(
            "UPDATE tasks SET status = $1 WHERE id = $2 RETURNING {}",
            TASK_COLUMNS
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(patch.status)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        task.ok_or_else(|| AppError::NotFound("Task not found".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;
    use crate::tasks::query::{SortOrder, TaskFilter};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_filter_sql_is_owner_scoped() {
        let query = TaskQuery::for_owner_id(TaskFilter::default(), 1);
        assert_eq!(
            task_select_sql(&query),
            "SELECT id, title, description, due_date, status, board_id, user_id \
             FROM tasks WHERE user_id = $1 ORDER BY id ASC"
        );
    }

    #[test]
    fn test_full_filter_sql() {
        let filter = TaskFilter {
            status: Some(TaskStatus::Done),
            search: Some("title".to_string()),
            sort_by: Some(TaskSortBy::DueDate),
            order_by: Some(SortOrder::Desc),
        };
        let sql = task_select_sql(&TaskQuery::for_owner_id(filter, 1));

        assert!(sql.contains("WHERE user_id = $1 AND status = $2"));
        assert!(sql.contains("strpos(title, $3) > 0"));
        assert!(sql.contains("strpos(COALESCE(description, ''), $3) > 0"));
        assert!(sql.ends_with("ORDER BY due_date DESC NULLS LAST, id ASC"));
    }

    #[test]
    fn test_search_without_status_uses_second_parameter() {
        let filter = TaskFilter {
            search: Some("x".to_string()),
            ..Default::default()
        };
        let sql = task_select_sql(&TaskQuery::for_owner_id(filter, 1));
        assert!(sql.contains("strpos(title, $2) > 0"));
        assert!(!sql.contains("$3"));
    }
}
