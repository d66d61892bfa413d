use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{TaskStore, UserLookup, UserStore};
use crate::error::AppError;
use crate::models::{NewTask, NewUser, Task, TaskPatch, User};
use crate::tasks::query::TaskQuery;

/// In-process store holding users and tasks in insertion order.
///
/// Ids start at 1 and are never reused, so a vector index is `id - 1`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    tasks: RwLock<Vec<Task>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn next_id(len: usize) -> Result<i32, AppError> {
    i32::try_from(len + 1)
        .map_err(|_| AppError::DatabaseError("Identifier space exhausted".into()))
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        if users
            .iter()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(AppError::AlreadyExists(
                "Username or email already exists".into(),
            ));
        }

        let stored = User {
            id: next_id(users.len())?,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            password_hash: user.password_hash,
            salt: user.salt,
        };
        users.push(stored.clone());
        Ok(stored)
    }

    async fn find_one(&self, lookup: UserLookup<'_>) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| lookup.matches(u)).cloned())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn insert(&self, task: NewTask) -> Result<Task, AppError> {
        let mut tasks = self.tasks.write().await;
        let stored = task.into_task(next_id(tasks.len())?);
        tasks.push(stored.clone());
        Ok(stored)
    }

    async fn find_one(&self, id: i32, owner_id: i32) -> Result<Option<Task>, AppError> {
        let tasks = self.tasks.read().await;
        Ok(tasks
            .iter()
            .find(|t| t.id == id && t.user_id == owner_id)
            .cloned())
    }

    async fn find(&self, query: &TaskQuery) -> Result<Vec<Task>, AppError> {
        let tasks = self.tasks.read().await;
        Ok(query.apply(tasks.iter()))
    }

    async fn update(&self, id: i32, patch: TaskPatch) -> Result<Task, AppError> {
        let mut tasks = self.tasks.write().await;
        let slot = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
        *slot = slot.clone().apply(patch);
        Ok(slot.clone())
    }
}
