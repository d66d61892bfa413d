//! Record storage behind the services.
//!
//! The services depend only on the `UserStore` and `TaskStore` traits. Two
//! implementations ship with the crate: `PgStore` for Postgres, which the server
//! uses, and `MemoryStore`, which backs the unit and integration tests.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{NewTask, NewUser, Task, TaskPatch, User};
use crate::tasks::query::TaskQuery;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// How to find a single user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserLookup<'a> {
    Id(i32),
    Username(&'a str),
    Email(&'a str),
}

impl UserLookup<'_> {
    pub fn matches(&self, user: &User) -> bool {
        match *self {
            UserLookup::Id(id) => user.id == id,
            UserLookup::Username(username) => user.username == username,
            UserLookup::Email(email) => user.email == email,
        }
    }
}

/// Durable credential records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persists a new user.
    ///
    /// Fails with `AppError::AlreadyExists` when the username or the email is
    /// already taken.
    async fn insert(&self, user: NewUser) -> Result<User, AppError>;

    async fn find_one(&self, lookup: UserLookup<'_>) -> Result<Option<User>, AppError>;
}

/// Durable task records.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert(&self, task: NewTask) -> Result<Task, AppError>;

    /// Returns the task with `id` if, and only if, it belongs to `owner_id`.
    async fn find_one(&self, id: i32, owner_id: i32) -> Result<Option<Task>, AppError>;

    /// Returns the tasks selected by `query`, in the order it asks for.
    async fn find(&self, query: &TaskQuery) -> Result<Vec<Task>, AppError>;

    /// Applies `patch` to the task with `id` and returns the stored result.
    async fn update(&self, id: i32, patch: TaskPatch) -> Result<Task, AppError>;
}
