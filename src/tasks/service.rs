use std::sync::Arc;

use crate::error::AppError;
use crate::models::{CreateTaskInput, NewTask, Task, TaskPatch, TaskStatus, User};
use crate::store::TaskStore;
use crate::tasks::query::{TaskFilter, TaskQuery};

/// Task operations, each performed on behalf of one owner.
pub struct TaskService {
    tasks: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskStore>) -> Self {
        Self { tasks }
    }

    /// Lists `owner`'s tasks matching `filter`. Never returns another user's task.
    pub async fn query(&self, filter: TaskFilter, owner: &User) -> Result<Vec<Task>, AppError> {
        let query = TaskQuery::scoped(filter, owner);
        self.tasks.find(&query).await
    }

    /// Creates an `OPEN` task owned by `owner`.
    pub async fn create(&self, input: CreateTaskInput, owner: &User) -> Result<Task, AppError> {
        let task = self.tasks.insert(NewTask::new(input, owner.id)).await?;
        log::info!("User {} created task {}", owner.id, task.id);
        Ok(task)
    }

    /// Returns `owner`'s task with `id`. Tasks of other users are reported as
    /// missing.
    pub async fn get(&self, id: i32, owner: &User) -> Result<Task, AppError> {
        self.tasks
            .find_one(id, owner.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".into()))
    }

    /// Persists a status transition of `task`.
    pub async fn update_status(&self, task: Task, status: TaskStatus) -> Result<Task, AppError> {
        let id = task.id;
        let patch = TaskPatch {
            status: task.update_status(status).status,
        };
        self.tasks.update(id, patch).await
    }

    /// Looks up `owner`'s task and moves it to `status`.
    pub async fn set_status(
        &self,
        id: i32,
        status: TaskStatus,
        owner: &User,
    ) -> Result<Task, AppError> {
        let task = self.get(id, owner).await?;
        self.update_status(task, status).await
    }
}
