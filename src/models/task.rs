use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Task is yet to be started. Every task starts here.
    Open,
    /// Task is currently being worked on.
    InProgress,
    /// Task is completed.
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Open, TaskStatus::InProgress, TaskStatus::Done];
}

/// Input for creating a task.
///
/// There is deliberately no `status` field: new tasks are always `OPEN`, and a
/// `status` key in the request body is ignored.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskInput {
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// Maximum length of 1000 characters if provided.
    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub due_date: Option<DateTime<Utc>>,

    /// Board the task is filed under. Ownership of the board is not checked.
    pub board_id: i32,
}

/// Body of a status transition request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTaskStatusInput {
    pub status: TaskStatus,
}

/// A task as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: TaskStatus,
    pub board_id: i32,
    /// Owner of the task. Only this user can read or change it.
    pub user_id: i32,
}

/// A task record ready to be persisted; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: TaskStatus,
    pub board_id: i32,
    pub user_id: i32,
}

/// The mutable part of a stored task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskPatch {
    pub status: TaskStatus,
}

impl NewTask {
    /// Builds the record for a task created by `owner_id`, always `OPEN`.
    pub fn new(input: CreateTaskInput, owner_id: i32) -> Self {
        Self {
            title: input.title,
            description: input.description,
            due_date: input.due_date,
            status: TaskStatus::Open,
            board_id: input.board_id,
            user_id: owner_id,
        }
    }

    pub fn into_task(self, id: i32) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            status: self.status,
            board_id: self.board_id,
            user_id: self.user_id,
        }
    }
}

impl Task {
    /// Moves the task to `status`. Any status may follow any other.
    pub fn update_status(self, status: TaskStatus) -> Self {
        Self { status, ..self }
    }

    pub fn apply(self, patch: TaskPatch) -> Self {
        self.update_status(patch.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn input() -> CreateTaskInput {
        CreateTaskInput {
            title: "Test Task".to_string(),
            description: Some("Test Description".to_string()),
            due_date: Some(Utc::now()),
            board_id: 1,
        }
    }

    #[test]
    fn test_new_task_is_open_and_owned() {
        let task = NewTask::new(input(), 1);
        assert_eq!(task.title, "Test Task");
        assert_eq!(task.user_id, 1);
        assert_eq!(task.board_id, 1);
        assert_eq!(task.status, TaskStatus::Open);
    }

    #[test]
    fn test_status_in_request_body_is_ignored() {
        let input: CreateTaskInput = serde_json::from_value(serde_json::json!({
            "title": "Sneaky",
            "status": "DONE",
            "boardId": 3
        }))
        .unwrap();

        let task = NewTask::new(input, 9);
        assert_eq!(task.status, TaskStatus::Open);
        assert_eq!(task.board_id, 3);
        assert!(task.due_date.is_none());
    }

    #[test]
    fn test_update_status_changes_only_status() {
        for from in TaskStatus::ALL {
            for to in TaskStatus::ALL {
                let original = Task {
                    status: from,
                    ..NewTask::new(input(), 4).into_task(11)
                };
                let updated = original.clone().update_status(to);
                assert_eq!(updated, Task { status: to, ..original });
            }
        }
    }

    #[test]
    fn test_task_validation() {
        assert!(input().validate().is_ok());

        let empty_title = CreateTaskInput {
            title: "".to_string(),
            ..input()
        };
        assert!(empty_title.validate().is_err());

        let long_title = CreateTaskInput {
            title: "a".repeat(201),
            ..input()
        };
        assert!(long_title.validate().is_err());

        let long_description = CreateTaskInput {
            description: Some("b".repeat(1001)),
            ..input()
        };
        assert!(long_description.validate().is_err());
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        let status: TaskStatus = serde_json::from_str("\"DONE\"").unwrap();
        assert_eq!(status, TaskStatus::Done);
    }
}
