pub mod task;
pub mod user;

pub use task::{CreateTaskInput, NewTask, Task, TaskPatch, TaskStatus, UpdateTaskStatusInput};
pub use user::{NewUser, User, UserSummary};
