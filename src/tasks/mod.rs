pub mod query;
pub mod service;

pub use query::{SortOrder, TaskFilter, TaskQuery, TaskSortBy};
pub use service::TaskService;
