//! Owner-scoped task queries.
//!
//! A `TaskFilter` is what the caller asks for; a `TaskQuery` is that filter bound
//! to one owner. Stores only ever receive a `TaskQuery`, so there is no way to
//! ask a store for tasks without naming whose tasks they are.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::models::{Task, TaskStatus, User};

/// Field a task listing can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskSortBy {
    #[serde(rename = "dueDate")]
    DueDate,
}

/// Sort direction; ascending unless asked otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Query parameters for listing tasks.
///
/// Every field is optional. A missing `status` or `search` places no restriction
/// on that dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    /// Case-sensitive substring of the title or the description.
    pub search: Option<String>,
    pub sort_by: Option<TaskSortBy>,
    /// Only meaningful together with `sort_by`.
    pub order_by: Option<SortOrder>,
}

/// A `TaskFilter` bound to the user whose tasks may be returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskQuery {
    owner_id: i32,
    status: Option<TaskStatus>,
    search: Option<String>,
    sort: Option<(TaskSortBy, SortOrder)>,
}

impl TaskQuery {
    pub fn scoped(filter: TaskFilter, owner: &User) -> Self {
        Self::for_owner_id(filter, owner.id)
    }

    pub(crate) fn for_owner_id(filter: TaskFilter, owner_id: i32) -> Self {
        Self {
            owner_id,
            status: filter.status,
            search: filter.search,
            sort: filter
                .sort_by
                .map(|field| (field, filter.order_by.unwrap_or_default())),
        }
    }

    pub fn owner_id(&self) -> i32 {
        self.owner_id
    }

    pub fn status(&self) -> Option<TaskStatus> {
        self.status
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn sort(&self) -> Option<(TaskSortBy, SortOrder)> {
        self.sort
    }

    /// Whether `task` belongs in the result set, ignoring order.
    pub fn matches(&self, task: &Task) -> bool {
        if task.user_id != self.owner_id {
            return false;
        }
        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }
        match self.search.as_deref() {
            Some(needle) => {
                task.title.contains(needle)
                    || task
                        .description
                        .as_deref()
                        .is_some_and(|description| description.contains(needle))
            }
            None => true,
        }
    }

    /// Orders `tasks`, which must already be in insertion order.
    ///
    /// Undated tasks go last in either direction and ties keep insertion order.
    pub fn order(&self, tasks: &mut [Task]) {
        let Some((TaskSortBy::DueDate, order)) = self.sort else {
            return;
        };
        // sort_by is stable, so equal due dates keep their insertion order.
        tasks.sort_by(|a, b| match (a.due_date, b.due_date) {
            (Some(a), Some(b)) => match order {
                SortOrder::Asc => a.cmp(&b),
                SortOrder::Desc => b.cmp(&a),
            },
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
    }

    /// Filters and orders an insertion-ordered slice of tasks.
    pub fn apply<'a, I>(&self, tasks: I) -> Vec<Task>
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let mut selected: Vec<Task> = tasks
            .into_iter()
            .filter(|task| self.matches(task))
            .cloned()
            .collect();
        self.order(&mut selected);
        selected
    }
}
