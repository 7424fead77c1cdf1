//! Core types for the task tracker.
//!
//! Wire requests arrive as loosely-typed `*Request` structs and are validated
//! once into the typed values the store works with.

use crate::error::{Result, TaskError};
use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Date format used on the wire and in the store.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self> {
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| TaskError::invalid_value("priority", "Invalid priority value"))
    }
}

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Open, TaskStatus::InProgress, TaskStatus::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Open => "Open",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self> {
        TaskStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| TaskError::invalid_value("status", "Invalid status value"))
    }
}

impl ToSql for Priority {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Priority {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: TaskError| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for TaskStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TaskStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: TaskError| FromSqlError::Other(Box::new(e)))
    }
}

/// A persisted task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub due_date: NaiveDate,
    pub status: TaskStatus,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
}

/// Validated input for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub due_date: NaiveDate,
    pub status: TaskStatus,
}

impl NewTask {
    /// Build a task with default priority and status.
    pub fn new(title: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: Priority::default(),
            due_date,
            status: TaskStatus::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }
}

/// Validated partial update. `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<TaskStatus>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.status.is_none()
    }
}

/// Ordering for task listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Newest first.
    #[default]
    CreatedAt,
    DueDate,
    Priority,
}

impl SortKey {
    /// Unknown values fall back to the default ordering.
    pub fn from_param(s: &str) -> Self {
        match s {
            "due_date" => SortKey::DueDate,
            "priority" => SortKey::Priority,
            _ => SortKey::CreatedAt,
        }
    }
}

/// Filters for task listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub sort_by: SortKey,
}

/// Result of a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteConfirmation {
    pub deleted: bool,
    pub id: i64,
}

// =============================================================================
// Wire requests
// =============================================================================

/// Parse a `YYYY-MM-DD` date.
pub fn parse_due_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| {
        TaskError::invalid_value(
            "due_date",
            format!("Invalid due date '{}', expected YYYY-MM-DD", s),
        )
    })
}

/// Treat empty strings the same as absent values.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Distinguish an explicit `null` from an absent field.
fn deserialize_some<'de, T, D>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Body of `POST /tasks`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
    pub status: Option<String>,
}

impl CreateTaskRequest {
    pub fn validate(self) -> Result<NewTask> {
        let title = non_empty(self.title)
            .ok_or_else(|| TaskError::missing_field("title", "Title is required"))?;
        let due_date = non_empty(self.due_date)
            .ok_or_else(|| TaskError::missing_field("due_date", "Due date is required"))?;
        let due_date = parse_due_date(&due_date)?;

        let priority = match non_empty(self.priority) {
            Some(p) => p.parse()?,
            None => Priority::default(),
        };
        let status = match non_empty(self.status) {
            Some(s) => s.parse()?,
            None => TaskStatus::default(),
        };

        Ok(NewTask {
            title: title.trim().to_string(),
            description: non_empty(self.description).map(|d| d.trim().to_string()),
            priority,
            due_date,
            status,
        })
    }
}

/// Body of `PATCH /tasks/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
    pub status: Option<String>,
}

impl UpdateTaskRequest {
    pub fn validate(self) -> Result<TaskUpdate> {
        let title = match self.title {
            Some(t) if t.trim().is_empty() => {
                return Err(TaskError::invalid_value("title", "Title cannot be empty"));
            }
            Some(t) => Some(t.trim().to_string()),
            None => None,
        };

        Ok(TaskUpdate {
            title,
            description: self
                .description
                .map(|d| non_empty(d).map(|d| d.trim().to_string())),
            priority: self.priority.as_deref().map(str::parse).transpose()?,
            due_date: self.due_date.as_deref().map(parse_due_date).transpose()?,
            status: self.status.as_deref().map(str::parse).transpose()?,
        })
    }
}

/// Query string of `GET /tasks`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListTasksQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
}

impl ListTasksQuery {
    pub fn validate(self) -> Result<TaskFilter> {
        Ok(TaskFilter {
            status: non_empty(self.status).map(|s| s.parse()).transpose()?,
            priority: non_empty(self.priority).map(|p| p.parse()).transpose()?,
            sort_by: self
                .sort_by
                .as_deref()
                .map(SortKey::from_param)
                .unwrap_or_default(),
        })
    }
}

// =============================================================================
// Insights
// =============================================================================

/// Count of active tasks at one priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityCount {
    pub priority: Priority,
    pub count: i64,
}

/// Count of tasks at one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: TaskStatus,
    pub count: i64,
}

/// Aggregate counts over the whole store at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightMetrics {
    pub total_open: i64,
    pub priority_distribution: Vec<PriorityCount>,
    pub due_soon_count: i64,
    pub overdue_count: i64,
    pub status_distribution: Vec<StatusCount>,
}

impl InsightMetrics {
    /// Active tasks at the given priority.
    pub fn active_at(&self, priority: Priority) -> i64 {
        self.priority_distribution
            .iter()
            .filter(|p| p.priority == priority)
            .map(|p| p.count)
            .sum()
    }

    /// All active tasks, summed over the priority distribution.
    pub fn total_active(&self) -> i64 {
        self.priority_distribution.iter().map(|p| p.count).sum()
    }
}

/// Narrative summary plus the metrics it was rendered from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insights {
    pub summary: String,
    pub metrics: InsightMetrics,
}
