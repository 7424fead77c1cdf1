//! Task CRUD operations.

use super::{Database, now_ms};
use crate::error::{Result, TaskError};
use crate::types::{DeleteConfirmation, NewTask, SortKey, Task, TaskFilter, TaskUpdate};
use rusqlite::types::ToSql;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::{debug, info};

/// Build an ORDER BY clause for the given sort key.
/// Ties always fall back to the id so listings are deterministic.
fn build_order_clause(sort_by: SortKey) -> &'static str {
    match sort_by {
        SortKey::DueDate => " ORDER BY due_date ASC, id ASC",
        SortKey::Priority => {
            " ORDER BY CASE priority WHEN 'High' THEN 1 WHEN 'Medium' THEN 2 ELSE 3 END, id ASC"
        }
        SortKey::CreatedAt => " ORDER BY created_at DESC, id DESC",
    }
}

pub fn parse_task_row(row: &Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        priority: row.get("priority")?,
        due_date: row.get("due_date")?,
        status: row.get("status")?,
        created_at: row.get("created_at")?,
    })
}

/// Internal helper to get a task using an existing connection (avoids deadlock).
fn get_task_internal(conn: &Connection, task_id: i64) -> Result<Option<Task>> {
    let task = conn
        .query_row(
            "SELECT * FROM tasks WHERE id = ?1",
            params![task_id],
            parse_task_row,
        )
        .optional()?;
    Ok(task)
}

impl Database {
    /// Insert a new task. The store assigns the id and creation timestamp.
    pub fn create_task(&self, new: &NewTask) -> Result<Task> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO tasks (title, description, priority, due_date, status, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    new.title,
                    new.description,
                    new.priority,
                    new.due_date,
                    new.status,
                    now_ms()
                ],
            )?;
            let id = conn.last_insert_rowid();
            info!(task_id = id, priority = %new.priority, status = %new.status, "Task created");

            get_task_internal(conn, id)?.ok_or(TaskError::NotFound(id))
        })
    }

    /// Get a task by id.
    pub fn get_task(&self, task_id: i64) -> Result<Task> {
        self.with_conn(|conn| get_task_internal(conn, task_id)?.ok_or(TaskError::NotFound(task_id)))
    }

    /// List tasks matching the filter, in the requested order.
    pub fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        self.with_conn(|conn| {
            let mut sql = String::from("SELECT * FROM tasks WHERE 1=1");
            let mut values: Vec<&dyn ToSql> = Vec::new();

            if let Some(ref status) = filter.status {
                sql.push_str(" AND status = ?");
                values.push(status);
            }
            if let Some(ref priority) = filter.priority {
                sql.push_str(" AND priority = ?");
                values.push(priority);
            }
            sql.push_str(build_order_clause(filter.sort_by));

            let mut stmt = conn.prepare(&sql)?;
            let tasks = stmt
                .query_map(values.as_slice(), parse_task_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            debug!(count = tasks.len(), ?filter, "Listed tasks");
            Ok(tasks)
        })
    }

    /// Apply a partial update and return the task as stored afterwards.
    pub fn update_task(&self, task_id: i64, update: &TaskUpdate) -> Result<Task> {
        if update.is_empty() {
            return Err(TaskError::no_update_fields());
        }

        self.with_conn(|conn| {
            let mut sets: Vec<&str> = Vec::new();
            let mut values: Vec<&dyn ToSql> = Vec::new();

            if let Some(ref title) = update.title {
                sets.push("title = ?");
                values.push(title);
            }
            if let Some(ref description) = update.description {
                sets.push("description = ?");
                values.push(description);
            }
            if let Some(ref priority) = update.priority {
                sets.push("priority = ?");
                values.push(priority);
            }
            if let Some(ref due_date) = update.due_date {
                sets.push("due_date = ?");
                values.push(due_date);
            }
            if let Some(ref status) = update.status {
                sets.push("status = ?");
                values.push(status);
            }
            values.push(&task_id);

            let sql = format!("UPDATE tasks SET {} WHERE id = ?", sets.join(", "));
            let changed = conn.execute(&sql, values.as_slice())?;
            if changed == 0 {
                return Err(TaskError::NotFound(task_id));
            }
            info!(task_id, fields = sets.len(), "Task updated");

            get_task_internal(conn, task_id)?.ok_or(TaskError::NotFound(task_id))
        })
    }

    /// Hard-delete a task.
    pub fn delete_task(&self, task_id: i64) -> Result<DeleteConfirmation> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM tasks WHERE id = ?1", params![task_id])?;
            if deleted == 0 {
                return Err(TaskError::NotFound(task_id));
            }
            info!(task_id, "Task deleted");

            Ok(DeleteConfirmation {
                deleted: true,
                id: task_id,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_clause_breaks_ties_by_id() {
        assert!(build_order_clause(SortKey::DueDate).ends_with("id ASC"));
        assert!(build_order_clause(SortKey::Priority).ends_with("id ASC"));
        assert!(build_order_clause(SortKey::CreatedAt).ends_with("id DESC"));
    }
}
