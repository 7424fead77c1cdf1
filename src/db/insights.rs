//! Aggregation queries feeding the insight generator.

use super::Database;
use crate::error::Result;
use crate::insights::render_summary;
use crate::types::{InsightMetrics, Insights, Priority, PriorityCount, StatusCount, TaskStatus};
use chrono::{Days, Local, NaiveDate};
use rusqlite::{Connection, params};
use tracing::debug;

/// Default look-ahead for "due soon", in days.
pub const DEFAULT_DUE_SOON_DAYS: u32 = 7;

fn count_open(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM tasks WHERE status = ?1",
        params![TaskStatus::Open],
        |row| row.get(0),
    )
}

fn priority_distribution(conn: &Connection) -> rusqlite::Result<Vec<PriorityCount>> {
    let mut stmt = conn.prepare(
        "SELECT priority, COUNT(*) FROM tasks
         WHERE status != ?1
         GROUP BY priority",
    )?;
    let counts = stmt
        .query_map(params![TaskStatus::Done], |row| {
            Ok(PriorityCount {
                priority: row.get::<_, Priority>(0)?,
                count: row.get(1)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(counts)
}

fn count_due_between(conn: &Connection, from: NaiveDate, to: NaiveDate) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM tasks
         WHERE status != ?1 AND due_date BETWEEN ?2 AND ?3",
        params![TaskStatus::Done, from, to],
        |row| row.get(0),
    )
}

fn count_overdue(conn: &Connection, today: NaiveDate) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM tasks WHERE status != ?1 AND due_date < ?2",
        params![TaskStatus::Done, today],
        |row| row.get(0),
    )
}

fn status_distribution(conn: &Connection) -> rusqlite::Result<Vec<StatusCount>> {
    let mut stmt = conn.prepare("SELECT status, COUNT(*) FROM tasks GROUP BY status")?;
    let counts = stmt
        .query_map([], |row| {
            Ok(StatusCount {
                status: row.get::<_, TaskStatus>(0)?,
                count: row.get(1)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(counts)
}

impl Database {
    /// Aggregate counts as of `today`, with a due-soon window of
    /// `[today, today + due_soon_days]` inclusive.
    pub fn insight_metrics(&self, today: NaiveDate, due_soon_days: u32) -> Result<InsightMetrics> {
        let horizon = today
            .checked_add_days(Days::new(u64::from(due_soon_days)))
            .unwrap_or(NaiveDate::MAX);

        self.with_conn(|conn| {
            Ok(InsightMetrics {
                total_open: count_open(conn)?,
                priority_distribution: priority_distribution(conn)?,
                due_soon_count: count_due_between(conn, today, horizon)?,
                overdue_count: count_overdue(conn, today)?,
                status_distribution: status_distribution(conn)?,
            })
        })
    }

    /// Compute insights relative to an explicit reference date.
    pub fn compute_insights_as_of(&self, today: NaiveDate, due_soon_days: u32) -> Result<Insights> {
        let metrics = self.insight_metrics(today, due_soon_days)?;
        let summary = render_summary(&metrics, due_soon_days);
        debug!(
            %today,
            total_open = metrics.total_open,
            overdue = metrics.overdue_count,
            due_soon = metrics.due_soon_count,
            "Computed insights"
        );
        Ok(Insights { summary, metrics })
    }

    /// Compute insights for the server's local calendar date.
    pub fn compute_insights(&self, due_soon_days: u32) -> Result<Insights> {
        self.compute_insights_as_of(Local::now().date_naive(), due_soon_days)
    }
}
