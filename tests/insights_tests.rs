//! Integration tests for insight aggregation and summary rendering.
//!
//! All tests pin "today" so due-date arithmetic is deterministic.

use chrono::{Days, NaiveDate};
use task_tracker::db::Database;
use task_tracker::types::{NewTask, Priority, TaskStatus, TaskUpdate};

const WINDOW: u32 = 7;

fn setup_db() -> Database {
    Database::open_in_memory().expect("Failed to create in-memory database")
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

fn plus(days: u64) -> NaiveDate {
    today().checked_add_days(Days::new(days)).unwrap()
}

fn minus(days: u64) -> NaiveDate {
    today().checked_sub_days(Days::new(days)).unwrap()
}

fn add(db: &Database, due: NaiveDate, priority: Priority, status: TaskStatus) {
    db.create_task(
        &NewTask::new("task", due)
            .with_priority(priority)
            .with_status(status),
    )
    .unwrap();
}

#[test]
fn empty_store_is_clear() {
    let db = setup_db();

    let insights = db.compute_insights_as_of(today(), WINDOW).unwrap();
    let m = &insights.metrics;

    assert_eq!(m.total_open, 0);
    assert_eq!(m.overdue_count, 0);
    assert_eq!(m.due_soon_count, 0);
    assert!(m.priority_distribution.is_empty());
    assert!(m.status_distribution.is_empty());
    assert_eq!(
        insights.summary,
        "🎉 Great job! You have no open tasks. \
         ✨ Your task list is clear. Time to relax or take on new challenges!"
    );
}

#[test]
fn task_due_in_three_days_is_due_soon() {
    let db = setup_db();
    add(&db, plus(3), Priority::Medium, TaskStatus::Open);

    let insights = db.compute_insights_as_of(today(), WINDOW).unwrap();
    assert_eq!(insights.metrics.due_soon_count, 1);
    assert_eq!(insights.metrics.overdue_count, 0);
    assert!(insights.summary.contains("1 task is due within the next 7 days."));
}

#[test]
fn due_soon_window_is_inclusive() {
    let db = setup_db();
    add(&db, today(), Priority::Low, TaskStatus::Open);
    add(&db, plus(7), Priority::Low, TaskStatus::Open);
    add(&db, plus(8), Priority::Low, TaskStatus::Open);

    let metrics = db.insight_metrics(today(), WINDOW).unwrap();
    assert_eq!(metrics.due_soon_count, 2);
    assert_eq!(metrics.overdue_count, 0);
}

#[test]
fn task_due_yesterday_is_overdue() {
    let db = setup_db();
    add(&db, minus(1), Priority::Medium, TaskStatus::Open);

    let insights = db.compute_insights_as_of(today(), WINDOW).unwrap();
    assert_eq!(insights.metrics.overdue_count, 1);
    assert_eq!(insights.metrics.due_soon_count, 0);
    assert!(insights.summary.contains("1 task is overdue"));
    assert!(!insights.summary.contains("Your task list is clear."));
}

#[test]
fn done_tasks_are_never_overdue_or_due_soon() {
    let db = setup_db();
    add(&db, minus(5), Priority::High, TaskStatus::Done);
    add(&db, plus(1), Priority::High, TaskStatus::Done);

    let metrics = db.insight_metrics(today(), WINDOW).unwrap();
    assert_eq!(metrics.overdue_count, 0);
    assert_eq!(metrics.due_soon_count, 0);
    assert!(metrics.priority_distribution.is_empty());
    assert_eq!(metrics.status_distribution.len(), 1);
    assert_eq!(metrics.status_distribution[0].status, TaskStatus::Done);
    assert_eq!(metrics.status_distribution[0].count, 2);
}

#[test]
fn eleven_open_tasks_is_heavy_workload() {
    let db = setup_db();
    for _ in 0..11 {
        add(&db, plus(30), Priority::Medium, TaskStatus::Open);
    }

    let insights = db.compute_insights_as_of(today(), WINDOW).unwrap();
    assert_eq!(insights.metrics.total_open, 11);
    assert!(
        insights
            .summary
            .starts_with("⚠️ You have 11 open tasks - your workload is quite heavy.")
    );
}

#[test]
fn five_of_seven_high_priority_is_seventy_one_percent() {
    let db = setup_db();
    for _ in 0..5 {
        add(&db, plus(30), Priority::High, TaskStatus::Open);
    }
    add(&db, plus(30), Priority::Low, TaskStatus::InProgress);
    add(&db, plus(30), Priority::Medium, TaskStatus::Open);
    // Done tasks do not count toward the active share.
    add(&db, plus(30), Priority::Low, TaskStatus::Done);

    let insights = db.compute_insights_as_of(today(), WINDOW).unwrap();
    assert_eq!(insights.metrics.total_active(), 7);
    assert_eq!(insights.metrics.active_at(Priority::High), 5);
    assert!(insights.summary.contains(
        "71% of your active tasks are high priority. Consider focusing on these first."
    ));
}

#[test]
fn in_progress_counts_as_active_but_not_open() {
    let db = setup_db();
    add(&db, plus(2), Priority::Medium, TaskStatus::InProgress);

    let insights = db.compute_insights_as_of(today(), WINDOW).unwrap();
    assert_eq!(insights.metrics.total_open, 0);
    assert_eq!(insights.metrics.due_soon_count, 1);
    assert_eq!(insights.metrics.total_active(), 1);
    assert!(insights.summary.starts_with("🎉 Great job! You have no open tasks."));
}

#[test]
fn many_overdue_is_demanding() {
    let db = setup_db();
    for _ in 0..4 {
        add(&db, minus(2), Priority::Low, TaskStatus::Open);
    }

    let insights = db.compute_insights_as_of(today(), WINDOW).unwrap();
    assert!(insights.summary.contains("4 tasks are overdue and need immediate attention!"));
    assert!(insights.summary.ends_with(
        "Your workload is demanding. Consider prioritizing and breaking down complex tasks."
    ));
}

#[test]
fn custom_window_widens_due_soon() {
    let db = setup_db();
    add(&db, plus(10), Priority::Low, TaskStatus::Open);

    assert_eq!(db.insight_metrics(today(), 7).unwrap().due_soon_count, 0);

    let insights = db.compute_insights_as_of(today(), 14).unwrap();
    assert_eq!(insights.metrics.due_soon_count, 1);
    assert!(insights.summary.contains("within the next 14 days."));
}

#[test]
fn insights_reflect_current_state() {
    let db = setup_db();
    add(&db, minus(1), Priority::Medium, TaskStatus::Open);
    assert_eq!(db.insight_metrics(today(), WINDOW).unwrap().overdue_count, 1);

    let task = db.list_tasks(&Default::default()).unwrap().remove(0);
    let done = TaskUpdate {
        status: Some(TaskStatus::Done),
        ..Default::default()
    };
    db.update_task(task.id, &done).unwrap();

    let metrics = db.insight_metrics(today(), WINDOW).unwrap();
    assert_eq!(metrics.overdue_count, 0);
    assert_eq!(metrics.total_open, 0);
}
