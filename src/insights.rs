//! Narrative summary rendering for insights.
//!
//! The summary is an ordered table of rules. Each rule has a predicate and a
//! formatter over [`SummaryFacts`]; every rule whose predicate holds contributes
//! one icon-prefixed sentence, in table order. Alternatives within a slot (for
//! example the three open-task sentences) use mutually exclusive predicates.

use crate::types::{InsightMetrics, Priority};

/// Open-task count above which the workload is called heavy.
pub const HEAVY_WORKLOAD_OPEN: i64 = 10;

/// High-priority share (percent) above which the user is told to focus.
pub const HIGH_PRIORITY_FOCUS_PCT: i64 = 60;

/// The numbers the summary rules look at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryFacts {
    pub total_open: i64,
    pub overdue: i64,
    pub due_soon: i64,
    pub high_priority: i64,
    pub total_active: i64,
    pub due_soon_days: u32,
}

impl SummaryFacts {
    pub fn from_metrics(metrics: &InsightMetrics, due_soon_days: u32) -> Self {
        Self {
            total_open: metrics.total_open,
            overdue: metrics.overdue_count,
            due_soon: metrics.due_soon_count,
            high_priority: metrics.active_at(Priority::High),
            total_active: metrics.total_active(),
            due_soon_days,
        }
    }

    /// Share of active tasks that are High priority, rounded to the nearest
    /// percent. `None` when there are no active tasks.
    pub fn high_priority_pct(&self) -> Option<i64> {
        if self.total_active == 0 {
            return None;
        }
        let ratio = self.high_priority as f64 / self.total_active as f64;
        Some((ratio * 100.0).round() as i64)
    }

    fn list_clear(&self) -> bool {
        self.total_open == 0 && self.overdue == 0
    }
}

/// One conditional sentence of the summary, rendered as `"{icon} {sentence}"`.
pub struct SummaryRule {
    pub name: &'static str,
    pub icon: &'static str,
    pub applies: fn(&SummaryFacts) -> bool,
    pub render: fn(&SummaryFacts) -> String,
}

fn plural<'a>(n: i64, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 { one } else { many }
}

pub const RULES: &[SummaryRule] = &[
    SummaryRule {
        name: "no_open_tasks",
        icon: "🎉",
        applies: |f| f.total_open == 0,
        render: |_| "Great job! You have no open tasks.".to_string(),
    },
    SummaryRule {
        name: "heavy_workload",
        icon: "⚠️",
        applies: |f| f.total_open > HEAVY_WORKLOAD_OPEN,
        render: |f| {
            format!(
                "You have {} open tasks - your workload is quite heavy.",
                f.total_open
            )
        },
    },
    SummaryRule {
        name: "open_count",
        icon: "📋",
        applies: |f| f.total_open > 0 && f.total_open <= HEAVY_WORKLOAD_OPEN,
        render: |f| {
            format!(
                "You have {} open {}.",
                f.total_open,
                plural(f.total_open, "task", "tasks")
            )
        },
    },
    SummaryRule {
        name: "overdue",
        icon: "🚨",
        applies: |f| f.overdue > 0,
        render: |f| {
            format!(
                "{} {} overdue and {} immediate attention!",
                f.overdue,
                plural(f.overdue, "task is", "tasks are"),
                plural(f.overdue, "needs", "need")
            )
        },
    },
    SummaryRule {
        name: "due_soon",
        icon: "⏰",
        applies: |f| f.due_soon > 0,
        render: |f| {
            format!(
                "{} {} due within the next {} {}.",
                f.due_soon,
                plural(f.due_soon, "task is", "tasks are"),
                f.due_soon_days,
                plural(i64::from(f.due_soon_days), "day", "days")
            )
        },
    },
    SummaryRule {
        name: "high_priority_focus",
        icon: "🔥",
        applies: |f| {
            f.high_priority_pct()
                .is_some_and(|pct| pct > HIGH_PRIORITY_FOCUS_PCT)
        },
        render: |f| {
            format!(
                "{}% of your active tasks are high priority. Consider focusing on these first.",
                f.high_priority_pct().unwrap_or_default()
            )
        },
    },
    SummaryRule {
        name: "high_priority_count",
        icon: "💡",
        applies: |f| {
            f.high_priority > 0
                && f.high_priority_pct()
                    .is_some_and(|pct| pct <= HIGH_PRIORITY_FOCUS_PCT)
        },
        render: |f| {
            format!(
                "You have {} high priority {} to focus on.",
                f.high_priority,
                plural(f.high_priority, "task", "tasks")
            )
        },
    },
    SummaryRule {
        name: "list_clear",
        icon: "✨",
        applies: SummaryFacts::list_clear,
        render: |_| "Your task list is clear. Time to relax or take on new challenges!".to_string(),
    },
    SummaryRule {
        name: "demanding_workload",
        icon: "💪",
        applies: |f| {
            !f.list_clear() && (f.overdue > 3 || (f.total_open > 15 && f.high_priority > 5))
        },
        render: |_| {
            "Your workload is demanding. Consider prioritizing and breaking down complex tasks."
                .to_string()
        },
    },
];

/// Names of the rules that fire for these facts, in order.
pub fn matching_rules(facts: &SummaryFacts) -> Vec<&'static str> {
    RULES
        .iter()
        .filter(|rule| (rule.applies)(facts))
        .map(|rule| rule.name)
        .collect()
}

/// Render the summary sentences for the given facts, space-joined.
pub fn render_facts(facts: &SummaryFacts) -> String {
    RULES
        .iter()
        .filter(|rule| (rule.applies)(facts))
        .map(|rule| format!("{} {}", rule.icon, (rule.render)(facts)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render the summary for a metrics snapshot.
pub fn render_summary(metrics: &InsightMetrics, due_soon_days: u32) -> String {
    render_facts(&SummaryFacts::from_metrics(metrics, due_soon_days))
}

/// Format an insights snapshot as markdown (used by the CLI).
pub fn format_insights_markdown(insights: &crate::types::Insights) -> String {
    let m = &insights.metrics;
    let mut md = String::new();

    md.push_str("## Insights\n");
    md.push_str(&insights.summary);
    md.push_str("\n\n");
    md.push_str(&format!("- **open**: {}\n", m.total_open));
    md.push_str(&format!("- **overdue**: {}\n", m.overdue_count));
    md.push_str(&format!("- **due soon**: {}\n", m.due_soon_count));

    if !m.priority_distribution.is_empty() {
        md.push_str("\n### Active by priority\n");
        for p in &m.priority_distribution {
            md.push_str(&format!("- {}: {}\n", p.priority, p.count));
        }
    }

    if !m.status_distribution.is_empty() {
        md.push_str("\n### By status\n");
        for s in &m.status_distribution {
            md.push_str(&format!("- {}: {}\n", s.status, s.count));
        }
    }

    md
}
