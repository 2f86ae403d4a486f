//! Task aggregates: due-today/overdue counts, completion rate, weekly
//! completion series and priority distribution.
//!
//! "Today" and "overdue" only consider `pending` tasks with a due date.
//! Overdue means the due date's calendar day is strictly before today.

use super::{rounded_percent, CalendarContext};
use crate::clock::trailing_days;
use crate::model::task::{Task, TaskPriority, TaskStatus};
use chrono::NaiveDate;
use serde::Serialize;

/// Number of calendar days in the weekly completion series.
pub const WEEKLY_SERIES_DAYS: u32 = 7;

/// List filter offered by the tasks view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskFilter {
    #[default]
    All,
    Today,
    Overdue,
    Completed,
}

impl TaskFilter {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "today" => Some(Self::Today),
            "overdue" => Some(Self::Overdue),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn matches(self, task: &Task, ctx: &CalendarContext) -> bool {
        match self {
            Self::All => true,
            Self::Today => is_due_today(task, ctx),
            Self::Overdue => is_overdue(task, ctx),
            Self::Completed => task.status == TaskStatus::Completed,
        }
    }
}

/// Headline counters shown on the dashboard and tasks view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: u32,
    pub completed: u32,
    pub pending: u32,
    pub due_today: u32,
    pub overdue: u32,
    pub completion_rate: u32,
}

/// Completions on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayBucket {
    pub date: NaiveDate,
    /// Short weekday label such as `Mon`.
    pub label: String,
    pub completed: u32,
}

/// Completions over the trailing week, oldest day first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySeries {
    pub days: Vec<DayBucket>,
    /// `max(completed)` across days, at least 1; used to scale bars.
    pub peak: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityShare {
    pub priority: TaskPriority,
    pub count: u32,
    /// Share of all tasks, rounded to whole percent.
    pub percent: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityDistribution {
    pub total: u32,
    /// One entry per priority in `high, medium, low` order.
    pub shares: Vec<PriorityShare>,
}

pub fn is_due_today(task: &Task, ctx: &CalendarContext) -> bool {
    task.status == TaskStatus::Pending
        && task
            .due_date
            .is_some_and(|due| ctx.day_of(due) == ctx.today)
}

pub fn is_overdue(task: &Task, ctx: &CalendarContext) -> bool {
    task.status == TaskStatus::Pending
        && task.due_date.is_some_and(|due| ctx.day_of(due) < ctx.today)
}

/// `round(100 * completed / total)`, 0 for an empty set.
pub fn completion_rate(tasks: &[Task]) -> u32 {
    let completed = count_where(tasks, |task| task.status == TaskStatus::Completed);
    rounded_percent(u64::from(completed), tasks.len() as u64)
}

pub fn task_stats(tasks: &[Task], ctx: &CalendarContext) -> TaskStats {
    TaskStats {
        total: count_where(tasks, |_| true),
        completed: count_where(tasks, |task| task.status == TaskStatus::Completed),
        pending: count_where(tasks, |task| task.status == TaskStatus::Pending),
        due_today: count_where(tasks, |task| is_due_today(task, ctx)),
        overdue: count_where(tasks, |task| is_overdue(task, ctx)),
        completion_rate: completion_rate(tasks),
    }
}

/// Tasks matching `filter`, preserving snapshot order.
pub fn filter_tasks<'a>(
    tasks: &'a [Task],
    filter: TaskFilter,
    ctx: &CalendarContext,
) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| filter.matches(task, ctx))
        .collect()
}

/// Per-day completion counts for the last seven calendar days.
///
/// A task lands in a bucket when its `completed_at` falls on that day,
/// regardless of its current status.
pub fn weekly_completions(tasks: &[Task], ctx: &CalendarContext) -> WeeklySeries {
    let days: Vec<DayBucket> = trailing_days(ctx.today, WEEKLY_SERIES_DAYS)
        .into_iter()
        .map(|date| DayBucket {
            date,
            label: date.format("%a").to_string(),
            completed: count_where(tasks, |task| {
                task.completed_at
                    .is_some_and(|completed_at| ctx.day_of(completed_at) == date)
            }),
        })
        .collect();
    let peak = days
        .iter()
        .map(|day| day.completed)
        .max()
        .unwrap_or(0)
        .max(1);
    WeeklySeries { days, peak }
}

pub fn priority_distribution(tasks: &[Task]) -> PriorityDistribution {
    let total = count_where(tasks, |_| true);
    let shares = TaskPriority::ALL
        .into_iter()
        .map(|priority| {
            let count = count_where(tasks, |task| task.priority == priority);
            PriorityShare {
                priority,
                count,
                percent: rounded_percent(u64::from(count), u64::from(total)),
            }
        })
        .collect();
    PriorityDistribution { total, shares }
}

fn count_where(tasks: &[Task], predicate: impl Fn(&Task) -> bool) -> u32 {
    let count = tasks.iter().filter(|task| predicate(task)).count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset, TimeZone, Utc};
    use uuid::Uuid;

    fn ctx() -> CalendarContext {
        CalendarContext::new(
            Utc.with_ymd_and_hms(2026, 4, 15, 12, 0, 0).unwrap(),
            FixedOffset::east_opt(0).unwrap(),
        )
    }

    fn task(priority: TaskPriority) -> Task {
        Task::new(Uuid::new_v4(), "t", priority, ctx().now)
    }

    #[test]
    fn today_and_overdue_counts_follow_calendar_days() {
        let ctx = ctx();
        let mut due_today = task(TaskPriority::High);
        due_today.due_date = Some(ctx.now);
        let mut due_yesterday = task(TaskPriority::Low);
        due_yesterday.due_date = Some(ctx.now - Duration::days(1));

        let stats = task_stats(&[due_today, due_yesterday], &ctx);
        assert_eq!(stats.due_today, 1);
        assert_eq!(stats.overdue, 1);
    }

    #[test]
    fn earlier_today_is_not_overdue() {
        let ctx = ctx();
        let mut morning = task(TaskPriority::Medium);
        morning.due_date = Some(ctx.now - Duration::hours(6));
        assert!(is_due_today(&morning, &ctx));
        assert!(!is_overdue(&morning, &ctx));
    }

    #[test]
    fn completed_tasks_are_never_today_or_overdue() {
        let ctx = ctx();
        let mut done = task(TaskPriority::High);
        done.due_date = Some(ctx.now - Duration::days(3));
        done.set_completed(true, ctx.now);
        assert!(!is_overdue(&done, &ctx));
        assert!(!is_due_today(&done, &ctx));
    }

    #[test]
    fn completion_rate_is_zero_for_empty_and_hundred_when_all_done() {
        let ctx = ctx();
        assert_eq!(completion_rate(&[]), 0);

        let mut a = task(TaskPriority::High);
        let mut b = task(TaskPriority::Low);
        a.set_completed(true, ctx.now);
        assert_eq!(completion_rate(&[a.clone(), b.clone()]), 50);
        b.set_completed(true, ctx.now);
        assert_eq!(completion_rate(&[a, b]), 100);
    }

    #[test]
    fn weekly_series_buckets_by_completion_day() {
        let ctx = ctx();
        let mut today = task(TaskPriority::High);
        today.set_completed(true, ctx.now);
        let mut six_days_ago = task(TaskPriority::High);
        six_days_ago.set_completed(true, ctx.now - Duration::days(6));
        let mut too_old = task(TaskPriority::High);
        too_old.set_completed(true, ctx.now - Duration::days(7));

        let series = weekly_completions(&[today, six_days_ago, too_old], &ctx);
        assert_eq!(series.days.len(), 7);
        assert_eq!(series.days[0].completed, 1);
        assert_eq!(series.days[6].completed, 1);
        assert_eq!(series.days[6].label, "Wed");
        assert_eq!(series.days.iter().map(|d| d.completed).sum::<u32>(), 2);
        assert_eq!(series.peak, 1);
    }

    #[test]
    fn empty_weekly_series_has_peak_of_one() {
        assert_eq!(weekly_completions(&[], &ctx()).peak, 1);
    }

    #[test]
    fn priority_distribution_counts_and_shares() {
        let tasks = vec![
            task(TaskPriority::High),
            task(TaskPriority::High),
            task(TaskPriority::Low),
        ];
        let distribution = priority_distribution(&tasks);
        assert_eq!(distribution.total, 3);
        assert_eq!(distribution.shares[0].count, 2);
        assert_eq!(distribution.shares[0].percent, 67);
        assert_eq!(distribution.shares[1].count, 0);
        assert_eq!(distribution.shares[1].percent, 0);
        assert_eq!(distribution.shares[2].percent, 33);
    }

    #[test]
    fn filter_parse_accepts_known_names() {
        assert_eq!(TaskFilter::parse(" Overdue "), Some(TaskFilter::Overdue));
        assert_eq!(TaskFilter::parse("soon"), None);
    }
}
