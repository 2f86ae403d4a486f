//! Plain-text rendering of view summaries.

use lifeflow_core::model::task::Task;
use lifeflow_core::view::dashboard::DashboardSummary;
use lifeflow_core::view::goals::GoalsSummary;
use lifeflow_core::view::habits::{HabitRow, HabitsSummary};
use lifeflow_core::view::progress::ProgressSummary;
use lifeflow_core::view::tasks::TasksSummary;
use lifeflow_core::{Goal, TaskStatus, User};
use std::fmt::{self, Write};

const BAR_WIDTH: u32 = 20;

pub type RenderResult = Result<String, fmt::Error>;

pub fn user(user: &User) -> String {
    format!("Signed in as {} <{}>", user.greeting_name(), user.email)
}

pub fn dashboard(summary: &DashboardSummary) -> RenderResult {
    let mut out = String::new();
    writeln!(out, "Welcome back, {}!", summary.greeting)?;
    writeln!(
        out,
        "Tasks   {}/{} done ({}%), {} due today, {} overdue",
        summary.tasks.completed,
        summary.tasks.total,
        summary.tasks.completion_rate,
        summary.tasks.due_today,
        summary.tasks.overdue
    )?;
    writeln!(
        out,
        "Habits  {} active, weekly progress {}%",
        summary.habits.count, summary.habits.weekly_progress
    )?;
    writeln!(
        out,
        "Goals   {} active, {} completed",
        summary.goals.active, summary.goals.completed
    )?;

    section(&mut out, "Recent tasks")?;
    for task in &summary.recent_tasks {
        task_line(&mut out, task)?;
    }
    section(&mut out, "Habits")?;
    for row in &summary.habit_rows {
        habit_line(&mut out, row)?;
    }
    section(&mut out, "Goals")?;
    for goal in &summary.goal_preview {
        goal_line(&mut out, goal, false)?;
    }
    Ok(finish(out))
}

pub fn tasks(summary: &TasksSummary) -> RenderResult {
    let mut out = String::new();
    let stats = &summary.stats;
    writeln!(
        out,
        "{} total, {} pending, {} completed, {} due today, {} overdue ({}% complete)",
        stats.total, stats.pending, stats.completed, stats.due_today, stats.overdue, stats.completion_rate
    )?;
    if summary.visible.is_empty() {
        writeln!(out, "No tasks found")?;
    }
    for task in &summary.visible {
        task_line(&mut out, task)?;
    }
    Ok(finish(out))
}

pub fn habits(summary: &HabitsSummary) -> RenderResult {
    let mut out = String::new();
    let stats = &summary.stats;
    writeln!(
        out,
        "{} active, average streak {}, best streak {}",
        stats.count, stats.average_streak, stats.best_overall_streak
    )?;
    if summary.rows.is_empty() {
        writeln!(out, "No habits yet")?;
    }
    for row in &summary.rows {
        habit_line(&mut out, row)?;
    }
    Ok(finish(out))
}

pub fn goals(summary: &GoalsSummary) -> RenderResult {
    let mut out = String::new();
    let stats = &summary.stats;
    writeln!(
        out,
        "{} active, {} completed, average progress {}%",
        stats.active, stats.completed, stats.average_progress
    )?;
    if summary.rows.is_empty() {
        writeln!(out, "No goals yet")?;
    }
    for row in &summary.rows {
        goal_line(&mut out, &row.goal, row.past_due)?;
    }
    Ok(finish(out))
}

pub fn progress(summary: &ProgressSummary) -> RenderResult {
    let mut out = String::new();
    section(&mut out, "Completed this week")?;
    for day in &summary.weekly.days {
        writeln!(
            out,
            "  {} {} {}",
            day.label,
            bar(day.completed, summary.weekly.peak),
            day.completed
        )?;
    }
    section(&mut out, "Priority")?;
    for share in &summary.priorities.shares {
        writeln!(
            out,
            "  {:<6} {:>3} ({}%)",
            share.priority.as_str(),
            share.count,
            share.percent
        )?;
    }
    section(&mut out, "Overview")?;
    writeln!(out, "  task completion {}%", summary.tasks.completion_rate)?;
    writeln!(out, "  habit progress  {}%", summary.habits.weekly_progress)?;
    writeln!(out, "  goal progress   {}%", summary.goals.average_progress)?;
    for row in &summary.habit_rows {
        habit_line(&mut out, row)?;
    }
    Ok(finish(out))
}

fn finish(out: String) -> String {
    out.trim_end().to_string()
}

fn section(out: &mut String, title: &str) -> fmt::Result {
    writeln!(out, "\n{title}")
}

fn task_line(out: &mut String, task: &Task) -> fmt::Result {
    let mark = if task.status == TaskStatus::Completed {
        "x"
    } else {
        " "
    };
    let due = task
        .due_date
        .map(|due| format!(" due {}", due.format("%Y-%m-%d")))
        .unwrap_or_default();
    writeln!(
        out,
        "  [{mark}] {} ({}){due}  {}",
        task.title,
        task.priority.as_str(),
        task.id
    )
}

fn habit_line(out: &mut String, row: &HabitRow) -> fmt::Result {
    let habit = &row.habit;
    writeln!(
        out,
        "  {} {} streak {} (best {}) {}%  {}",
        habit.name,
        bar(row.streak_percent, 100),
        habit.current_streak,
        habit.best_streak,
        row.streak_percent,
        habit.id
    )
}

fn goal_line(out: &mut String, goal: &Goal, past_due: bool) -> fmt::Result {
    let flag = if past_due { " past due" } else { "" };
    writeln!(
        out,
        "  {} {} {}% [{}]{flag}  {}",
        goal.title,
        bar(u32::from(goal.progress), 100),
        goal.progress,
        goal.status.as_str(),
        goal.id
    )
}

fn bar(value: u32, max: u32) -> String {
    let filled = (value.min(max) * BAR_WIDTH) / max.max(1);
    let mut bar = "#".repeat(filled as usize);
    bar.push_str(&".".repeat((BAR_WIDTH - filled) as usize));
    bar
}

#[cfg(test)]
mod tests {
    use super::{bar, task_line};
    use chrono::{TimeZone, Utc};
    use lifeflow_core::{Task, TaskPriority};
    use uuid::Uuid;

    #[test]
    fn bar_scales_to_width() {
        assert_eq!(bar(0, 10), ".".repeat(20));
        assert_eq!(bar(5, 10), format!("{}{}", "#".repeat(10), ".".repeat(10)));
        assert_eq!(bar(30, 10), "#".repeat(20));
    }

    #[test]
    fn task_line_shows_mark_priority_and_due_day() {
        let now = Utc.with_ymd_and_hms(2026, 4, 15, 12, 0, 0).unwrap();
        let mut task = Task::new(Uuid::new_v4(), "Buy groceries", TaskPriority::Low, now);
        task.due_date = Some(now);

        let mut out = String::new();
        task_line(&mut out, &task).unwrap();
        assert_eq!(
            out,
            format!("  [ ] Buy groceries (low) due 2026-04-15  {}\n", task.id)
        );
    }
}
