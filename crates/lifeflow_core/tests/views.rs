use chrono::{DateTime, Duration, TimeZone, Utc};
use lifeflow_core::metrics::task_metrics::TaskFilter;
use lifeflow_core::repo::goal_repo::{GoalRepository, SqliteGoalRepository};
use lifeflow_core::repo::habit_repo::{HabitRepository, SqliteHabitRepository};
use lifeflow_core::repo::task_repo::{SqliteTaskRepository, TaskRepository};
use lifeflow_core::repo::user_repo::SqliteUserRepository;
use lifeflow_core::view::goals::GoalAction;
use lifeflow_core::{
    open_db_in_memory, AuthProvider, FixedClock, Goal, GoalStatus, Habit, ListLimits,
    LocalAuthProvider, LocalUserConfig, Notice, Services, Shell, Tab, Task, TaskPriority,
    TaskStatus, User, ViewGate,
};
use rusqlite::Connection;

const LIMITS: ListLimits = ListLimits {
    dashboard_tasks: 10,
    dashboard_goals: 5,
};

fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 15, 12, 0, 0).unwrap()
}

fn signed_in(conn: &Connection) -> (LocalAuthProvider<SqliteUserRepository<'_>>, User) {
    let auth = LocalAuthProvider::new(
        SqliteUserRepository::try_new(conn).unwrap(),
        LocalUserConfig::default(),
    );
    auth.restore_session().unwrap();
    let user = auth.login().unwrap();
    (auth, user)
}

#[test]
fn shell_waits_for_a_signed_in_user() {
    let conn = open_db_in_memory().unwrap();
    let clock = FixedClock::utc(noon());
    let services = Services::open(&conn, &clock, LIMITS).unwrap();
    let auth = LocalAuthProvider::new(
        SqliteUserRepository::try_new(&conn).unwrap(),
        LocalUserConfig::default(),
    );

    let mut shell = Shell::new(&auth);
    assert_eq!(shell.gate(), ViewGate::Loading);

    auth.restore_session().unwrap();
    assert_eq!(shell.gate(), ViewGate::SignedOut);
    assert_eq!(shell.activate(Tab::Tasks, &services), None);
    assert_eq!(shell.active_tab(), Tab::Tasks);

    let user = auth.login().unwrap();
    assert_eq!(shell.gate(), ViewGate::Ready(user.clone()));
    assert_eq!(shell.activate(Tab::Dashboard, &services), Some(user));
    assert!(shell.take_notices().is_empty());
}

#[test]
fn habits_view_rejects_second_completion_today() {
    let conn = open_db_in_memory().unwrap();
    let clock = FixedClock::utc(noon());
    let services = Services::open(&conn, &clock, LIMITS).unwrap();
    let (auth, user) = signed_in(&conn);

    let mut habit = Habit::new(user.id, "Read for 30 minutes", "#10B981", noon());
    habit.current_streak = 3;
    habit.best_streak = 5;
    SqliteHabitRepository::try_new(&conn)
        .unwrap()
        .create_habit(&habit)
        .unwrap();

    let mut shell = Shell::new(&auth);
    shell.activate(Tab::Habits, &services);
    shell.habits.complete(&services, &user, habit.id);

    let local = &shell.habits.habits()[0];
    assert_eq!((local.current_streak, local.best_streak), (4, 5));
    let summary = shell.habits.summary();
    assert_eq!(summary.rows[0].streak_percent, 80);
    assert_eq!(
        shell.take_notices(),
        vec![Notice::success("Habit completed! 4 day streak!")]
    );

    shell.habits.complete(&services, &user, habit.id);
    let local = &shell.habits.habits()[0];
    assert_eq!((local.current_streak, local.best_streak), (4, 5));
    assert_eq!(
        shell.take_notices(),
        vec![Notice::error("Habit already completed today!")]
    );
}

#[test]
fn tasks_view_prepends_samples_and_toggles_locally() {
    let conn = open_db_in_memory().unwrap();
    let clock = FixedClock::utc(noon());
    let services = Services::open(&conn, &clock, LIMITS).unwrap();
    let (auth, user) = signed_in(&conn);

    let older = Task::new(user.id, "Older task", TaskPriority::Low, noon() - Duration::days(1));
    SqliteTaskRepository::try_new(&conn)
        .unwrap()
        .create_task(&older)
        .unwrap();

    let mut shell = Shell::new(&auth);
    shell.activate(Tab::Tasks, &services);
    shell.tasks.add_sample(&services, &user);
    assert_eq!(shell.tasks.tasks().len(), 2);
    let sample_id = shell.tasks.tasks()[0].id;
    assert_ne!(sample_id, older.id);

    shell.tasks.toggle(&services, &user, sample_id, true);
    let local = &shell.tasks.tasks()[0];
    assert_eq!(local.status, TaskStatus::Completed);
    assert_eq!(local.completed_at, Some(noon()));

    let ctx = services.calendar();
    shell.tasks.set_filter(TaskFilter::Completed);
    let summary = shell.tasks.summary(&ctx);
    assert_eq!(summary.visible.len(), 1);
    assert_eq!(summary.stats.completion_rate, 50);

    // The store agrees with the optimistic snapshot.
    shell.activate(Tab::Tasks, &services);
    let stored = shell
        .tasks
        .tasks()
        .iter()
        .find(|task| task.id == sample_id)
        .cloned()
        .unwrap();
    assert_eq!(stored.status, TaskStatus::Completed);
}

#[test]
fn goals_view_completes_goal_at_full_progress() {
    let conn = open_db_in_memory().unwrap();
    let clock = FixedClock::utc(noon());
    let services = Services::open(&conn, &clock, LIMITS).unwrap();
    let (auth, user) = signed_in(&conn);

    let mut goal = Goal::new(user.id, "Run a 5K", noon());
    goal.progress = 90;
    goal.target_date = Some(noon() - Duration::days(1));
    SqliteGoalRepository::try_new(&conn)
        .unwrap()
        .create_goal(&goal)
        .unwrap();

    let mut shell = Shell::new(&auth);
    shell.activate(Tab::Goals, &services);
    let ctx = services.calendar();
    let before = shell.goals.summary(&ctx);
    assert!(before.rows[0].past_due);
    assert!(before.rows[0].can_progress);

    shell.goals.apply(&services, &user, goal.id, GoalAction::Add(25));
    let after = shell.goals.summary(&ctx);
    assert_eq!(after.rows[0].goal.progress, 100);
    assert_eq!(after.rows[0].goal.status, GoalStatus::Completed);
    assert!(!after.rows[0].past_due);
    assert!(!after.rows[0].can_progress);
    assert_eq!(
        shell.take_notices(),
        vec![Notice::success("Goal completed! Congratulations!")]
    );

    shell.goals.apply(&services, &user, goal.id, GoalAction::Add(10));
    assert_eq!(
        shell.take_notices(),
        vec![Notice::error("Failed to update goal")]
    );
}

#[test]
fn dashboard_applies_list_limits() {
    let conn = open_db_in_memory().unwrap();
    let clock = FixedClock::utc(noon());
    let services = Services::open(&conn, &clock, LIMITS).unwrap();
    let (auth, user) = signed_in(&conn);
    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();
    let goals = SqliteGoalRepository::try_new(&conn).unwrap();

    for index in 0..12 {
        let created_at = noon() - Duration::minutes(index);
        let task = Task::new(user.id, format!("task {index}"), TaskPriority::Medium, created_at);
        tasks.create_task(&task).unwrap();
    }
    for index in 0..7 {
        let created_at = noon() - Duration::minutes(index);
        goals
            .create_goal(&Goal::new(user.id, format!("goal {index}"), created_at))
            .unwrap();
    }

    let mut shell = Shell::new(&auth);
    shell.activate(Tab::Dashboard, &services);
    assert_eq!(shell.dashboard.tasks().len(), 10);
    assert_eq!(shell.dashboard.goals().len(), 5);
    assert_eq!(shell.dashboard.tasks()[0].title, "task 0");

    let summary = shell.dashboard.summary(&user, &services.calendar());
    assert_eq!(summary.greeting, "me");
    assert_eq!(summary.tasks.total, 10);
}

#[test]
fn progress_view_buckets_completions_by_day() {
    let conn = open_db_in_memory().unwrap();
    let clock = FixedClock::utc(noon());
    let services = Services::open(&conn, &clock, LIMITS).unwrap();
    let (auth, user) = signed_in(&conn);
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let completed = [
        (0, TaskPriority::High),
        (0, TaskPriority::High),
        (2, TaskPriority::Low),
    ];
    for (days_ago, priority) in completed {
        let mut task = Task::new(user.id, "done", priority, noon() - Duration::days(7));
        task.set_completed(true, noon() - Duration::days(days_ago));
        repo.create_task(&task).unwrap();
    }
    repo.create_task(&Task::new(user.id, "open", TaskPriority::Medium, noon()))
        .unwrap();

    let mut shell = Shell::new(&auth);
    shell.activate(Tab::Progress, &services);
    let summary = shell.progress.summary(&services.calendar());

    let counts: Vec<u32> = summary.weekly.days.iter().map(|day| day.completed).collect();
    assert_eq!(counts, vec![0, 0, 0, 0, 1, 0, 2]);
    assert_eq!(summary.weekly.peak, 2);
    assert_eq!(summary.weekly.days[6].label, "Wed");

    let percents: Vec<u32> = summary
        .priorities
        .shares
        .iter()
        .map(|share| share.percent)
        .collect();
    assert_eq!(percents, vec![50, 25, 25]);
    assert_eq!(summary.tasks.completion_rate, 75);
}

#[test]
fn failed_load_keeps_snapshot_and_raises_notice() {
    let conn = open_db_in_memory().unwrap();
    let clock = FixedClock::utc(noon());
    let services = Services::open(&conn, &clock, LIMITS).unwrap();
    let (auth, user) = signed_in(&conn);
    SqliteGoalRepository::try_new(&conn)
        .unwrap()
        .create_goal(&Goal::new(user.id, "Save for vacation", noon()))
        .unwrap();

    let mut shell = Shell::new(&auth);
    shell.activate(Tab::Goals, &services);
    assert_eq!(shell.goals.goals().len(), 1);

    conn.execute_batch("DROP TABLE goals;").unwrap();
    shell.activate(Tab::Goals, &services);
    assert_eq!(shell.goals.goals().len(), 1);
    assert_eq!(
        shell.take_notices(),
        vec![Notice::error("Failed to load goals")]
    );
}

#[test]
fn tasks_summary_serializes_in_camel_case() {
    let conn = open_db_in_memory().unwrap();
    let clock = FixedClock::utc(noon());
    let services = Services::open(&conn, &clock, LIMITS).unwrap();
    let (auth, user) = signed_in(&conn);

    let mut task = Task::new(user.id, "Buy groceries", TaskPriority::Low, noon());
    task.due_date = Some(noon());
    SqliteTaskRepository::try_new(&conn)
        .unwrap()
        .create_task(&task)
        .unwrap();

    let mut shell = Shell::new(&auth);
    shell.tasks.set_filter(TaskFilter::Today);
    shell.activate(Tab::Tasks, &services);
    let value = serde_json::to_value(shell.tasks.summary(&services.calendar())).unwrap();

    assert_eq!(value["filter"], "today");
    assert_eq!(value["stats"]["dueToday"], 1);
    assert_eq!(value["stats"]["completionRate"], 0);
    assert_eq!(value["visible"][0]["priority"], "low");
    assert_eq!(value["visible"][0]["status"], "pending");

    let notice = serde_json::to_value(Notice::error("Failed to load tasks")).unwrap();
    assert_eq!(
        notice,
        serde_json::json!({ "level": "error", "message": "Failed to load tasks" })
    );
}

#[test]
fn streak_bars_use_the_floor_of_each_view() {
    let conn = open_db_in_memory().unwrap();
    let clock = FixedClock::utc(noon());
    let services = Services::open(&conn, &clock, LIMITS).unwrap();
    let (auth, user) = signed_in(&conn);

    let mut habit = Habit::new(user.id, "Meditate for 10 minutes", "#8B5CF6", noon());
    habit.current_streak = 3;
    habit.best_streak = 0;
    SqliteHabitRepository::try_new(&conn)
        .unwrap()
        .create_habit(&habit)
        .unwrap();

    let mut shell = Shell::new(&auth);
    let ctx = services.calendar();
    for tab in Tab::ALL {
        shell.activate(tab, &services);
    }

    let dashboard = shell.dashboard.summary(&user, &ctx);
    assert_eq!(dashboard.habit_rows[0].streak_percent, 43);
    let progress = shell.progress.summary(&ctx);
    assert_eq!(progress.habit_rows[0].streak_percent, 43);
    let habits = shell.habits.summary();
    assert_eq!(habits.rows[0].streak_percent, 100);
    assert!(shell.take_notices().is_empty());
}
