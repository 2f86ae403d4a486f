use chrono::{DateTime, Duration, Offset, TimeZone, Utc};
use lifeflow_core::db::open_db_in_memory;
use lifeflow_core::metrics::task_metrics::{task_stats, TaskFilter};
use lifeflow_core::model::patch::TaskPatch;
use lifeflow_core::repo::task_repo::{SqliteTaskRepository, TaskListQuery, TaskRepository};
use lifeflow_core::repo::user_repo::{SqliteUserRepository, UserRepository};
use lifeflow_core::sample::SAMPLE_TASKS;
use lifeflow_core::service::task_service::{NewTask, TaskService};
use lifeflow_core::{
    CalendarContext, FixedClock, RepoError, ServiceError, Task, TaskPriority, TaskStatus, User,
    ValidationError,
};
use rusqlite::Connection;
use uuid::Uuid;

fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 15, 12, 0, 0).unwrap()
}

fn seed_user(conn: &Connection, email: &str) -> User {
    let repo = SqliteUserRepository::try_new(conn).unwrap();
    repo.create_user(&User::new(email, None)).unwrap()
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let user = seed_user(&conn, "ada@example.com");
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let mut task = Task::new(user.id, "Write report", TaskPriority::High, noon());
    task.description = Some("quarterly numbers".to_string());
    task.due_date = Some(noon() + Duration::days(2));
    task.category = Some("Work".to_string());
    repo.create_task(&task).unwrap();

    let loaded = repo.get_task(task.id).unwrap().unwrap();
    assert_eq!(loaded, task);
    assert_eq!(loaded.status, TaskStatus::Pending);
}

#[test]
fn create_rejects_blank_title() {
    let conn = open_db_in_memory().unwrap();
    let user = seed_user(&conn, "ada@example.com");
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let task = Task::new(user.id, "   ", TaskPriority::Low, noon());
    let err = repo.create_task(&task).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::BlankField("title"))
    ));
}

#[test]
fn list_is_newest_first_limited_and_scoped_to_user() {
    let conn = open_db_in_memory().unwrap();
    let ada = seed_user(&conn, "ada@example.com");
    let grace = seed_user(&conn, "grace@example.com");
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    for (offset, title) in ["first", "second", "third"].into_iter().enumerate() {
        let created_at = noon() + Duration::seconds(offset as i64);
        repo.create_task(&Task::new(ada.id, title, TaskPriority::Medium, created_at))
            .unwrap();
    }
    repo.create_task(&Task::new(grace.id, "other", TaskPriority::Low, noon()))
        .unwrap();

    let listed = repo
        .list_tasks(&TaskListQuery::for_user(ada.id).with_limit(2))
        .unwrap();
    let titles: Vec<&str> = listed.iter().map(|task| task.title.as_str()).collect();
    assert_eq!(titles, vec!["third", "second"]);

    let all = repo.list_tasks(&TaskListQuery::for_user(ada.id)).unwrap();
    assert_eq!(all.len(), 3);
    assert!(all.iter().all(|task| task.user_id == ada.id));
}

#[test]
fn update_missing_task_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let missing = Uuid::new_v4();
    let err = repo
        .update_task(
            missing,
            &TaskPatch::completion(true, noon()),
        )
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound { id, .. } if id == missing));
}

#[test]
fn toggling_completion_sets_and_clears_timestamp() {
    let conn = open_db_in_memory().unwrap();
    let user = seed_user(&conn, "ada@example.com");
    let clock = FixedClock::utc(noon());
    let service = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap(), clock);
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let task = service
        .add_task(
            user.id,
            NewTask {
                title: "Call dentist".to_string(),
                description: None,
                priority: TaskPriority::Medium,
                due_date: None,
                category: None,
                is_recurring: false,
            },
        )
        .unwrap();

    let patch = service.set_completed(user.id, task.id, true).unwrap();
    assert_eq!(patch.status, Some(TaskStatus::Completed));
    let stored = repo.get_task(task.id).unwrap().unwrap();
    assert_eq!(stored.status, TaskStatus::Completed);
    assert_eq!(stored.completed_at, Some(noon()));

    service.set_completed(user.id, task.id, false).unwrap();
    let stored = repo.get_task(task.id).unwrap().unwrap();
    assert_eq!(stored.status, TaskStatus::Pending);
    assert_eq!(stored.completed_at, None);
}

#[test]
fn toggling_another_users_task_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let ada = seed_user(&conn, "ada@example.com");
    let grace = seed_user(&conn, "grace@example.com");
    let service = TaskService::new(
        SqliteTaskRepository::try_new(&conn).unwrap(),
        FixedClock::utc(noon()),
    );

    let task = service.add_sample_task(ada.id).unwrap();
    let err = service.set_completed(grace.id, task.id, true).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { collection: "task", .. }));
}

#[test]
fn due_today_and_overdue_are_counted_from_stored_tasks() {
    let conn = open_db_in_memory().unwrap();
    let user = seed_user(&conn, "ada@example.com");
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let mut today = Task::new(user.id, "due today", TaskPriority::High, noon());
    today.due_date = Some(noon() + Duration::hours(3));
    let mut yesterday = Task::new(user.id, "due yesterday", TaskPriority::Medium, noon());
    yesterday.due_date = Some(noon() - Duration::days(1));
    repo.create_task(&today).unwrap();
    repo.create_task(&yesterday).unwrap();

    let tasks = repo.list_tasks(&TaskListQuery::for_user(user.id)).unwrap();
    let ctx = CalendarContext::new(noon(), Utc.fix());
    let stats = task_stats(&tasks, &ctx);
    assert_eq!(stats.due_today, 1);
    assert_eq!(stats.overdue, 1);
    assert_eq!(stats.completion_rate, 0);

    let overdue: Vec<&Task> = tasks
        .iter()
        .filter(|task| TaskFilter::Overdue.matches(task, &ctx))
        .collect();
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].id, yesterday.id);
}

#[test]
fn sample_tasks_come_from_the_catalog() {
    let conn = open_db_in_memory().unwrap();
    let user = seed_user(&conn, "ada@example.com");
    let service = TaskService::new(
        SqliteTaskRepository::try_new(&conn).unwrap(),
        FixedClock::utc(noon()),
    );

    for _ in 0..8 {
        let task = service.add_sample_task(user.id).unwrap();
        let sample = SAMPLE_TASKS
            .iter()
            .find(|sample| sample.title == task.title)
            .unwrap();
        assert_eq!(task.priority, sample.priority);
        assert_eq!(task.due_date, Some(noon() + Duration::days(sample.due_in_days)));
        assert_eq!(task.status, TaskStatus::Pending);
    }
}
