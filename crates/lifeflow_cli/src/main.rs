//! `lifeflow` terminal front-end.
//!
//! # Responsibility
//! - Map one sub-command to one tab activation or user action.
//! - Print the resulting view summary and any notices.
//!
//! # Invariants
//! - Every data command requires a signed-in session; `login` creates one.
//! - Exit status is non-zero when a command fails or raises an error notice.

mod render;

use chrono::{DateTime, TimeDelta, Utc};
use clap::{ArgGroup, Parser, Subcommand};
use lifeflow_core::metrics::task_metrics::TaskFilter;
use lifeflow_core::repo::user_repo::SqliteUserRepository;
use lifeflow_core::service::task_service::NewTask;
use lifeflow_core::view::goals::GoalAction;
use lifeflow_core::{
    init_logging, open_db, AppConfig, AuthError, AuthProvider, ConfigError, DbError, ListLimits,
    LocalAuthProvider, LoggingError, Notice, NoticeLevel, RepoError, Services, Shell,
    SystemClock, Tab, TaskPriority, User, ViewGate,
};
use log::info;
use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;
use std::process::ExitCode;
use uuid::Uuid;

const DEFAULT_HABIT_COLOR: &str = "#3B82F6";

#[derive(Parser, Debug)]
#[command(name = "lifeflow", version, about = "Tasks, habits and goals dashboard")]
struct Cli {
    /// SQLite database file; overrides `db_path` from the config.
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// JSON config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in with the configured local profile.
    Login,
    Logout,
    Dashboard,
    Tasks {
        /// all | today | overdue | completed
        #[arg(long, default_value = "all", value_parser = parse_filter)]
        filter: TaskFilter,
    },
    Habits,
    Goals,
    Progress,
    /// Add a task; without `--title` a sample task is picked.
    AddTask {
        #[arg(long)]
        title: Option<String>,
        /// high | medium | low
        #[arg(long, default_value = "medium", value_parser = parse_priority)]
        priority: TaskPriority,
        #[arg(long)]
        due_in_days: Option<i64>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Add a habit; without `--name` a sample habit is picked.
    AddHabit {
        #[arg(long)]
        name: Option<String>,
        #[arg(long, default_value = DEFAULT_HABIT_COLOR)]
        color: String,
    },
    /// Add a goal; without `--title` a sample goal is picked.
    AddGoal {
        #[arg(long)]
        title: Option<String>,
    },
    CompleteTask {
        id: Uuid,
    },
    ReopenTask {
        id: Uuid,
    },
    CompleteHabit {
        id: Uuid,
    },
    #[command(group(ArgGroup::new("change").required(true).args(["add", "set"])))]
    GoalProgress {
        id: Uuid,
        #[arg(long)]
        add: Option<u32>,
        #[arg(long)]
        set: Option<u32>,
    },
    CompleteGoal {
        id: Uuid,
    },
}

#[derive(Debug)]
enum CliError {
    Config(ConfigError),
    Logging(LoggingError),
    Db(DbError),
    Repo(RepoError),
    Auth(AuthError),
    Json(serde_json::Error),
    Render(fmt::Error),
    DueDateOutOfRange(i64),
    SignedOut,
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Logging(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "cannot open database: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Auth(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "cannot encode output: {err}"),
            Self::Render(err) => write!(f, "cannot render output: {err}"),
            Self::DueDateOutOfRange(days) => {
                write!(f, "--due-in-days {days} is outside the supported date range")
            }
            Self::SignedOut => write!(f, "not signed in; run `lifeflow login` first"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Logging(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Auth(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Render(err) => Some(err),
            Self::DueDateOutOfRange(_) | Self::SignedOut => None,
        }
    }
}

macro_rules! impl_from {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(impl From<$source> for CliError {
            fn from(value: $source) -> Self {
                Self::$variant(value)
            }
        })*
    };
}

impl_from!(
    ConfigError => Config,
    LoggingError => Logging,
    DbError => Db,
    RepoError => Repo,
    AuthError => Auth,
    serde_json::Error => Json,
    fmt::Error => Render,
);

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(notices) if has_error_notice(&notices) => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn has_error_notice(notices: &[Notice]) -> bool {
    notices
        .iter()
        .any(|notice| notice.level == NoticeLevel::Error)
}

fn parse_filter(value: &str) -> Result<TaskFilter, String> {
    TaskFilter::parse(value).ok_or_else(|| format!("unknown filter `{value}`"))
}

fn parse_priority(value: &str) -> Result<TaskPriority, String> {
    TaskPriority::parse(value).ok_or_else(|| format!("unknown priority `{value}`"))
}

fn run(cli: Cli) -> Result<Vec<Notice>, CliError> {
    let config = AppConfig::load_or_default(cli.config.as_deref())?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, &log_dir.to_string_lossy())?;
    }
    let db_path = cli.db.clone().unwrap_or_else(|| config.db_path.clone());
    info!(
        "event=cli_start module=cli status=start db_path={}",
        db_path.display()
    );

    let conn = open_db(&db_path)?;
    let auth = LocalAuthProvider::new(
        SqliteUserRepository::try_new(&conn)?,
        config.local_user.clone(),
    );
    auth.restore_session()?;

    match cli.command {
        Command::Login => {
            let user = auth.login()?;
            let notice = Notice::success(format!("Welcome back, {}!", user.greeting_name()));
            emit(
                cli.json,
                &serde_json::json!({ "user": user }),
                render::user(&user),
                &[notice.clone()],
            )?;
            return Ok(vec![notice]);
        }
        Command::Logout => {
            auth.logout()?;
            let notice = Notice::success("Signed out");
            emit(cli.json, &serde_json::Value::Null, String::new(), &[notice.clone()])?;
            return Ok(vec![notice]);
        }
        _ => {}
    }

    let clock = SystemClock;
    let services = Services::open(&conn, &clock, ListLimits::from(&config))?;
    let mut shell = Shell::new(&auth);
    let user = match shell.gate() {
        ViewGate::Ready(user) => user,
        ViewGate::Loading | ViewGate::SignedOut => return Err(CliError::SignedOut),
    };

    dispatch(cli.command, &mut shell, &services, &user)?;

    let ctx = services.calendar();
    let notices = shell.take_notices();
    let (value, text) = match shell.active_tab() {
        Tab::Dashboard => {
            let summary = shell.dashboard.summary(&user, &ctx);
            (serde_json::to_value(&summary)?, render::dashboard(&summary)?)
        }
        Tab::Tasks => {
            let summary = shell.tasks.summary(&ctx);
            (serde_json::to_value(&summary)?, render::tasks(&summary)?)
        }
        Tab::Habits => {
            let summary = shell.habits.summary();
            (serde_json::to_value(&summary)?, render::habits(&summary)?)
        }
        Tab::Goals => {
            let summary = shell.goals.summary(&ctx);
            (serde_json::to_value(&summary)?, render::goals(&summary)?)
        }
        Tab::Progress => {
            let summary = shell.progress.summary(&ctx);
            (serde_json::to_value(&summary)?, render::progress(&summary)?)
        }
    };
    emit(cli.json, &value, text, &notices)?;
    Ok(notices)
}

/// Activates the command's tab, then performs its action, if any.
fn dispatch<A: AuthProvider + ?Sized>(
    command: Command,
    shell: &mut Shell<'_, A>,
    services: &Services<'_>,
    user: &User,
) -> Result<(), CliError> {
    match command {
        Command::Login | Command::Logout => {}
        Command::Dashboard => {
            shell.activate(Tab::Dashboard, services);
        }
        Command::Tasks { filter } => {
            shell.tasks.set_filter(filter);
            shell.activate(Tab::Tasks, services);
        }
        Command::Habits => {
            shell.activate(Tab::Habits, services);
        }
        Command::Goals => {
            shell.activate(Tab::Goals, services);
        }
        Command::Progress => {
            shell.activate(Tab::Progress, services);
        }
        Command::AddTask {
            title,
            priority,
            due_in_days,
            category,
        } => {
            let now = services.calendar().now;
            let due_date = due_in_days
                .map(|days| due_date_after(now, days))
                .transpose()?;
            shell.activate(Tab::Tasks, services);
            match title {
                Some(title) => shell.tasks.add(
                    services,
                    user,
                    NewTask {
                        title,
                        description: None,
                        priority,
                        due_date,
                        category,
                        is_recurring: false,
                    },
                ),
                None => shell.tasks.add_sample(services, user),
            }
        }
        Command::AddHabit { name, color } => {
            shell.activate(Tab::Habits, services);
            match name {
                Some(name) => shell.habits.add(services, user, &name, &color),
                None => shell.habits.add_sample(services, user),
            }
        }
        Command::AddGoal { title } => {
            shell.activate(Tab::Goals, services);
            match title {
                Some(title) => shell.goals.add(services, user, &title),
                None => shell.goals.add_sample(services, user),
            }
        }
        Command::CompleteTask { id } => {
            shell.activate(Tab::Tasks, services);
            shell.tasks.toggle(services, user, id, true);
        }
        Command::ReopenTask { id } => {
            shell.activate(Tab::Tasks, services);
            shell.tasks.toggle(services, user, id, false);
        }
        Command::CompleteHabit { id } => {
            shell.activate(Tab::Habits, services);
            shell.habits.complete(services, user, id);
        }
        Command::GoalProgress { id, add, set } => {
            shell.activate(Tab::Goals, services);
            let action = match (add, set) {
                (_, Some(value)) => GoalAction::Set(value),
                (Some(step), None) => GoalAction::Add(step),
                (None, None) => return Ok(()),
            };
            shell.goals.apply(services, user, id, action);
        }
        Command::CompleteGoal { id } => {
            shell.activate(Tab::Goals, services);
            shell.goals.apply(services, user, id, GoalAction::Complete);
        }
    }
    Ok(())
}

fn due_date_after(now: DateTime<Utc>, days: i64) -> Result<DateTime<Utc>, CliError> {
    TimeDelta::try_days(days)
        .and_then(|offset| now.checked_add_signed(offset))
        .ok_or(CliError::DueDateOutOfRange(days))
}

fn emit(
    json: bool,
    value: &serde_json::Value,
    text: String,
    notices: &[Notice],
) -> Result<(), CliError> {
    if json {
        let document = serde_json::json!({ "view": value, "notices": notices });
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }
    if !text.is_empty() {
        println!("{text}");
    }
    for notice in notices {
        match notice.level {
            NoticeLevel::Success => println!("{}", notice.message),
            NoticeLevel::Error => eprintln!("{}", notice.message),
        }
    }
    Ok(())
}
