//! Tasks tab.

use super::{Notice, Notices, Services};
use crate::metrics::task_metrics::{filter_tasks, task_stats, TaskFilter, TaskStats};
use crate::metrics::CalendarContext;
use crate::model::task::{Task, TaskId};
use crate::model::user::User;
use crate::repo::task_repo::TaskListQuery;
use crate::service::task_service::NewTask;
use crate::service::ServiceResult;
use log::error;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TasksSummary {
    pub filter: TaskFilter,
    pub stats: TaskStats,
    pub visible: Vec<Task>,
}

#[derive(Debug, Default)]
pub struct TasksView {
    tasks: Vec<Task>,
    filter: TaskFilter,
    pub notices: Notices,
}

impl TasksView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn set_filter(&mut self, filter: TaskFilter) {
        self.filter = filter;
    }

    pub fn refresh(&mut self, services: &Services<'_>, user: &User) {
        match services
            .tasks
            .list_tasks(&TaskListQuery::for_user(user.id))
        {
            Ok(tasks) => self.tasks = tasks,
            Err(err) => {
                error!("event=view_load module=view view=tasks status=error error={err}");
                self.notices.push(Notice::error("Failed to load tasks"));
            }
        }
    }

    pub fn summary(&self, ctx: &CalendarContext) -> TasksSummary {
        TasksSummary {
            filter: self.filter,
            stats: task_stats(&self.tasks, ctx),
            visible: filter_tasks(&self.tasks, self.filter, ctx)
                .into_iter()
                .cloned()
                .collect(),
        }
    }

    pub fn add(&mut self, services: &Services<'_>, user: &User, request: NewTask) {
        self.on_created(services.tasks.add_task(user.id, request));
    }

    pub fn add_sample(&mut self, services: &Services<'_>, user: &User) {
        self.on_created(services.tasks.add_sample_task(user.id));
    }

    fn on_created(&mut self, result: ServiceResult<Task>) {
        match result {
            Ok(task) => {
                self.tasks.insert(0, task);
                self.notices.push(Notice::success("Task added successfully!"));
            }
            Err(err) => {
                error!("event=view_action module=view view=tasks action=add status=error error={err}");
                self.notices.push(Notice::error("Failed to add task"));
            }
        }
    }

    /// Completes or reopens `task_id`, mirroring the change locally.
    pub fn toggle(
        &mut self,
        services: &Services<'_>,
        user: &User,
        task_id: TaskId,
        completed: bool,
    ) {
        match services.tasks.set_completed(user.id, task_id, completed) {
            Ok(patch) => {
                if let Some(task) = self.tasks.iter_mut().find(|task| task.id == task_id) {
                    patch.apply_to(task);
                }
                if completed {
                    self.notices
                        .push(Notice::success("Task completed! Great job!"));
                }
            }
            Err(err) => {
                error!(
                    "event=view_action module=view view=tasks action=toggle status=error task_id={task_id} error={err}"
                );
                self.notices.push(Notice::error("Failed to update task"));
            }
        }
    }
}
