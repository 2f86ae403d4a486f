//! Task use-case service.

use super::{owned, ServiceError, ServiceResult};
use crate::clock::Clock;
use crate::model::patch::TaskPatch;
use crate::model::task::{Task, TaskId, TaskPriority};
use crate::model::user::UserId;
use crate::repo::task_repo::{TaskListQuery, TaskRepository};
use crate::sample::SAMPLE_TASKS;
use chrono::{DateTime, Utc};
use log::info;
use rand::seq::SliceRandom;

/// Fields accepted when creating a task by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
    pub category: Option<String>,
    pub is_recurring: bool,
}

pub struct TaskService<R: TaskRepository, C: Clock> {
    repo: R,
    clock: C,
}

impl<R: TaskRepository, C: Clock> TaskService<R, C> {
    pub fn new(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    pub fn list_tasks(&self, query: &TaskListQuery) -> ServiceResult<Vec<Task>> {
        Ok(self.repo.list_tasks(query)?)
    }

    pub fn add_task(&self, user_id: UserId, request: NewTask) -> ServiceResult<Task> {
        let mut task = Task::new(user_id, request.title, request.priority, self.clock.now());
        task.description = request.description;
        task.due_date = request.due_date;
        task.category = request.category;
        task.is_recurring = request.is_recurring;
        self.create(task)
    }

    /// Creates a random entry from the sample task catalog.
    pub fn add_sample_task(&self, user_id: UserId) -> ServiceResult<Task> {
        let sample = SAMPLE_TASKS
            .choose(&mut rand::thread_rng())
            .ok_or(ServiceError::EmptyCatalog("task"))?;
        self.create(sample.build(user_id, self.clock.now()))
    }

    /// Completes or reopens a task and returns the applied patch.
    pub fn set_completed(
        &self,
        user_id: UserId,
        task_id: TaskId,
        completed: bool,
    ) -> ServiceResult<TaskPatch> {
        owned(
            self.repo.get_task(task_id)?,
            |task| task.user_id,
            user_id,
            "task",
            task_id,
        )?;

        let patch = TaskPatch::completion(completed, self.clock.now());
        self.repo.update_task(task_id, &patch)?;
        info!(
            "event=task_update module=service status=ok task_id={task_id} completed={completed}"
        );
        Ok(patch)
    }

    fn create(&self, task: Task) -> ServiceResult<Task> {
        let created = self.repo.create_task(&task)?;
        info!(
            "event=task_create module=service status=ok task_id={} priority={}",
            created.id,
            created.priority.as_str()
        );
        Ok(created)
    }
}
