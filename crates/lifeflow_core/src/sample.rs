//! Built-in sample catalogs used by the "add sample" actions.

use crate::model::goal::Goal;
use crate::model::habit::Habit;
use crate::model::task::{Task, TaskPriority};
use crate::model::user::UserId;
use chrono::{DateTime, Duration, Utc};

pub struct SampleTask {
    pub title: &'static str,
    pub priority: TaskPriority,
    pub due_in_days: i64,
}

pub struct SampleHabit {
    pub name: &'static str,
    pub color: &'static str,
}

pub struct SampleGoal {
    pub title: &'static str,
    pub description: &'static str,
    pub progress: u8,
    pub target_in_days: i64,
    pub category: &'static str,
}

pub const SAMPLE_TASKS: &[SampleTask] = &[
    SampleTask {
        title: "Review project proposal",
        priority: TaskPriority::High,
        due_in_days: 0,
    },
    SampleTask {
        title: "Call dentist for appointment",
        priority: TaskPriority::Medium,
        due_in_days: 1,
    },
    SampleTask {
        title: "Buy groceries",
        priority: TaskPriority::Low,
        due_in_days: 0,
    },
    SampleTask {
        title: "Finish quarterly report",
        priority: TaskPriority::High,
        due_in_days: 2,
    },
];

pub const SAMPLE_HABITS: &[SampleHabit] = &[
    SampleHabit {
        name: "Drink 8 glasses of water",
        color: "#3B82F6",
    },
    SampleHabit {
        name: "Exercise for 30 minutes",
        color: "#EF4444",
    },
    SampleHabit {
        name: "Read for 20 minutes",
        color: "#10B981",
    },
    SampleHabit {
        name: "Meditate for 10 minutes",
        color: "#8B5CF6",
    },
    SampleHabit {
        name: "Write in journal",
        color: "#F59E0B",
    },
];

pub const SAMPLE_GOALS: &[SampleGoal] = &[
    SampleGoal {
        title: "Learn a new programming language",
        description: "Master TypeScript fundamentals",
        progress: 25,
        target_in_days: 90,
        category: "Learning",
    },
    SampleGoal {
        title: "Run a 5K marathon",
        description: "Complete a 5K run without stopping",
        progress: 40,
        target_in_days: 60,
        category: "Fitness",
    },
    SampleGoal {
        title: "Read 12 books this year",
        description: "Read one book per month",
        progress: 33,
        target_in_days: 120,
        category: "Personal",
    },
    SampleGoal {
        title: "Save $5000 for vacation",
        description: "Build emergency fund for travel",
        progress: 60,
        target_in_days: 180,
        category: "Financial",
    },
];

impl SampleTask {
    pub fn build(&self, user_id: UserId, now: DateTime<Utc>) -> Task {
        let mut task = Task::new(user_id, self.title, self.priority, now);
        task.due_date = Some(now + Duration::days(self.due_in_days));
        task
    }
}

impl SampleHabit {
    pub fn build(&self, user_id: UserId, now: DateTime<Utc>) -> Habit {
        Habit::new(user_id, self.name, self.color, now)
    }
}

impl SampleGoal {
    pub fn build(&self, user_id: UserId, now: DateTime<Utc>) -> Goal {
        let mut goal = Goal::new(user_id, self.title, now);
        goal.description = Some(self.description.to_string());
        goal.progress = self.progress;
        goal.target_date = Some(now + Duration::days(self.target_in_days));
        goal.category = Some(self.category.to_string());
        goal
    }
}

#[cfg(test)]
mod tests {
    use super::{SAMPLE_GOALS, SAMPLE_HABITS, SAMPLE_TASKS};
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn every_sample_builds_a_valid_record() {
        let user_id = Uuid::new_v4();
        let now = Utc::now();
        for sample in SAMPLE_TASKS {
            sample.build(user_id, now).validate().unwrap();
        }
        for sample in SAMPLE_HABITS {
            sample.build(user_id, now).validate().unwrap();
        }
        for sample in SAMPLE_GOALS {
            sample.build(user_id, now).validate().unwrap();
        }
    }
}
