use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Input structure for creating a task under a project.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    /// Relative importance. Not range checked; `None` or absent means 1.0.
    pub weight: Option<f64>,
}

/// A task row. The owning user is reached through `project_id`.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub weight: f64,
    /// Orders tasks within a project; not exposed.
    pub created_at: DateTime<Utc>,
}

/// Wire representation of a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResponse {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub weight: f64,
}

impl Task {
    /// Creates a new, not yet completed `Task` under `project_id`.
    pub fn new(input: TaskInput, project_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            title: input.title,
            description: input.description,
            completed: false,
            weight: input.weight.unwrap_or(DEFAULT_WEIGHT),
            created_at: Utc::now(),
        }
    }
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            project_id: task.project_id,
            title: task.title,
            description: task.description,
            completed: task.completed,
            weight: task.weight,
        }
    }
}
