use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::task::{Task, TaskResponse};

/// Input structure for creating a project.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ProjectInput {
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    /// Free text describing what finishing the project earns.
    #[validate(length(max = 500))]
    pub reward: Option<String>,

    /// Kept as given; not checked against the calendar.
    #[validate(length(max = 64))]
    pub deadline: Option<String>,
}

/// A project row.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Project {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub reward: Option<String>,
    pub deadline: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A project together with its tasks in creation order.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectWithTasks {
    pub project: Project,
    pub tasks: Vec<Task>,
}

/// Wire representation of a project. The owner is implied by the token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub reward: Option<String>,
    pub deadline: Option<String>,
    pub created_at: DateTime<Utc>,
    pub tasks: Vec<TaskResponse>,
}

impl Project {
    pub fn new(input: ProjectInput, owner_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: input.name,
            description: input.description,
            reward: input.reward,
            deadline: input.deadline,
            created_at: Utc::now(),
        }
    }
}

impl From<ProjectWithTasks> for ProjectResponse {
    fn from(value: ProjectWithTasks) -> Self {
        let ProjectWithTasks { project, tasks } = value;
        Self {
            id: project.id,
            name: project.name,
            description: project.description,
            reward: project.reward,
            deadline: project.deadline,
            created_at: project.created_at,
            tasks: tasks.into_iter().map(TaskResponse::from).collect(),
        }
    }
}
