//! Persistence for users, projects and tasks.
//!
//! Every project and task operation takes the caller's user id and is scoped by it: a row
//! that belongs to someone else is reported exactly like a row that does not exist
//! (`None` / `false`). Task ownership is always resolved through the parent project.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;
use crate::models::{NewUser, Project, ProjectInput, ProjectWithTasks, Task, TaskInput, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    /// Fails with `AppError::Conflict` when the email is already registered.
    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError>;

    /// Exact, case-sensitive match.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, AppError>;

    /// Deletes the user with all of their projects and tasks.
    async fn delete_user(&self, user_id: Uuid) -> Result<bool, AppError>;

    async fn create_project(
        &self,
        owner_id: Uuid,
        input: ProjectInput,
    ) -> Result<ProjectWithTasks, AppError>;

    /// The owner's projects in creation order.
    async fn list_projects(&self, owner_id: Uuid) -> Result<Vec<ProjectWithTasks>, AppError>;

    async fn find_project(
        &self,
        owner_id: Uuid,
        project_id: Uuid,
    ) -> Result<Option<ProjectWithTasks>, AppError>;

    /// Deletes the project and its tasks.
    async fn delete_project(&self, owner_id: Uuid, project_id: Uuid) -> Result<bool, AppError>;

    /// Returns `None` when the project is missing or not owned by `owner_id`.
    async fn create_task(
        &self,
        owner_id: Uuid,
        project_id: Uuid,
        input: TaskInput,
    ) -> Result<Option<Task>, AppError>;

    /// Negates `completed` and returns the updated task.
    async fn toggle_task(&self, owner_id: Uuid, task_id: Uuid) -> Result<Option<Task>, AppError>;

    async fn delete_task(&self, owner_id: Uuid, task_id: Uuid) -> Result<bool, AppError>;
}

/// Opens the store selected by the configuration.
///
/// With a `DATABASE_URL` this connects the Postgres pool and applies migrations; without
/// one it falls back to an empty `MemoryStore`.
pub async fn from_config(config: &Config) -> Result<Arc<dyn Store>, AppError> {
    match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url, config.database_max_connections).await?;
            store.migrate().await?;
            log::info!(
                "Using Postgres store (max {} connections)",
                config.database_max_connections
            );
            Ok(Arc::new(store))
        }
        None => {
            log::warn!("DATABASE_URL is not set; using the in-memory store, data will not persist");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Distributes `tasks` over `projects`, keeping both input orders.
pub(crate) fn attach_tasks(projects: Vec<Project>, tasks: Vec<Task>) -> Vec<ProjectWithTasks> {
    let mut by_project: HashMap<Uuid, Vec<Task>> = HashMap::new();
    for task in tasks {
        by_project.entry(task.project_id).or_default().push(task);
    }

    projects
        .into_iter()
        .map(|project| {
            let tasks = by_project.remove(&project.id).unwrap_or_default();
            ProjectWithTasks { project, tasks }
        })
        .collect()
}
