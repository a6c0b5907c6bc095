use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use super::{attach_tasks, Store};
use crate::error::AppError;
use crate::models::{NewUser, Project, ProjectInput, ProjectWithTasks, Task, TaskInput, User};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    projects: Vec<Project>,
    tasks: Vec<Task>,
}

impl Tables {
    fn owns_project(&self, owner_id: Uuid, project_id: Uuid) -> bool {
        self.projects
            .iter()
            .any(|p| p.id == project_id && p.owner_id == owner_id)
    }

    fn owned_task_index(&self, owner_id: Uuid, task_id: Uuid) -> Option<usize> {
        let index = self.tasks.iter().position(|t| t.id == task_id)?;
        self.owns_project(owner_id, self.tasks[index].project_id)
            .then_some(index)
    }

    fn project_with_tasks(&self, project: &Project) -> ProjectWithTasks {
        ProjectWithTasks {
            project: project.clone(),
            tasks: self
                .tasks
                .iter()
                .filter(|t| t.project_id == project.id)
                .cloned()
                .collect(),
        }
    }

    fn remove_project(&mut self, project_id: Uuid) {
        self.projects.retain(|p| p.id != project_id);
        self.tasks.retain(|t| t.project_id != project_id);
    }
}

/// Process-local store with the same ownership and cascade rules as `PgStore`.
///
/// Each operation holds the lock for its whole check-then-write sequence. Nothing is
/// persisted across restarts.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, AppError> {
        self.tables
            .lock()
            .map_err(|_| AppError::InternalServerError("Memory store lock poisoned".into()))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut tables = self.lock()?;
        if tables.users.iter().any(|u| u.email == new_user.email) {
            return Err(AppError::Conflict("Email already registered".into()));
        }
        let user = User::new(new_user);
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.lock()?;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        let tables = self.lock()?;
        Ok(tables.users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.lock()?;
        let before = tables.users.len();
        tables.users.retain(|u| u.id != user_id);
        if tables.users.len() == before {
            return Ok(false);
        }

        let owned: Vec<Uuid> = tables
            .projects
            .iter()
            .filter(|p| p.owner_id == user_id)
            .map(|p| p.id)
            .collect();
        for project_id in owned {
            tables.remove_project(project_id);
        }
        Ok(true)
    }

    async fn create_project(
        &self,
        owner_id: Uuid,
        input: ProjectInput,
    ) -> Result<ProjectWithTasks, AppError> {
        let mut tables = self.lock()?;
        if !tables.users.iter().any(|u| u.id == owner_id) {
            // Mirrors the foreign key on projects.owner_id.
            return Err(AppError::NotFound("Related record not found".into()));
        }
        let project = Project::new(input, owner_id);
        tables.projects.push(project.clone());
        Ok(ProjectWithTasks {
            project,
            tasks: Vec::new(),
        })
    }

    async fn list_projects(&self, owner_id: Uuid) -> Result<Vec<ProjectWithTasks>, AppError> {
        let tables = self.lock()?;
        let projects: Vec<Project> = tables
            .projects
            .iter()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect();
        let tasks: Vec<Task> = tables
            .tasks
            .iter()
            .filter(|t| projects.iter().any(|p| p.id == t.project_id))
            .cloned()
            .collect();
        Ok(attach_tasks(projects, tasks))
    }

    async fn find_project(
        &self,
        owner_id: Uuid,
        project_id: Uuid,
    ) -> Result<Option<ProjectWithTasks>, AppError> {
        let tables = self.lock()?;
        Ok(tables
            .projects
            .iter()
            .find(|p| p.id == project_id && p.owner_id == owner_id)
            .map(|p| tables.project_with_tasks(p)))
    }

    async fn delete_project(&self, owner_id: Uuid, project_id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.lock()?;
        if !tables.owns_project(owner_id, project_id) {
            return Ok(false);
        }
        tables.remove_project(project_id);
        Ok(true)
    }

    async fn create_task(
        &self,
        owner_id: Uuid,
        project_id: Uuid,
        input: TaskInput,
    ) -> Result<Option<Task>, AppError> {
        let mut tables = self.lock()?;
        if !tables.owns_project(owner_id, project_id) {
            return Ok(None);
        }
        let task = Task::new(input, project_id);
        tables.tasks.push(task.clone());
        Ok(Some(task))
    }

    async fn toggle_task(&self, owner_id: Uuid, task_id: Uuid) -> Result<Option<Task>, AppError> {
        let mut tables = self.lock()?;
        let Some(index) = tables.owned_task_index(owner_id, task_id) else {
            return Ok(None);
        };
        let task = &mut tables.tasks[index];
        task.completed = !task.completed;
        Ok(Some(task.clone()))
    }

    async fn delete_task(&self, owner_id: Uuid, task_id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.lock()?;
        let Some(index) = tables.owned_task_index(owner_id, task_id) else {
            return Ok(false);
        };
        tables.tasks.remove(index);
        Ok(true)
    }
}
