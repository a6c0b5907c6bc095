use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

use super::{attach_tasks, Store};
use crate::error::AppError;
use crate::models::{NewUser, Project, ProjectInput, ProjectWithTasks, Task, TaskInput, User};

/// Postgres-backed store.
///
/// Each call checks a connection out of the pool and hands it back when the query or
/// transaction future completes, on success and on error. Cascades are enforced by the
/// `ON DELETE CASCADE` foreign keys in `migrations/`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Applies pending schema migrations.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError> {
        let user = User::new(new_user);
        let created = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, name, password_hash, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, email, name, password_hash, created_at",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, name, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, name, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn create_project(
        &self,
        owner_id: Uuid,
        input: ProjectInput,
    ) -> Result<ProjectWithTasks, AppError> {
        let project = Project::new(input, owner_id);
        let created = sqlx::query_as::<_, Project>(
            "INSERT INTO projects (id, owner_id, name, description, reward, deadline, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id, owner_id, name, description, reward, deadline, created_at",
        )
        .bind(project.id)
        .bind(project.owner_id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(&project.reward)
        .bind(&project.deadline)
        .bind(project.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(ProjectWithTasks {
            project: created,
            tasks: Vec::new(),
        })
    }

    async fn list_projects(&self, owner_id: Uuid) -> Result<Vec<ProjectWithTasks>, AppError> {
        let mut tx = self.pool.begin().await?;
        // Both reads must see one snapshot so every listed task belongs to a listed project.
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
            .execute(&mut *tx)
            .await?;

        let projects = sqlx::query_as::<_, Project>(
            "SELECT id, owner_id, name, description, reward, deadline, created_at
             FROM projects WHERE owner_id = $1
             ORDER BY created_at, id",
        )
        .bind(owner_id)
        .fetch_all(&mut *tx)
        .await?;

        let tasks = sqlx::query_as::<_, Task>(
            "SELECT t.id, t.project_id, t.title, t.description, t.completed, t.weight, t.created_at
             FROM tasks t JOIN projects p ON p.id = t.project_id
             WHERE p.owner_id = $1
             ORDER BY t.created_at, t.id",
        )
        .bind(owner_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(attach_tasks(projects, tasks))
    }

    async fn find_project(
        &self,
        owner_id: Uuid,
        project_id: Uuid,
    ) -> Result<Option<ProjectWithTasks>, AppError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
            .execute(&mut *tx)
            .await?;

        let project = sqlx::query_as::<_, Project>(
            "SELECT id, owner_id, name, description, reward, deadline, created_at
             FROM projects WHERE id = $1 AND owner_id = $2",
        )
        .bind(project_id)
        .bind(owner_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(project) = project else {
            return Ok(None);
        };

        let tasks = sqlx::query_as::<_, Task>(
            "SELECT id, project_id, title, description, completed, weight, created_at
             FROM tasks WHERE project_id = $1
             ORDER BY created_at, id",
        )
        .bind(project.id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(ProjectWithTasks { project, tasks }))
    }

    async fn delete_project(&self, owner_id: Uuid, project_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND owner_id = $2")
            .bind(project_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn create_task(
        &self,
        owner_id: Uuid,
        project_id: Uuid,
        input: TaskInput,
    ) -> Result<Option<Task>, AppError> {
        let mut tx = self.pool.begin().await?;

        // Holds the project row until commit so a concurrent delete cannot orphan the task.
        let owned = sqlx::query_as::<_, (Uuid,)>(
            "SELECT id FROM projects WHERE id = $1 AND owner_id = $2 FOR SHARE",
        )
        .bind(project_id)
        .bind(owner_id)
        .fetch_optional(&mut *tx)
        .await?;

        if owned.is_none() {
            return Ok(None);
        }

        let task = Task::new(input, project_id);
        let created = sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (id, project_id, title, description, completed, weight, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id, project_id, title, description, completed, weight, created_at",
        )
        .bind(task.id)
        .bind(task.project_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.completed)
        .bind(task.weight)
        .bind(task.created_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(created))
    }

    async fn toggle_task(&self, owner_id: Uuid, task_id: Uuid) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(
            "UPDATE tasks t SET completed = NOT t.completed
             FROM projects p
             WHERE t.id = $1 AND p.id = t.project_id AND p.owner_id = $2
             RETURNING t.id, t.project_id, t.title, t.description, t.completed, t.weight, t.created_at",
        )
        .bind(task_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn delete_task(&self, owner_id: Uuid, task_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "DELETE FROM tasks t USING projects p
             WHERE t.id = $1 AND p.id = t.project_id AND p.owner_id = $2",
        )
        .bind(task_id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
