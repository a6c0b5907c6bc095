use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{ProjectInput, ProjectResponse, TaskInput, TaskResponse},
    store::Store,
};
use actix_web::{delete, get, post, web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

fn project_not_found() -> AppError {
    AppError::NotFound("Project not found".into())
}

/// Creates a project owned by the caller.
///
/// ## Responses:
/// - `201 Created`: The new `ProjectResponse`, with an empty `tasks` list.
/// - `422 Unprocessable Entity`: Missing or overlong `name`, or overlong optional fields.
#[post("")]
pub async fn create_project(
    store: web::Data<dyn Store>,
    caller: AuthenticatedUser,
    project_data: web::Json<ProjectInput>,
) -> Result<impl Responder, AppError> {
    project_data.validate()?;

    let project = store
        .create_project(caller.user_id(), project_data.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(ProjectResponse::from(project)))
}

/// Lists the caller's projects, each with its tasks.
#[get("")]
pub async fn list_projects(
    store: web::Data<dyn Store>,
    caller: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let projects: Vec<ProjectResponse> = store
        .list_projects(caller.user_id())
        .await?
        .into_iter()
        .map(ProjectResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(projects))
}

/// Fetches one project with its tasks.
///
/// ## Responses:
/// - `200 OK`: The `ProjectResponse`.
/// - `404 Not Found`: No such project, or it belongs to another user.
#[get("/{id}")]
pub async fn get_project(
    store: web::Data<dyn Store>,
    caller: AuthenticatedUser,
    project_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let project = store
        .find_project(caller.user_id(), project_id.into_inner())
        .await?
        .ok_or_else(project_not_found)?;

    Ok(HttpResponse::Ok().json(ProjectResponse::from(project)))
}

/// Deletes a project and, by cascade, its tasks.
#[delete("/{id}")]
pub async fn delete_project(
    store: web::Data<dyn Store>,
    caller: AuthenticatedUser,
    project_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    if !store
        .delete_project(caller.user_id(), project_id.into_inner())
        .await?
    {
        return Err(project_not_found());
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Project deleted" })))
}

/// Adds a task to one of the caller's projects.
///
/// ## Responses:
/// - `201 Created`: The new `TaskResponse`, `completed: false`, `weight` defaulting to 1.0.
/// - `404 Not Found`: No such project, or it belongs to another user.
/// - `422 Unprocessable Entity`: Missing or overlong `title`.
#[post("/{id}/tasks")]
pub async fn create_task(
    store: web::Data<dyn Store>,
    caller: AuthenticatedUser,
    project_id: web::Path<Uuid>,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = store
        .create_task(caller.user_id(), project_id.into_inner(), task_data.into_inner())
        .await?
        .ok_or_else(project_not_found)?;

    Ok(HttpResponse::Created().json(TaskResponse::from(task)))
}
