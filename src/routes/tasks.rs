use crate::{auth::AuthenticatedUser, error::AppError, models::TaskResponse, store::Store};
use actix_web::{delete, patch, web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;

fn task_not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}

/// Flips `completed` on a task in one of the caller's projects and returns the task.
#[patch("/{id}/toggle")]
pub async fn toggle_task(
    store: web::Data<dyn Store>,
    caller: AuthenticatedUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = store
        .toggle_task(caller.user_id(), task_id.into_inner())
        .await?
        .ok_or_else(task_not_found)?;

    Ok(HttpResponse::Ok().json(TaskResponse::from(task)))
}

#[delete("/{id}")]
pub async fn delete_task(
    store: web::Data<dyn Store>,
    caller: AuthenticatedUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    if !store
        .delete_task(caller.user_id(), task_id.into_inner())
        .await?
    {
        return Err(task_not_found());
    }

    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted" })))
}
