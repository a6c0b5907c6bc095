pub mod auth;
pub mod health;
pub mod projects;
pub mod tasks;

use actix_web::web;

use crate::auth::AuthMiddleware;
use crate::error::AppError;

/// Registers every route plus the body and path extractor configuration.
///
/// Expects `web::Data<dyn Store>`, `web::Data<TokenService>` and
/// `web::Data<PasswordHasher>` to be registered on the `App`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .service(health::health)
        .service(
            web::scope("/auth")
                .service(auth::signup)
                .service(auth::login)
                .service(
                    web::resource("/me")
                        .wrap(AuthMiddleware)
                        .route(web::get().to(auth::me))
                        .route(web::delete().to(auth::delete_me)),
                ),
        )
        .service(
            web::scope("/projects")
                .wrap(AuthMiddleware)
                .service(projects::create_project)
                .service(projects::list_projects)
                .service(projects::get_project)
                .service(projects::delete_project)
                .service(projects::create_task),
        )
        .service(
            web::scope("/tasks")
                .wrap(AuthMiddleware)
                .service(tasks::toggle_task)
                .service(tasks::delete_task),
        );
}

/// Unreadable or incomplete JSON bodies are validation errors.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::invalid_field("body", err.to_string()).into())
}

/// An `{id}` that is not a UUID cannot name any entity.
fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|_err, _req| AppError::NotFound("Resource not found".into()).into())
}
