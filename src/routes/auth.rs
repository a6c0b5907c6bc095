use crate::{
    auth::{AuthenticatedUser, LoginRequest, PasswordHasher, SignupRequest, TokenResponse, TokenService},
    error::AppError,
    models::{NewUser, UserProfile},
    store::Store,
};
use actix_web::{post, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

/// The single rejection for every failed login.
fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid email or password".into())
}

/// Create an account
///
/// Stores only the bcrypt hash of the password and signs the new user in right away.
///
/// ## Responses:
/// - `201 Created`: `TokenResponse` with the new user's profile.
/// - `409 Conflict`: The email is already registered (exact match).
/// - `422 Unprocessable Entity`: Invalid email, empty name or short password.
#[post("/signup")]
pub async fn signup(
    store: web::Data<dyn Store>,
    hasher: web::Data<PasswordHasher>,
    tokens: web::Data<TokenService>,
    signup_data: web::Json<SignupRequest>,
) -> Result<impl Responder, AppError> {
    signup_data.validate()?;
    let SignupRequest {
        email,
        name,
        password,
    } = signup_data.into_inner();

    if store.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let password_hash = web::block(move || hasher.hash(&password)).await??;

    // The unique constraint still rejects a concurrent signup that raced past the check.
    let user = store
        .create_user(NewUser {
            email,
            name,
            password_hash,
        })
        .await?;
    log::info!("Registered user {}", user.id);

    let token = tokens.issue(user.id, &user.email)?;
    Ok(HttpResponse::Created().json(TokenResponse::bearer(token, user.into())))
}

/// Login
///
/// Unknown emails and wrong passwords get the same response after the same bcrypt work.
///
/// ## Responses:
/// - `200 OK`: `TokenResponse`.
/// - `401 Unauthorized`: Credentials rejected.
/// - `422 Unprocessable Entity`: Email or password missing.
#[post("/login")]
pub async fn login(
    store: web::Data<dyn Store>,
    hasher: web::Data<PasswordHasher>,
    tokens: web::Data<TokenService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;
    let LoginRequest { email, password } = login_data.into_inner();

    let candidate = store.find_user_by_email(&email).await?;
    let user = web::block(move || match candidate {
        Some(user) if hasher.verify(&password, &user.password_hash) => Some(user),
        Some(_) => None,
        None => {
            hasher.verify_dummy(&password);
            None
        }
    })
    .await?;

    let Some(user) = user else {
        log::info!("Rejected login attempt");
        return Err(invalid_credentials());
    };

    let token = tokens.issue(user.id, &user.email)?;
    Ok(HttpResponse::Ok().json(TokenResponse::bearer(token, user.into())))
}

/// Current user
///
/// A valid token whose account has since been deleted yields `404`.
pub async fn me(
    store: web::Data<dyn Store>,
    caller: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let user = store
        .find_user(caller.user_id())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(HttpResponse::Ok().json(UserProfile::from(user)))
}

/// Delete the caller's account together with all of its projects and tasks.
pub async fn delete_me(
    store: web::Data<dyn Store>,
    caller: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    if !store.delete_user(caller.user_id()).await? {
        return Err(AppError::NotFound("User not found".into()));
    }
    log::info!("Deleted user {}", caller.user_id());

    Ok(HttpResponse::Ok().json(json!({ "message": "Account deleted" })))
}
