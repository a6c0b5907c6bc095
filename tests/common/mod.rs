#![allow(dead_code)]

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{header, StatusCode};
use actix_web::middleware::Logger;
use actix_web::{test, web, App};
use chrono::Duration;
use guilt_tracker::auth::{PasswordHasher, TokenService};
use guilt_tracker::routes;
use guilt_tracker::store::{MemoryStore, Store};
use serde_json::{json, Value};
use std::sync::Arc;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "Password123!";

/// The full route table over a fresh in-memory store.
pub async fn test_app(
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    test::init_service(
        App::new()
            .app_data(web::Data::from(store))
            .app_data(web::Data::new(PasswordHasher::new(4).unwrap()))
            .app_data(web::Data::new(TokenService::new(
                TEST_SECRET,
                Duration::hours(1),
            )))
            .wrap(Logger::default())
            .configure(routes::config),
    )
    .await
}

/// Calls the app and returns the status with the JSON body (`Null` when empty).
pub async fn send<S, B>(app: &S, req: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()))
    };
    (status, json)
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

/// Signs up a user and returns the access token with the returned profile.
pub async fn signup<S, B>(app: &S, email: &str, name: &str) -> (String, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/auth/signup")
        .set_json(json!({ "email": email, "name": name, "password": PASSWORD }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {}", body);

    let token = body["access_token"]
        .as_str()
        .expect("access_token in signup response")
        .to_string();
    (token, body["user"].clone())
}

pub async fn create_project<S, B>(app: &S, token: &str, payload: Value) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/projects")
        .insert_header(bearer(token))
        .set_json(payload)
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "create project failed: {}", body);
    body
}

pub async fn create_task<S, B>(app: &S, token: &str, project_id: &str, payload: Value) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri(&format!("/projects/{}/tasks", project_id))
        .insert_header(bearer(token))
        .set_json(payload)
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "create task failed: {}", body);
    body
}
