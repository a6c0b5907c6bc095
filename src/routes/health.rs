use actix_web::{get, HttpResponse, Responder};
use serde_json::json;

/// Liveness probe. Always answers the same body and touches nothing else.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}
