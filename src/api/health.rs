use actix_web::{HttpResponse, Responder, get};
use serde_json::json;

/// Liveness probe
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is up", body = Object, example = json!({
            "status": "ok",
            "message": "Attendance API is running"
        }))
    ),
    tag = "Health"
)]
#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "message": "Attendance API is running"
    }))
}
