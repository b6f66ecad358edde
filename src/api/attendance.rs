use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppError,
    model::attendance::{AttendanceQuery, AttendanceRecord, CreateAttendance},
    store::AttendanceStore,
};

#[derive(Serialize, ToSchema)]
pub struct AttendanceListResponse {
    #[schema(example = 1)]
    pub count: usize,
    pub data: Vec<AttendanceRecord>,
}

/// Ids are UUIDs; anything else cannot name a stored record.
fn record_id(raw: &str) -> Result<String, AppError> {
    Uuid::parse_str(raw.trim())
        .map(|id| id.to_string())
        .map_err(|_| AppError::NotFound)
}

/// Record a check-in
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = CreateAttendance,
    responses(
        (status = 201, description = "Attendance recorded", body = Object, example = json!({
            "message": "Attendance recorded successfully",
            "data": {
                "id": "6f1c2d9e-3b7a-4c51-9a0e-2f8d7c6b5a41",
                "email": "jane@example.com",
                "fullName": "Jane Doe",
                "isMemberOfMinistry": true,
                "ministries": ["Choir"],
                "timestamp": "2026-03-01T09:30:00Z"
            }
        })),
        (status = 400, description = "Missing or invalid fields", body = Object, example = json!({
            "message": "Missing or invalid fields",
            "fields": ["ministries"]
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn create_attendance(
    store: web::Data<dyn AttendanceStore>,
    payload: web::Json<CreateAttendance>,
) -> Result<impl Responder, AppError> {
    let record = payload.into_inner().into_record(Utc::now())?;

    store.insert(&record).await?;

    info!(id = %record.id, email = %record.email, ministries = ?record.ministries, "Attendance recorded");

    Ok(HttpResponse::Created().json(json!({
        "message": "Attendance recorded successfully",
        "data": record
    })))
}

/// List check-ins, newest first
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Matching attendance records", body = AttendanceListResponse),
        (status = 400, description = "Unparseable date filter"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    store: web::Data<dyn AttendanceStore>,
    query: web::Query<AttendanceQuery>,
) -> Result<impl Responder, AppError> {
    let filter = query.into_inner().into_filter()?;

    let records = store.list(&filter).await?;
    debug!(filter = ?filter, count = records.len(), "Listed attendance");

    Ok(HttpResponse::Ok().json(AttendanceListResponse {
        count: records.len(),
        data: records,
    }))
}

/// Get one check-in
#[utoipa::path(
    get,
    path = "/api/attendance/{id}",
    params(
        ("id" = String, Path, description = "Attendance record id")
    ),
    responses(
        (status = 200, description = "Attendance record found", body = Object, example = json!({
            "data": {
                "id": "6f1c2d9e-3b7a-4c51-9a0e-2f8d7c6b5a41",
                "email": "jane@example.com",
                "fullName": "Jane Doe",
                "isMemberOfMinistry": false,
                "ministries": [],
                "timestamp": "2026-03-01T09:30:00Z"
            }
        })),
        (status = 404, description = "Attendance record not found", body = Object, example = json!({
            "message": "Attendance record not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn get_attendance(
    store: web::Data<dyn AttendanceStore>,
    path: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let id = record_id(&path.into_inner())?;

    let record = store.get(&id).await?.ok_or(AppError::NotFound)?;

    Ok(HttpResponse::Ok().json(json!({ "data": record })))
}

/// Delete one check-in
#[utoipa::path(
    delete,
    path = "/api/attendance/{id}",
    params(
        ("id" = String, Path, description = "Attendance record id")
    ),
    responses(
        (status = 200, description = "Deleted record", body = Object, example = json!({
            "message": "Attendance record deleted",
            "data": {
                "id": "6f1c2d9e-3b7a-4c51-9a0e-2f8d7c6b5a41",
                "email": "jane@example.com",
                "fullName": "Jane Doe",
                "isMemberOfMinistry": false,
                "ministries": [],
                "timestamp": "2026-03-01T09:30:00Z"
            }
        })),
        (status = 404, description = "Attendance record not found", body = Object, example = json!({
            "message": "Attendance record not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn delete_attendance(
    store: web::Data<dyn AttendanceStore>,
    path: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let id = record_id(&path.into_inner())?;

    let record = store.delete(&id).await?.ok_or(AppError::NotFound)?;
    info!(id = %record.id, "Attendance record deleted");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Attendance record deleted",
        "data": record
    })))
}
