use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;
use tracing::{error, warn};

use crate::store::StoreError;

/// Every failure a request can end in.
#[derive(Debug, Display)]
pub enum AppError {
    /// Client input missing or inconsistent.
    #[display(fmt = "{}", message)]
    Validation {
        message: String,
        fields: Vec<String>,
    },

    #[display(fmt = "Attendance record not found")]
    NotFound,

    #[display(fmt = "Database error: {}", _0)]
    Persistence(StoreError),
}

impl AppError {
    pub fn validation(message: impl Into<String>, fields: Vec<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            fields,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Persistence(e)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Validation { message, fields } => {
                warn!(fields = ?fields, "{}", message);
                HttpResponse::BadRequest().json(json!({
                    "message": message,
                    "fields": fields
                }))
            }
            AppError::NotFound => {
                warn!("Attendance record not found");
                HttpResponse::NotFound().json(json!({
                    "message": "Attendance record not found"
                }))
            }
            AppError::Persistence(e) => {
                error!(error = %e, "Store operation failed");
                HttpResponse::InternalServerError().json(json!({
                    "message": "Database error",
                    "error": e.to_string()
                }))
            }
        }
    }
}
