use actix_web::{HttpResponse, Responder, web};
use tracing::debug;

use crate::{error::AppError, model::attendance::AttendanceStats, store::AttendanceStore};

/// Totals and per-ministry breakdown
#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Attendance totals", body = AttendanceStats, example = json!({
            "total": 3,
            "withMinistry": 2,
            "withoutMinistry": 1,
            "ministryBreakdown": [
                { "ministry": "Choir", "count": 2 },
                { "ministry": "Media", "count": 1 }
            ]
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Stats"
)]
pub async fn get_stats(store: web::Data<dyn AttendanceStore>) -> Result<impl Responder, AppError> {
    let stats = store.stats().await?;
    debug!(total = stats.total, ministries = stats.ministry_breakdown.len(), "Computed stats");

    Ok(HttpResponse::Ok().json(stats))
}
