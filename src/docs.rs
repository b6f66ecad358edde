use crate::api::attendance::AttendanceListResponse;
use crate::model::attendance::{AttendanceRecord, AttendanceStats, CreateAttendance, MinistryCount};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance API",
        version = "1.0.0",
        description = r#"
## Attendance check-in service

Records who attended, and which ministries they serve in.

### Key Features
- **Check-in**
  - Record a person's attendance with their ministries
- **Browse**
  - List check-ins by date range and ministry, fetch or delete one
- **Stats**
  - Totals and a per-ministry breakdown

### Ministries
`ministries` is always an array. Older clients may still send a single
`ministry` string; it is stored as a one-element array.

### Response Format
- JSON everywhere, errors included: `{"message": ..., "fields": [...]}`

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::health::index,

        crate::api::attendance::create_attendance,
        crate::api::attendance::list_attendance,
        crate::api::attendance::get_attendance,
        crate::api::attendance::delete_attendance,

        crate::api::stats::get_stats
    ),
    components(
        schemas(
            AttendanceRecord,
            CreateAttendance,
            AttendanceListResponse,
            AttendanceStats,
            MinistryCount
        )
    ),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Attendance", description = "Attendance check-in APIs"),
        (name = "Stats", description = "Attendance aggregates"),
    )
)]
pub struct ApiDoc;
