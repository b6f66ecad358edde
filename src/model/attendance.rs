use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::AppError;

/// Longest accepted text field or ministry name, in characters; matches the
/// `VARCHAR(255)` columns and the `JSON_TABLE` projection of ministries.
pub const MAX_FIELD_LEN: usize = 255;

fn within_limit(s: &str) -> bool {
    s.chars().count() <= MAX_FIELD_LEN
}

/// A single check-in. Never mutated once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": "6f1c2d9e-3b7a-4c51-9a0e-2f8d7c6b5a41",
    "email": "jane@example.com",
    "fullName": "Jane Doe",
    "contact": "+15550100",
    "isMemberOfMinistry": true,
    "ministries": ["Choir", "Ushering"],
    "timestamp": "2026-03-01T09:30:00Z"
}))]
pub struct AttendanceRecord {
    pub id: String,
    pub email: String,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    pub is_member_of_ministry: bool,
    /// Non-empty exactly when `is_member_of_ministry` is set.
    pub ministries: Vec<String>,
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: DateTime<Utc>,
}

/// Ministries as clients send them: one name or a list of names.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MinistryInput {
    One(String),
    Many(Vec<String>),
}

impl MinistryInput {
    /// Trimmed, non-blank names in the order given.
    pub fn into_names(self) -> Vec<String> {
        let names = match self {
            MinistryInput::One(name) => vec![name],
            MinistryInput::Many(names) => names,
        };

        names
            .into_iter()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect()
    }
}

/// Create payload. Every field is optional here so that validation can
/// report all missing fields at once.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAttendance {
    #[schema(example = "jane@example.com", value_type = String)]
    pub email: Option<String>,
    #[schema(example = "Jane Doe", value_type = String)]
    pub full_name: Option<String>,
    #[schema(example = "+15550100", value_type = Option<String>)]
    pub contact: Option<String>,
    #[schema(example = true, value_type = bool)]
    pub is_member_of_ministry: Option<bool>,
    #[schema(example = json!(["Choir"]), value_type = Option<Vec<String>>)]
    pub ministries: Option<MinistryInput>,
    /// Legacy single-ministry field, folded into `ministries`.
    #[schema(example = "Choir", value_type = Option<String>)]
    pub ministry: Option<MinistryInput>,
    /// Back-fills the check-in time; defaults to now.
    #[schema(example = "2026-03-01T09:30:00Z", value_type = Option<String>, format = DateTime)]
    pub timestamp: Option<String>,
}

impl CreateAttendance {
    /// Validates the payload and builds the record to store.
    pub fn into_record(self, now: DateTime<Utc>) -> Result<AttendanceRecord, AppError> {
        let mut invalid = Vec::new();

        let email = self
            .email
            .map(|e| e.trim().to_lowercase())
            .filter(|e| looks_like_email(e) && within_limit(e));
        if email.is_none() {
            invalid.push("email");
        }

        let full_name = self
            .full_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty() && within_limit(n));
        if full_name.is_none() {
            invalid.push("fullName");
        }

        let contact = self
            .contact
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        if contact.as_deref().is_some_and(|c| !within_limit(c)) {
            invalid.push("contact");
        }

        if self.is_member_of_ministry.is_none() {
            invalid.push("isMemberOfMinistry");
        }
        let is_member = self.is_member_of_ministry.unwrap_or(false);

        let mut ministries = self.ministries.map(MinistryInput::into_names).unwrap_or_default();
        if ministries.is_empty() {
            ministries = self.ministry.map(MinistryInput::into_names).unwrap_or_default();
        }
        if !is_member {
            ministries.clear();
        } else if ministries.is_empty() || !ministries.iter().all(|m| within_limit(m)) {
            invalid.push("ministries");
        }

        let timestamp = match self.timestamp.as_deref().map(str::trim) {
            None | Some("") => Some(now),
            Some(raw) => DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|t| t.with_timezone(&Utc)),
        };
        if timestamp.is_none() {
            invalid.push("timestamp");
        }

        match (email, full_name, timestamp) {
            (Some(email), Some(full_name), Some(timestamp)) if invalid.is_empty() => {
                Ok(AttendanceRecord {
                    id: Uuid::new_v4().to_string(),
                    email,
                    full_name,
                    contact,
                    is_member_of_ministry: is_member,
                    ministries,
                    // the store keeps microseconds
                    timestamp: timestamp.trunc_subsecs(6),
                })
            }
            _ => Err(AppError::validation(
                "Missing or invalid fields",
                invalid.into_iter().map(String::from).collect(),
            )),
        }
    }
}

fn looks_like_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    match s.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

/// Raw query string of the list endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AttendanceQuery {
    /// RFC 3339 instant or `YYYY-MM-DD` (start of day, inclusive)
    #[param(example = "2026-03-01")]
    pub start_date: Option<String>,
    /// RFC 3339 instant or `YYYY-MM-DD` (end of day, inclusive)
    #[param(example = "2026-03-31")]
    pub end_date: Option<String>,
    /// Only records whose ministries include this name
    #[param(example = "Choir")]
    pub ministry: Option<String>,
}

/// Parsed list filter; every bound is inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub ministry: Option<String>,
}

impl AttendanceQuery {
    pub fn into_filter(self) -> Result<RecordFilter, AppError> {
        let mut invalid = Vec::new();

        let start = match non_blank(self.start_date) {
            None => None,
            Some(raw) => {
                let parsed = parse_bound(&raw, false);
                if parsed.is_none() {
                    invalid.push("startDate".to_string());
                }
                parsed
            }
        };
        let end = match non_blank(self.end_date) {
            None => None,
            Some(raw) => {
                let parsed = parse_bound(&raw, true);
                if parsed.is_none() {
                    invalid.push("endDate".to_string());
                }
                parsed
            }
        };

        if !invalid.is_empty() {
            return Err(AppError::validation("Invalid date filter", invalid));
        }
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(AppError::validation(
                    "startDate must not be after endDate",
                    vec!["startDate".into(), "endDate".into()],
                ));
            }
        }

        Ok(RecordFilter {
            start,
            end,
            ministry: non_blank(self.ministry),
        })
    }
}

impl RecordFilter {
    /// In-process equivalent of the store's WHERE clause.
    #[cfg(test)]
    pub fn matches(&self, record: &AttendanceRecord) -> bool {
        self.start.is_none_or(|s| record.timestamp >= s)
            && self.end.is_none_or(|e| record.timestamp <= e)
            && self
                .ministry
                .as_ref()
                .is_none_or(|m| record.ministries.iter().any(|r| r == m))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// A plain date widens to the whole UTC day on the requested side.
fn parse_bound(raw: &str, end_of_day: bool) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let naive = if end_of_day {
        date.and_hms_micro_opt(23, 59, 59, 999_999)?
    } else {
        date.and_hms_opt(0, 0, 0)?
    };
    Some(naive.and_utc())
}

/// One row of the per-ministry breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct MinistryCount {
    #[schema(example = "Choir")]
    pub ministry: String,
    #[schema(example = 12)]
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStats {
    #[schema(example = 40)]
    pub total: i64,
    #[schema(example = 25)]
    pub with_ministry: i64,
    #[schema(example = 15)]
    pub without_ministry: i64,
    pub ministry_breakdown: Vec<MinistryCount>,
}

impl AttendanceStats {
    /// Busiest ministry first; equal counts fall back to name order.
    pub fn sort_breakdown(breakdown: &mut [MinistryCount]) {
        breakdown.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.ministry.cmp(&b.ministry)));
    }

    /// Aggregates in process by fanning out each record's ministries.
    #[cfg(test)]
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a AttendanceRecord>) -> Self {
        let mut total = 0;
        let mut with_ministry = 0;
        let mut counts: std::collections::BTreeMap<&str, i64> = Default::default();

        for record in records {
            total += 1;
            if record.is_member_of_ministry {
                with_ministry += 1;
            }
            for ministry in &record.ministries {
                *counts.entry(ministry.as_str()).or_default() += 1;
            }
        }

        let mut ministry_breakdown: Vec<MinistryCount> = counts
            .into_iter()
            .map(|(ministry, count)| MinistryCount {
                ministry: ministry.to_string(),
                count,
            })
            .collect();
        Self::sort_breakdown(&mut ministry_breakdown);

        Self {
            total,
            with_ministry,
            without_ministry: total - with_ministry,
            ministry_breakdown,
        }
    }
}
