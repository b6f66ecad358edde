use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, MySqlPool, types::Json};
use tracing::debug;

use super::{AttendanceStore, StoreError};
use crate::model::attendance::{AttendanceRecord, AttendanceStats, MinistryCount, RecordFilter};

const SELECT_RECORD: &str = r#"
    SELECT id, email, full_name, contact, is_member_of_ministry, ministries, recorded_at
    FROM attendance
"#;

/// Attendance collection backed by a MySQL table with a JSON `ministries` column.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct AttendanceRow {
    id: String,
    email: String,
    full_name: String,
    contact: Option<String>,
    is_member_of_ministry: bool,
    ministries: Json<Vec<String>>,
    recorded_at: DateTime<Utc>,
}

impl From<AttendanceRow> for AttendanceRecord {
    fn from(row: AttendanceRow) -> Self {
        AttendanceRecord {
            id: row.id,
            email: row.email,
            full_name: row.full_name,
            contact: row.contact,
            is_member_of_ministry: row.is_member_of_ministry,
            ministries: row.ministries.0,
            timestamp: row.recorded_at,
        }
    }
}

#[derive(FromRow)]
struct Totals {
    total: i64,
    with_ministry: i64,
}

// Helper enum for typed SQLx binding
#[derive(Debug, PartialEq)]
enum FilterValue<'a> {
    Instant(DateTime<Utc>),
    Str(&'a str),
}

/// WHERE clause for a list filter and its bind values, in placeholder order.
fn filter_clause(filter: &RecordFilter) -> (String, Vec<FilterValue<'_>>) {
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(start) = filter.start {
        where_sql.push_str(" AND recorded_at >= ?");
        args.push(FilterValue::Instant(start));
    }

    if let Some(end) = filter.end {
        where_sql.push_str(" AND recorded_at <= ?");
        args.push(FilterValue::Instant(end));
    }

    if let Some(ministry) = filter.ministry.as_deref() {
        where_sql.push_str(" AND JSON_CONTAINS(ministries, JSON_QUOTE(?))");
        args.push(FilterValue::Str(ministry));
    }

    (where_sql, args)
}

#[async_trait]
impl AttendanceStore for MySqlStore {
    async fn insert(&self, record: &AttendanceRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO attendance
                (id, email, full_name, contact, is_member_of_ministry, ministries, recorded_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.email)
        .bind(&record.full_name)
        .bind(&record.contact)
        .bind(record.is_member_of_ministry)
        .bind(Json(&record.ministries))
        .bind(record.timestamp)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list(&self, filter: &RecordFilter) -> Result<Vec<AttendanceRecord>, StoreError> {
        let (where_sql, args) = filter_clause(filter);
        let sql = format!("{SELECT_RECORD}{where_sql} ORDER BY recorded_at DESC");
        debug!(sql = %sql, "Listing attendance");

        let mut query = sqlx::query_as::<_, AttendanceRow>(&sql);
        for arg in args {
            query = match arg {
                FilterValue::Instant(t) => query.bind(t),
                FilterValue::Str(s) => query.bind(s),
            };
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(AttendanceRecord::from).collect())
    }

    async fn get(&self, id: &str) -> Result<Option<AttendanceRecord>, StoreError> {
        let sql = format!("{SELECT_RECORD} WHERE id = ?");
        let row = sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(AttendanceRecord::from))
    }

    async fn delete(&self, id: &str) -> Result<Option<AttendanceRecord>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!("{SELECT_RECORD} WHERE id = ? FOR UPDATE");
        let row = sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query("DELETE FROM attendance WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(Some(row.into()))
    }

    async fn stats(&self) -> Result<AttendanceStats, StoreError> {
        let totals = sqlx::query_as::<_, Totals>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(CASE WHEN is_member_of_ministry THEN 1 END) AS with_ministry
            FROM attendance
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        // one row per (record, ministry) pair, then grouped
        let mut ministry_breakdown = sqlx::query_as::<_, MinistryCount>(
            r#"
            SELECT jt.ministry AS ministry, COUNT(*) AS count
            FROM attendance a,
                 JSON_TABLE(a.ministries, '$[*]' COLUMNS (ministry VARCHAR(255) PATH '$')) AS jt
            GROUP BY jt.ministry
            ORDER BY count DESC, ministry ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        // collation order in SQL may differ from byte order
        AttendanceStats::sort_breakdown(&mut ministry_breakdown);

        Ok(AttendanceStats {
            total: totals.total,
            with_ministry: totals.with_ministry,
            without_ministry: totals.total - totals.with_ministry,
            ministry_breakdown,
        })
    }
}
