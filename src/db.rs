use anyhow::Context;
use sqlx::{MySqlPool, mysql::MySqlPoolOptions};
use tracing::info;

use crate::config::Config;

// `ministries` holds a JSON array of names; JSON_TABLE needs MySQL 8.0.4+
const CREATE_ATTENDANCE: &str = r#"
    CREATE TABLE IF NOT EXISTS attendance (
        id CHAR(36) NOT NULL PRIMARY KEY,
        email VARCHAR(255) NOT NULL,
        full_name VARCHAR(255) NOT NULL,
        contact VARCHAR(255) NULL,
        is_member_of_ministry BOOLEAN NOT NULL DEFAULT FALSE,
        ministries JSON NOT NULL,
        recorded_at DATETIME(6) NOT NULL,
        INDEX idx_attendance_recorded_at (recorded_at)
    )
"#;

pub async fn init_db(config: &Config) -> anyhow::Result<MySqlPool> {
    let pool = MySqlPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    sqlx::query(CREATE_ATTENDANCE)
        .execute(&pool)
        .await
        .context("Failed to create attendance table")?;

    info!("Database ready");
    Ok(pool)
}
