use crate::model::schedule::ScheduleConfig;
use sqlx::MySqlPool;

/// Loads the stored schedule row. `None` means the table is empty and the
/// caller falls back to `ScheduleConfig::default()`.
pub async fn fetch_active(pool: &MySqlPool) -> Result<Option<ScheduleConfig>, sqlx::Error> {
    sqlx::query_as::<_, ScheduleConfig>(
        r#"
        SELECT am_start, am_end, pm_start, pm_end, night_start, night_end,
               am_grace_minutes, pm_grace_minutes, night_grace_minutes,
               late_threshold_minutes
        FROM schedule_config
        ORDER BY id
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await
}
