use crate::model::activity_log::NewActivity;
use sqlx::MySqlPool;
use std::time::Duration;
use tracing::warn;

/// Appends one audit row.
pub async fn insert(pool: &MySqlPool, activity: &NewActivity) -> Result<u64, sqlx::Error> {
    let done = sqlx::query(
        r#"
        INSERT INTO activity_logs (user_id, user_name, action, description, `type`, metadata, scan_photo)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(activity.user_id)
    .bind(&activity.user_name)
    .bind(&activity.action)
    .bind(&activity.description)
    .bind(activity.log_type)
    .bind(activity.metadata.as_ref().map(|m| m.to_string()))
    .bind(&activity.scan_photo)
    .execute(pool)
    .await?;
    Ok(done.last_insert_id())
}

/// Fire-and-forget append. The write runs in a spawned task under its own
/// deadline, and any failure is logged and dropped: the audit trail must
/// never block or fail the operation it describes.
pub fn emit(pool: &MySqlPool, timeout_ms: u64, activity: NewActivity) {
    let pool = pool.clone();
    actix_web::rt::spawn(async move {
        let write = insert(&pool, &activity);
        match actix_web::rt::time::timeout(Duration::from_millis(timeout_ms), write).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => warn!(error = %e, action = %activity.action, "audit write failed"),
            Err(_) => warn!(action = %activity.action, "audit write timed out"),
        }
    });
}
