use crate::auth::auth::AuthUser;
use crate::model::schedule::ScheduleConfig;
use crate::store;
use actix_web::{web, HttpResponse, Responder};
use sqlx::MySqlPool;

/// Swagger doc for the schedule endpoint
#[utoipa::path(
    get,
    path = "/api/schedule",
    responses(
        (status = 200, description = "Effective shift schedule", body = ScheduleConfig),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Schedule"
)]
pub async fn get_schedule(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let schedule = store::schedule::fetch_active(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch schedule");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?
        .unwrap_or_default();

    Ok(HttpResponse::Ok().json(schedule))
}
