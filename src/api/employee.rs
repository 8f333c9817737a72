use crate::auth::auth::AuthUser;
use crate::auth::password::hash_password;
use crate::config::Config;
use crate::model::activity_log::{actions, ActivityType, NewActivity};
use crate::model::employee::NewEmployee;
use crate::model::role::Role;
use crate::model::shift::ShiftType;
use crate::store;
use crate::utils::{badge_filter, directory_cache};
use actix_web::error::ErrorInternalServerError;
use actix_web::{web, HttpResponse, Responder};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use std::sync::Arc;
use tracing::{debug, error};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct EmployeeQuery {
    /// Filter by department
    #[schema(example = "Engineering")]
    pub department: Option<String>,
    pub shift_type: Option<ShiftType>,
    /// Search by name or email
    #[schema(example = "jane")]
    pub search: Option<String>,
    #[schema(example = 1)]
    pub page: Option<u64>,
    #[schema(example = 20)]
    pub per_page: Option<u64>,
}

/// Directory row. Credentials never leave the database through this surface.
#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct EmployeeListItem {
    #[schema(example = 42)]
    pub id: u64,
    #[schema(example = "jane.doe@example.com")]
    pub email: String,
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = 2)]
    pub role_id: u8,
    #[schema(example = "Engineering", nullable = true)]
    pub department: Option<String>,
    #[schema(example = "Backend Developer", nullable = true)]
    pub position: Option<String>,
    pub shift_type: ShiftType,
    #[schema(nullable = true)]
    pub profile_image: Option<String>,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: NaiveDateTime,
    #[schema(value_type = Option<String>, format = "date-time", nullable = true)]
    pub last_login_at: Option<NaiveDateTime>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    pub data: Vec<EmployeeListItem>,
    #[schema(example = 1)]
    pub page: u64,
    #[schema(example = 20)]
    pub per_page: u64,
    #[schema(example = 1)]
    pub total: i64,
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    Str(&'a str),
}

// -------------------- Handlers --------------------

/// Swagger doc for the employee directory endpoint
#[utoipa::path(
    get,
    path = "/api/employees",
    params(EmployeeQuery),
    responses(
        (status = 200, description = "Paginated employee directory", body = EmployeeListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<EmployeeQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * per_page;

    // ---------- build WHERE clause dynamically ----------
    let shift_s = query.shift_type.map(|s| s.to_string());
    let search_like = query.search.as_deref().map(|s| format!("%{}%", s));

    let mut conditions = Vec::new();
    let mut bindings: Vec<FilterValue> = Vec::new();

    if let Some(department) = query.department.as_deref() {
        conditions.push("department = ?");
        bindings.push(FilterValue::Str(department));
    }

    if let Some(shift) = shift_s.as_deref() {
        conditions.push("shift_type = ?");
        bindings.push(FilterValue::Str(shift));
    }

    if let Some(like) = search_like.as_deref() {
        conditions.push("(name LIKE ? OR email LIKE ?)");
        bindings.push(FilterValue::Str(like));
        bindings.push(FilterValue::Str(like));
    }

    let where_clause = if conditions.is_empty() {
        "".to_string()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    // ---------- total count ----------
    let count_sql = format!("SELECT COUNT(*) as total FROM employees {}", where_clause);
    debug!(sql = %count_sql, "Counting employees");

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for b in &bindings {
        count_query = match b {
            FilterValue::Str(s) => count_query.bind(*s),
        };
    }

    let total = count_query.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %count_sql, "Failed to count employees");
        ErrorInternalServerError("Internal Server Error")
    })?;

    // ---------- data query ----------
    let data_sql = format!(
        "SELECT id, email, name, role_id, department, position, shift_type, profile_image, \
         created_at, last_login_at FROM employees {} ORDER BY id DESC LIMIT ? OFFSET ?",
        where_clause
    );
    debug!(sql = %data_sql, page, per_page, offset, "Fetching employees");

    let mut data_query = sqlx::query_as::<_, EmployeeListItem>(&data_sql);
    for b in &bindings {
        data_query = match b {
            FilterValue::Str(s) => data_query.bind(*s),
        };
    }
    data_query = data_query.bind(per_page as i64).bind(offset as i64);

    let employees = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %data_sql, "Failed to fetch employees");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(EmployeeListResponse {
        data: employees,
        page,
        per_page,
        total,
    }))
}

/// Swagger doc for the employee creation endpoint
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body(
        content = NewEmployee,
        description = "New employee payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Employee created", body = Object, example = json!({
            "id": 42,
            "message": "Employee created"
        })),
        (status = 400, description = "Missing or invalid fields"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Email already registered", body = Object, example = json!({
            "message": "Email already registered"
        })),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<NewEmployee>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let mut new = payload.into_inner();
    new.email = new.email.trim().to_string();
    new.name = new.name.trim().to_string();

    if new.email.is_empty() || new.password.is_empty() || new.name.is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "email, password and name are required"
        })));
    }

    if let Some(role_id) = new.role_id {
        if Role::from_id(role_id).is_none() {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": "Invalid role"
            })));
        }
    }

    let hashed = hash_password(&new.password);

    let id = match store::employee::insert(pool.get_ref(), &new, &hashed).await {
        Ok(id) => id,
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::Conflict().json(json!({
                        "message": "Email already registered"
                    })));
                }
            }

            error!(error = %e, "Failed to create employee");
            return Err(ErrorInternalServerError("Internal Server Error"));
        }
    };

    // Make the new badge resolvable without waiting for a cache miss.
    match store::employee::find_by_id(pool.get_ref(), id).await {
        Ok(Some(created)) => {
            let created = Arc::new(created);
            directory_cache::remember(&created).await;
            badge_filter::insert_identifiers(&created);
        }
        _ => {
            badge_filter::insert(&new.email);
            badge_filter::insert(&id.to_string());
        }
    }

    store::activity_log::emit(
        pool.get_ref(),
        config.audit_timeout_ms,
        NewActivity {
            user_id: Some(auth.user_id),
            user_name: auth.email.clone(),
            action: actions::EMPLOYEE_CREATE.to_string(),
            description: format!("Employee account created for {} ({})", new.name, new.email),
            log_type: ActivityType::Success,
            metadata: Some(json!({
                "employee_id": id,
                "role_id": new.role_id.unwrap_or(Role::Employee.id()),
                "department": new.department,
            })),
            scan_photo: None,
        },
    );

    Ok(HttpResponse::Created().json(json!({
        "id": id,
        "message": "Employee created"
    })))
}
