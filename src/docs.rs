use crate::api::activity_log::{ActivityLogQuery, ActivityLogListResponse};
use crate::api::attendance::{AttendanceFilter, AttendanceListResponse};
use crate::api::dashboard::{AdminStats, DashboardResponse, MonthlySummary};
use crate::api::employee::{EmployeeListItem, EmployeeListResponse, EmployeeQuery};
use crate::api::scan::{ScanResponse, ScanStatusQuery};
use crate::auth::handlers::LoginResponse;
use crate::engine::scan::ScanRequest;
use crate::model::activity_log::{ActivityLog, ActivityType};
use crate::model::attendance::AttendanceRecord;
use crate::model::employee::{Employee, EmployeeBrief, NewEmployee};
use crate::model::schedule::ScheduleConfig;
use crate::model::shift::{AttendanceStatus, ShiftType};
use crate::models::LoginReqDto;
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance System API",
        version = "1.0.0",
        description = r#"
## Employee Time & Attendance System

This API powers a badge-scan **time and attendance** system: a kiosk posts badge
scans and the server classifies each scan into the right punch slot for the
employee's shift.

### 🔹 Key Features
- **Badge Scanning**
  - One endpoint for every punch; the server works out AM/PM/night in and out
  - Day and night shifts, with night shifts crossing midnight
  - Late and half-day detection against the configured schedule
  - Per-badge cooldown so a double-read never records twice
- **Attendance History**
  - Paginated, filterable records; employees only ever see their own
- **Employee Directory**
  - Admin endpoints to list and create employee accounts
- **Audit Trail**
  - Every scan and login attempt is written to the activity log
- **Dashboard**
  - Personal month summary, plus organisation stats for admins

### 🔐 Security
The kiosk endpoints are public but rate limited; the badge itself is the
credential. Everything else requires **JWT Bearer authentication**, and
admin-only endpoints check the caller's role.

### 📦 Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints
- Business rejections (cooldown, already recorded) come back as HTTP 200 with
  `success: false` so the kiosk can show them without error handling

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::scan::scan,
        crate::api::scan::scan_status,

        crate::auth::handlers::login,
        crate::auth::handlers::refresh_token,
        crate::auth::handlers::logout,

        crate::api::attendance::attendance_list,
        crate::api::schedule::get_schedule,

        crate::api::employee::list_employees,
        crate::api::employee::create_employee,

        crate::api::activity_log::list_activity_logs,
        crate::api::dashboard::dashboard
    ),
    components(
        schemas(
            ScanRequest,
            ScanResponse,
            ScanStatusQuery,
            LoginReqDto,
            LoginResponse,
            AttendanceFilter,
            AttendanceListResponse,
            AttendanceRecord,
            AttendanceStatus,
            ShiftType,
            ScheduleConfig,
            Employee,
            EmployeeBrief,
            NewEmployee,
            EmployeeQuery,
            EmployeeListItem,
            EmployeeListResponse,
            ActivityLog,
            ActivityType,
            ActivityLogQuery,
            ActivityLogListResponse,
            MonthlySummary,
            AdminStats,
            DashboardResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Kiosk", description = "Badge scan endpoints used by the kiosk"),
        (name = "Auth", description = "Login, token refresh and logout"),
        (name = "Attendance", description = "Attendance history APIs"),
        (name = "Schedule", description = "Shift schedule APIs"),
        (name = "Employee", description = "Employee directory APIs"),
        (name = "ActivityLog", description = "Audit trail APIs"),
        (name = "Dashboard", description = "Summary and statistics APIs"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
