use crate::model::shift::ShiftType;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Employee account row. Badge scans look these up by email or numeric id,
/// the auth layer by email only.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Employee {
    #[schema(example = 42)]
    pub id: u64,

    #[schema(example = "jane.doe@example.com")]
    pub email: String,

    /// Argon2 hash. Never serialized into responses.
    #[serde(skip_serializing)]
    #[schema(write_only)]
    pub password: String,

    #[schema(example = "Jane Doe")]
    pub name: String,

    /// 1 = admin, 2 = employee.
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

/// Subset of employee fields echoed back on scan endpoints, which are
/// reachable without a token.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EmployeeBrief {
    #[schema(example = 42)]
    pub id: u64,
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "Engineering", nullable = true)]
    pub department: Option<String>,
    #[schema(example = "Backend Developer", nullable = true)]
    pub position: Option<String>,
    pub shift_type: ShiftType,
    #[schema(nullable = true)]
    pub profile_image: Option<String>,
}

impl From<&Employee> for EmployeeBrief {
    fn from(emp: &Employee) -> Self {
        EmployeeBrief {
            id: emp.id,
            name: emp.name.clone(),
            department: emp.department.clone(),
            position: emp.position.clone(),
            shift_type: emp.shift_type,
            profile_image: emp.profile_image.clone(),
        }
    }
}

/// Payload for creating an employee account. Admin only.
#[derive(Debug, Deserialize, ToSchema)]
pub struct NewEmployee {
    #[schema(example = "jane.doe@example.com")]
    pub email: String,
    #[schema(example = "changeme123")]
    pub password: String,
    #[schema(example = "Jane Doe")]
    pub name: String,
    /// Defaults to the employee role when omitted.
    #[schema(example = 2)]
    pub role_id: Option<u8>,
    #[schema(example = "Engineering")]
    pub department: Option<String>,
    #[schema(example = "Backend Developer")]
    pub position: Option<String>,
    /// Defaults to the day shift when omitted.
    pub shift_type: Option<ShiftType>,
}
