use crate::model::employee::{Employee, NewEmployee};
use crate::model::role::Role;
use sqlx::MySqlPool;

/// Kiosk identity lookup. The identifier on a badge is either the account
/// email or the numeric employee id.
pub async fn find_by_identifier(
    pool: &MySqlPool,
    identifier: &str,
) -> Result<Option<Employee>, sqlx::Error> {
    if let Some(found) = find_by_email(pool, identifier).await? {
        return Ok(Some(found));
    }
    match identifier.parse::<u64>() {
        Ok(id) => find_by_id(pool, id).await,
        Err(_) => Ok(None),
    }
}

pub async fn find_by_email(
    pool: &MySqlPool,
    email: &str,
) -> Result<Option<Employee>, sqlx::Error> {
    sqlx::query_as::<_, Employee>(
        r#"
        SELECT id, email, password, name, role_id, department, position,
               shift_type, profile_image, created_at, last_login_at
        FROM employees
        WHERE email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_id(pool: &MySqlPool, id: u64) -> Result<Option<Employee>, sqlx::Error> {
    sqlx::query_as::<_, Employee>(
        r#"
        SELECT id, email, password, name, role_id, department, position,
               shift_type, profile_image, created_at, last_login_at
        FROM employees
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Inserts a new account. `password_hash` is the already-hashed credential;
/// plaintext never reaches this layer.
pub async fn insert(
    pool: &MySqlPool,
    new: &NewEmployee,
    password_hash: &str,
) -> Result<u64, sqlx::Error> {
    let done = sqlx::query(
        r#"
        INSERT INTO employees (email, password, name, role_id, department, position, shift_type)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&new.email)
    .bind(password_hash)
    .bind(&new.name)
    .bind(new.role_id.unwrap_or(Role::Employee.id()))
    .bind(&new.department)
    .bind(&new.position)
    .bind(new.shift_type.unwrap_or_default())
    .execute(pool)
    .await?;
    Ok(done.last_insert_id())
}

pub async fn touch_last_login(pool: &MySqlPool, id: u64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE employees SET last_login_at = NOW() WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
