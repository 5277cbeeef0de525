use sqlx::PgPool;

use crate::db::models::User;
use crate::db::types::UserRole;

const COLUMNS: &str = "\
    id, full_name, email, pin, hashed_password, department, role, approved, \
    created_at, updated_at";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE email = $1"))
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_student_by_pin(
    pool: &PgPool,
    pin: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {COLUMNS} FROM users WHERE pin = $1 AND role = 'student'"
    ))
    .bind(pin)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn exists_by_email_or_pin(
    pool: &PgPool,
    email: &str,
    pin: &str,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT id FROM users WHERE email = $1 OR pin = $2")
        .bind(email)
        .bind(pin)
        .fetch_optional(pool)
        .await
}

pub(crate) struct CreateUser<'a> {
    pub id: &'a str,
    pub full_name: &'a str,
    pub email: &'a str,
    pub pin: Option<&'a str>,
    pub hashed_password: String,
    pub department: Option<&'a str>,
    pub role: UserRole,
    pub approved: bool,
    pub created_at: time::PrimitiveDateTime,
    pub updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateUser<'_>) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (
            id, full_name, email, pin, hashed_password, department, role, approved,
            created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10)
        RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.full_name)
    .bind(params.email)
    .bind(params.pin)
    .bind(params.hashed_password)
    .bind(params.department)
    .bind(params.role)
    .bind(params.approved)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) struct UpdateProfile {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub hashed_password: Option<String>,
    pub updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn update_profile(
    pool: &PgPool,
    id: &str,
    params: UpdateProfile,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE users SET
            full_name = COALESCE($1, full_name),
            email = COALESCE($2, email),
            hashed_password = COALESCE($3, hashed_password),
            updated_at = $4
         WHERE id = $5",
    )
    .bind(params.full_name)
    .bind(params.email)
    .bind(params.hashed_password)
    .bind(params.updated_at)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn set_approved(
    pool: &PgPool,
    id: &str,
    approved: bool,
    updated_at: time::PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET approved = $1, updated_at = $2 WHERE id = $3")
        .bind(approved)
        .bind(updated_at)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub(crate) async fn delete(pool: &PgPool, id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM users WHERE id = $1").bind(id).execute(pool).await?;
    Ok(())
}

pub(crate) async fn list_students(
    pool: &PgPool,
    department: Option<&str>,
    approved: bool,
) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {COLUMNS} FROM users
         WHERE role = 'student' AND department IS NOT DISTINCT FROM $1 AND approved = $2
         ORDER BY created_at DESC"
    ))
    .bind(department)
    .bind(approved)
    .fetch_all(pool)
    .await
}

/// The staff user who should be notified about a new complaint. HODs are
/// matched by department; wardens and accounts officers by role alone.
pub(crate) async fn find_assignee(
    pool: &PgPool,
    role: UserRole,
    department: Option<&str>,
) -> Result<Option<User>, sqlx::Error> {
    if role == UserRole::Hod {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {COLUMNS} FROM users
             WHERE role = $1 AND department IS NOT DISTINCT FROM $2
             LIMIT 1"
        ))
        .bind(role)
        .bind(department)
        .fetch_optional(pool)
        .await
    } else {
        sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE role = $1 LIMIT 1"))
            .bind(role)
            .fetch_optional(pool)
            .await
    }
}

pub(crate) async fn count_students_by_department(
    pool: &PgPool,
) -> Result<Vec<(String, i64)>, sqlx::Error> {
    sqlx::query_as::<_, (String, i64)>(
        "SELECT department, COUNT(*) FROM users
         WHERE role = 'student' AND department IS NOT NULL
         GROUP BY department",
    )
    .fetch_all(pool)
    .await
}

pub(crate) async fn recent_students(pool: &PgPool, limit: i64) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {COLUMNS} FROM users
         WHERE role = 'student'
         ORDER BY created_at DESC
         LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await
}
