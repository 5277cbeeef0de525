use sqlx::types::Json;
use sqlx::PgPool;

use crate::db::models::Complaint;
use crate::db::types::{ComplaintStatus, StaffRole};

const COLUMNS: &str = "\
    id, title, description, category, attachments, before_files, after_files, \
    response, response_by, status, assigned_to, department, student_id, \
    created_at, updated_at, resolved_at";

pub(crate) struct CreateComplaint<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub category: &'a str,
    pub attachments: Vec<String>,
    pub assigned_to: StaffRole,
    pub department: Option<&'a str>,
    pub student_id: &'a str,
    pub created_at: time::PrimitiveDateTime,
    pub updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateComplaint<'_>,
) -> Result<Complaint, sqlx::Error> {
    sqlx::query_as::<_, Complaint>(&format!(
        "INSERT INTO complaints (
            id, title, description, category, attachments, status, assigned_to,
            department, student_id, created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,'pending',$6,$7,$8,$9,$10)
        RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.title)
    .bind(params.description)
    .bind(params.category)
    .bind(Json(params.attachments))
    .bind(params.assigned_to)
    .bind(params.department)
    .bind(params.student_id)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Complaint>, sqlx::Error> {
    sqlx::query_as::<_, Complaint>(&format!("SELECT {COLUMNS} FROM complaints WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list_for_student(
    pool: &PgPool,
    student_id: &str,
) -> Result<Vec<Complaint>, sqlx::Error> {
    sqlx::query_as::<_, Complaint>(&format!(
        "SELECT {COLUMNS} FROM complaints
         WHERE student_id = $1
         ORDER BY created_at DESC"
    ))
    .bind(student_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_assigned(
    pool: &PgPool,
    role: StaffRole,
) -> Result<Vec<Complaint>, sqlx::Error> {
    sqlx::query_as::<_, Complaint>(&format!(
        "SELECT {COLUMNS} FROM complaints
         WHERE assigned_to = $1
         ORDER BY created_at DESC"
    ))
    .bind(role)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_assigned_in_department(
    pool: &PgPool,
    role: StaffRole,
    department: Option<&str>,
) -> Result<Vec<Complaint>, sqlx::Error> {
    sqlx::query_as::<_, Complaint>(&format!(
        "SELECT {COLUMNS} FROM complaints
         WHERE assigned_to = $1 AND department IS NOT DISTINCT FROM $2
         ORDER BY created_at DESC"
    ))
    .bind(role)
    .bind(department)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_all(pool: &PgPool) -> Result<Vec<Complaint>, sqlx::Error> {
    sqlx::query_as::<_, Complaint>(&format!(
        "SELECT {COLUMNS} FROM complaints ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await
}

pub(crate) async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<Complaint>, sqlx::Error> {
    sqlx::query_as::<_, Complaint>(&format!(
        "SELECT {COLUMNS} FROM complaints ORDER BY created_at DESC LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub(crate) async fn count_total(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM complaints").fetch_one(pool).await
}

pub(crate) async fn count_by_status(
    pool: &PgPool,
    status: ComplaintStatus,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM complaints WHERE status = $1")
        .bind(status)
        .fetch_one(pool)
        .await
}

pub(crate) async fn counts_by_department(
    pool: &PgPool,
) -> Result<Vec<(String, i64)>, sqlx::Error> {
    sqlx::query_as::<_, (String, i64)>(
        "SELECT department, COUNT(*) FROM complaints
         WHERE department IS NOT NULL
         GROUP BY department",
    )
    .fetch_all(pool)
    .await
}

pub(crate) async fn counts_by_category(pool: &PgPool) -> Result<Vec<(String, i64)>, sqlx::Error> {
    sqlx::query_as::<_, (String, i64)>(
        "SELECT category, COUNT(*) FROM complaints GROUP BY category",
    )
    .fetch_all(pool)
    .await
}

pub(crate) struct RecordResponse<'a> {
    pub status: ComplaintStatus,
    pub response: &'a str,
    pub response_by: &'a str,
    pub before_files: Vec<String>,
    pub after_files: Vec<String>,
    pub updated_at: time::PrimitiveDateTime,
    pub resolved_at: Option<time::PrimitiveDateTime>,
}

/// Stage-1 update. File lists are appended server-side so concurrent
/// writers never drop each other's entries.
pub(crate) async fn record_response(
    pool: &PgPool,
    id: &str,
    params: RecordResponse<'_>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE complaints SET
            status = $1,
            response = $2,
            response_by = $3,
            before_files = before_files || $4,
            after_files = after_files || $5,
            updated_at = $6,
            resolved_at = COALESCE($7, resolved_at)
         WHERE id = $8",
    )
    .bind(params.status)
    .bind(params.response)
    .bind(params.response_by)
    .bind(Json(params.before_files))
    .bind(Json(params.after_files))
    .bind(params.updated_at)
    .bind(params.resolved_at)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn mark_resolved(
    pool: &PgPool,
    id: &str,
    after_files: Vec<String>,
    updated_at: time::PrimitiveDateTime,
    resolved_at: time::PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE complaints SET
            status = 'resolved',
            after_files = after_files || $1,
            updated_at = $2,
            resolved_at = COALESCE(resolved_at, $3)
         WHERE id = $4",
    )
    .bind(Json(after_files))
    .bind(updated_at)
    .bind(resolved_at)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}
