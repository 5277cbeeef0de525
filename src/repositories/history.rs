use sqlx::PgPool;

use crate::db::models::ComplaintHistory;

const COLUMNS: &str = "id, complaint_id, action, message, performed_by, created_at";

pub(crate) struct AppendEntry<'a> {
    pub id: &'a str,
    pub complaint_id: &'a str,
    pub action: &'a str,
    pub message: Option<&'a str>,
    pub performed_by: &'a str,
    pub created_at: time::PrimitiveDateTime,
}

pub(crate) async fn append(pool: &PgPool, params: AppendEntry<'_>) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO complaint_history (id, complaint_id, action, message, performed_by, created_at)
         VALUES ($1,$2,$3,$4,$5,$6)",
    )
    .bind(params.id)
    .bind(params.complaint_id)
    .bind(params.action)
    .bind(params.message)
    .bind(params.performed_by)
    .bind(params.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn list_for_complaint(
    pool: &PgPool,
    complaint_id: &str,
) -> Result<Vec<ComplaintHistory>, sqlx::Error> {
    sqlx::query_as::<_, ComplaintHistory>(&format!(
        "SELECT {COLUMNS} FROM complaint_history
         WHERE complaint_id = $1
         ORDER BY created_at ASC"
    ))
    .bind(complaint_id)
    .fetch_all(pool)
    .await
}
