use sqlx::PgPool;

pub(crate) struct CreateNotification<'a> {
    pub id: &'a str,
    pub user_id: &'a str,
    pub message: &'a str,
    pub created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateNotification<'_>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO notifications (id, user_id, message, is_read, created_at)
         VALUES ($1,$2,$3,FALSE,$4)",
    )
    .bind(params.id)
    .bind(params.user_id)
    .bind(params.message)
    .bind(params.created_at)
    .execute(pool)
    .await?;
    Ok(())
}
