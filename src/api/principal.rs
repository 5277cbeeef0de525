
use std::collections::HashMap;

use axum::{extract::State, routing::get, Json, Router};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentPrincipal;
use crate::core::state::AppState;
use crate::db::types::ComplaintStatus;
use crate::repositories;
use crate::schemas::complaint::ComplaintResponse;
use crate::schemas::stats::{PrincipalDashboardResponse, StatusTotals};
use crate::schemas::user::UserResponse;

const RECENT_LIMIT: i64 = 5;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard)).route("/complaints", get(all_complaints))
}

async fn dashboard(
    CurrentPrincipal(_principal): CurrentPrincipal,
    State(state): State<AppState>,
) -> Result<Json<PrincipalDashboardResponse>, ApiError> {
    let db = state.db();

    let total = repositories::complaints::count_total(db)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count complaints"))?;
    let pending = repositories::complaints::count_by_status(db, ComplaintStatus::Pending)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count complaints"))?;
    let in_progress = repositories::complaints::count_by_status(db, ComplaintStatus::InProgress)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count complaints"))?;
    let resolved = repositories::complaints::count_by_status(db, ComplaintStatus::Resolved)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count complaints"))?;

    let students_by_department: HashMap<String, i64> =
        repositories::users::count_students_by_department(db)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to count students"))?
            .into_iter()
            .collect();

    let complaints_by_department: HashMap<String, i64> =
        repositories::complaints::counts_by_department(db)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to count complaints by department"))?
            .into_iter()
            .collect();

    let complaints_by_category: HashMap<String, i64> =
        repositories::complaints::counts_by_category(db)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to count complaints by category"))?
            .into_iter()
            .collect();

    let recent_complaints = repositories::complaints::recent(db, RECENT_LIMIT)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list recent complaints"))?;

    let recent_students = repositories::users::recent_students(db, RECENT_LIMIT)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list recent students"))?;

    Ok(Json(PrincipalDashboardResponse {
        totals: StatusTotals { total, pending, in_progress, resolved },
        students_by_department,
        complaints_by_department,
        complaints_by_category,
        recent_complaints: recent_complaints
            .into_iter()
            .map(ComplaintResponse::from_db)
            .collect(),
        recent_students: recent_students.into_iter().map(UserResponse::from_db).collect(),
    }))
}

async fn all_complaints(
    CurrentPrincipal(_principal): CurrentPrincipal,
    State(state): State<AppState>,
) -> Result<Json<Vec<ComplaintResponse>>, ApiError> {
    let complaints = repositories::complaints::list_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list complaints"))?;

    Ok(Json(complaints.into_iter().map(ComplaintResponse::from_db).collect()))
}
