
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentStudent;
use crate::api::multipart::FormData;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::UserRole;
use crate::repositories;
use crate::schemas::complaint::ComplaintResponse;
use crate::schemas::user::{ProfileUpdate, UserResponse};
use crate::services::routing;
use crate::services::storage::FileStage;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(categories))
        .route("/complaints", post(submit_complaint).get(my_complaints))
        .route("/complaints/:complaint_id", get(complaint_detail))
        .route("/profile", patch(profile))
}

async fn categories() -> Json<Vec<&'static str>> {
    Json(routing::categories())
}

async fn submit_complaint(
    CurrentStudent(student): CurrentStudent,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ComplaintResponse>), ApiError> {
    let mut form = FormData::collect(multipart).await?;

    let title = form.text("title").trim().to_string();
    let description = form.text("description").trim().to_string();
    let category = form.text("category").trim().to_string();

    if title.is_empty() || description.is_empty() || category.is_empty() {
        return Err(ApiError::BadRequest("Please fill all fields".to_string()));
    }

    let mut attachments = Vec::new();
    for item in form.take_files("attachments") {
        let stored = state
            .storage()
            .save(FileStage::Attachment, &item.filename, item.bytes)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to store attachment"))?;
        attachments.push(stored.name);
    }

    let assigned_to = routing::assignee_for(&category);
    let now = primitive_now_utc();

    let complaint = repositories::complaints::create(
        state.db(),
        repositories::complaints::CreateComplaint {
            id: &Uuid::new_v4().to_string(),
            title: &title,
            description: &description,
            category: &category,
            attachments,
            assigned_to,
            department: student.department.as_deref(),
            student_id: &student.id,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create complaint"))?;

    notify_assignee(&state, assigned_to.as_user_role(), student.department.as_deref(), &title)
        .await;

    tracing::info!(
        complaint_id = %complaint.id,
        category = %complaint.category,
        assigned_to = %complaint.assigned_to,
        "Complaint submitted"
    );

    Ok((StatusCode::CREATED, Json(ComplaintResponse::from_db(complaint))))
}

/// Best effort: a missing staff account or a failed insert never blocks the
/// submission.
async fn notify_assignee(state: &AppState, role: UserRole, department: Option<&str>, title: &str) {
    let staff = match repositories::users::find_assignee(state.db(), role, department).await {
        Ok(staff) => staff,
        Err(err) => {
            tracing::warn!(error = %err, "Failed to look up staff for notification");
            return;
        }
    };

    let Some(staff) = staff else {
        return;
    };

    let result = repositories::notifications::create(
        state.db(),
        repositories::notifications::CreateNotification {
            id: &Uuid::new_v4().to_string(),
            user_id: &staff.id,
            message: &format!("New complaint submitted: {title}"),
            created_at: primitive_now_utc(),
        },
    )
    .await;

    if let Err(err) = result {
        tracing::warn!(error = %err, "Failed to create notification");
    }
}

async fn my_complaints(
    CurrentStudent(student): CurrentStudent,
    State(state): State<AppState>,
) -> Result<Json<Vec<ComplaintResponse>>, ApiError> {
    let complaints = repositories::complaints::list_for_student(state.db(), &student.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list complaints"))?;

    Ok(Json(complaints.into_iter().map(ComplaintResponse::from_db).collect()))
}

async fn complaint_detail(
    Path(complaint_id): Path<String>,
    CurrentStudent(student): CurrentStudent,
    State(state): State<AppState>,
) -> Result<Json<ComplaintResponse>, ApiError> {
    let complaint = repositories::complaints::find_by_id(state.db(), &complaint_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load complaint"))?
        .ok_or_else(|| ApiError::NotFound("Complaint not found".to_string()))?;

    if complaint.student_id != student.id {
        return Err(ApiError::Forbidden("You are not allowed to view this complaint"));
    }

    Ok(Json(ComplaintResponse::from_db(complaint)))
}

async fn profile(
    CurrentStudent(student): CurrentStudent,
    State(state): State<AppState>,
    Json(payload): Json<ProfileUpdate>,
) -> Result<Json<UserResponse>, ApiError> {
    crate::api::auth::apply_profile_update(&state, student, payload).await
}
