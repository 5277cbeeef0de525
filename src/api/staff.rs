#[cfg(test)]
mod tests;

use axum::{
    extract::{Multipart, Path, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::{require_assignment, CurrentHod, CurrentStaff};
use crate::api::multipart::{FormData, UploadItem};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::Complaint;
use crate::db::types::{ComplaintStatus, StaffRole, UserRole};
use crate::repositories;
use crate::schemas::complaint::{
    ActionResponse, ComplaintDetailResponse, ComplaintResponse, HistoryEntryResponse,
};
use crate::schemas::user::UserResponse;
use crate::schemas::MessageResponse;
use crate::services::lifecycle::{self, TransitionError};
use crate::services::storage::FileStage;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/complaints", get(dashboard))
        .route("/complaints/:complaint_id", get(complaint_detail))
        .route("/complaints/:complaint_id/respond", post(respond))
        .route("/complaints/:complaint_id/resolve", post(resolve))
        .route("/students", get(list_students))
        .route("/students/:student_id/approve", post(approve_student))
        .route("/students/:student_id/decline", post(decline_student))
}

async fn dashboard(
    staff: CurrentStaff,
    State(state): State<AppState>,
) -> Result<Json<Vec<ComplaintResponse>>, ApiError> {
    let complaints = match staff.role {
        StaffRole::Hod => repositories::complaints::list_assigned_in_department(
            state.db(),
            staff.role,
            staff.user.department.as_deref(),
        )
        .await,
        StaffRole::Warden | StaffRole::Ao => {
            repositories::complaints::list_assigned(state.db(), staff.role).await
        }
    }
    .map_err(|e| ApiError::internal(e, "Failed to list complaints"))?;

    Ok(Json(complaints.into_iter().map(ComplaintResponse::from_db).collect()))
}

async fn complaint_detail(
    Path(complaint_id): Path<String>,
    staff: CurrentStaff,
    State(state): State<AppState>,
) -> Result<Json<ComplaintDetailResponse>, ApiError> {
    let complaint = fetch_complaint(&state, &complaint_id).await?;
    require_assignment(&staff, &complaint)?;

    let history = repositories::history::list_for_complaint(state.db(), &complaint.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load complaint history"))?;

    Ok(Json(ComplaintDetailResponse {
        complaint: ComplaintResponse::from_db(complaint),
        history: history.into_iter().map(HistoryEntryResponse::from_db).collect(),
    }))
}

/// Stage 1. Records the response text, stores BEFORE evidence (and AFTER
/// evidence for the roles whose form carries it), then advances the status.
async fn respond(
    Path(complaint_id): Path<String>,
    staff: CurrentStaff,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ActionResponse>, ApiError> {
    let complaint = fetch_complaint(&state, &complaint_id).await?;
    require_assignment(&staff, &complaint)?;

    let policy = lifecycle::policy_for(staff.role);

    if let Err(err) = lifecycle::respond_outcome(policy, complaint.status, false) {
        return match err {
            TransitionError::AlreadyResolved => already_resolved(complaint),
            TransitionError::AlreadyResponded => Err(ApiError::Conflict(err.to_string())),
        };
    }

    let mut form = FormData::collect(multipart).await?;

    let response_text = form.text("response").trim().to_string();
    if response_text.is_empty() {
        return Err(ApiError::BadRequest("Response cannot be empty".to_string()));
    }

    let before_uploads = form.take_files("before_files");
    let after_uploads =
        if policy.respond_reads_after { form.take_files("after_files") } else { Vec::new() };

    let new_status = lifecycle::respond_outcome(policy, complaint.status, !after_uploads.is_empty())
        .map_err(|err| ApiError::Conflict(err.to_string()))?;

    let before_files = store_uploads(&state, FileStage::Before, before_uploads).await?;
    let after_files = store_uploads(&state, FileStage::After, after_uploads).await?;

    let now = primitive_now_utc();
    let resolved_at = (new_status == ComplaintStatus::Resolved).then_some(now);

    repositories::complaints::record_response(
        state.db(),
        &complaint.id,
        repositories::complaints::RecordResponse {
            status: new_status,
            response: &response_text,
            response_by: &staff.user.full_name,
            before_files,
            after_files,
            updated_at: now,
            resolved_at,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update complaint"))?;

    append_history(&state, &complaint.id, policy.respond_action, Some(&response_text), &staff)
        .await?;

    tracing::info!(
        complaint_id = %complaint.id,
        role = %staff.role,
        status = %new_status,
        "Complaint response recorded"
    );

    action_response(&state, &complaint.id, "Response submitted").await
}

/// Stage 2. AFTER evidence is optional; no new response text is required.
async fn resolve(
    Path(complaint_id): Path<String>,
    staff: CurrentStaff,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ActionResponse>, ApiError> {
    let complaint = fetch_complaint(&state, &complaint_id).await?;
    require_assignment(&staff, &complaint)?;

    let policy = lifecycle::policy_for(staff.role);

    if lifecycle::resolve_outcome(complaint.status).is_err() {
        return already_resolved(complaint);
    }

    let mut form = FormData::collect(multipart).await?;
    let after_files = store_uploads(&state, FileStage::After, form.take_files("final_files")).await?;

    let now = primitive_now_utc();

    repositories::complaints::mark_resolved(state.db(), &complaint.id, after_files, now, now)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update complaint"))?;

    append_history(&state, &complaint.id, policy.resolve_action, Some(policy.resolve_note), &staff)
        .await?;

    tracing::info!(complaint_id = %complaint.id, role = %staff.role, "Complaint resolved");

    action_response(&state, &complaint.id, "Complaint marked as resolved").await
}

async fn list_students(
    CurrentHod(hod): CurrentHod,
    State(state): State<AppState>,
) -> Result<Json<StudentListResponse>, ApiError> {
    let pending =
        repositories::users::list_students(state.db(), hod.department.as_deref(), false)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to list students"))?;
    let approved =
        repositories::users::list_students(state.db(), hod.department.as_deref(), true)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to list students"))?;

    Ok(Json(StudentListResponse {
        pending: pending.into_iter().map(UserResponse::from_db).collect(),
        approved: approved.into_iter().map(UserResponse::from_db).collect(),
    }))
}

#[derive(Debug, serde::Serialize)]
pub(crate) struct StudentListResponse {
    pub(crate) pending: Vec<UserResponse>,
    pub(crate) approved: Vec<UserResponse>,
}

async fn approve_student(
    Path(student_id): Path<String>,
    CurrentHod(hod): CurrentHod,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let student = fetch_department_student(&state, &hod, &student_id).await?;

    repositories::users::set_approved(state.db(), &student.id, true, primitive_now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to approve student"))?;

    Ok(Json(MessageResponse { detail: format!("{} approved", student.full_name) }))
}

async fn decline_student(
    Path(student_id): Path<String>,
    CurrentHod(hod): CurrentHod,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let student = fetch_department_student(&state, &hod, &student_id).await?;

    // Cascades to the student's complaints and notifications.
    repositories::users::delete(state.db(), &student.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to remove student"))?;

    Ok(Json(MessageResponse { detail: "Student declined and removed".to_string() }))
}

async fn fetch_complaint(state: &AppState, complaint_id: &str) -> Result<Complaint, ApiError> {
    repositories::complaints::find_by_id(state.db(), complaint_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load complaint"))?
        .ok_or_else(|| ApiError::NotFound("Complaint not found".to_string()))
}

async fn fetch_department_student(
    state: &AppState,
    hod: &crate::db::models::User,
    student_id: &str,
) -> Result<crate::db::models::User, ApiError> {
    let student = repositories::users::find_by_id(state.db(), student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load student"))?
        .ok_or_else(|| ApiError::NotFound("Student not found".to_string()))?;

    if student.role != UserRole::Student {
        return Err(ApiError::NotFound("Student not found".to_string()));
    }

    if student.department != hod.department {
        return Err(ApiError::Forbidden("Student belongs to a different department"));
    }

    Ok(student)
}

async fn store_uploads(
    state: &AppState,
    stage: FileStage,
    uploads: Vec<UploadItem>,
) -> Result<Vec<String>, ApiError> {
    let mut names = Vec::with_capacity(uploads.len());
    for item in uploads {
        let stored = state
            .storage()
            .save(stage, &item.filename, item.bytes)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to store evidence file"))?;
        names.push(stored.name);
    }
    Ok(names)
}

async fn append_history(
    state: &AppState,
    complaint_id: &str,
    action: &str,
    message: Option<&str>,
    staff: &CurrentStaff,
) -> Result<(), ApiError> {
    repositories::history::append(
        state.db(),
        repositories::history::AppendEntry {
            id: &Uuid::new_v4().to_string(),
            complaint_id,
            action,
            message,
            performed_by: &staff.user.full_name,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to record complaint history"))
}

/// Terminal-state no-op: report the complaint as-is without mutating
/// anything or appending history.
fn already_resolved(complaint: Complaint) -> Result<Json<ActionResponse>, ApiError> {
    Ok(Json(ActionResponse {
        detail: "Complaint already resolved".to_string(),
        complaint: ComplaintResponse::from_db(complaint),
    }))
}

async fn action_response(
    state: &AppState,
    complaint_id: &str,
    detail: &str,
) -> Result<Json<ActionResponse>, ApiError> {
    let complaint = fetch_complaint(state, complaint_id).await?;
    Ok(Json(ActionResponse {
        detail: detail.to_string(),
        complaint: ComplaintResponse::from_db(complaint),
    }))
}
