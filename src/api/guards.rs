use async_trait::async_trait;
use axum::extract::{FromRequestParts, State};
use axum::http::{header, request::Parts};

use crate::api::errors::ApiError;
use crate::core::{security, state::AppState};
use crate::db::models::{Complaint, User};
use crate::db::types::{StaffRole, UserRole};
use crate::repositories;

pub(crate) struct CurrentUser(pub(crate) User);
pub(crate) struct CurrentStudent(pub(crate) User);
pub(crate) struct CurrentHod(pub(crate) User);
pub(crate) struct CurrentPrincipal(pub(crate) User);

/// A staff actor together with the staff role they act as.
pub(crate) struct CurrentStaff {
    pub(crate) user: User,
    pub(crate) role: StaffRole,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let State(app_state) = State::<AppState>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to access application state"))?;

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized("Invalid authentication credentials"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized("Invalid authentication credentials"))?;

        let claims = security::verify_token(token, app_state.settings())
            .map_err(|_| ApiError::Unauthorized("Invalid authentication credentials"))?;

        let user = repositories::users::find_by_id(app_state.db(), &claims.sub)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load user"))?;

        let Some(user) = user else {
            return Err(ApiError::Unauthorized("User not found"));
        };

        // A student stays locked out until the HOD approves the account,
        // even with a previously issued token.
        if user.role == UserRole::Student && !user.approved {
            return Err(ApiError::Unauthorized("Account is not approved yet"));
        }

        Ok(CurrentUser(user))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentStudent {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;

        if user.role == UserRole::Student {
            Ok(CurrentStudent(user))
        } else {
            Err(ApiError::Forbidden("Student access required"))
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentStaff {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;

        match user.role.staff_role() {
            Some(role) => Ok(CurrentStaff { user, role }),
            None => Err(ApiError::Forbidden("Staff access required")),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentHod {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;

        if user.role == UserRole::Hod {
            Ok(CurrentHod(user))
        } else {
            Err(ApiError::Forbidden("HOD access required"))
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentPrincipal {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;

        if user.role == UserRole::Principal {
            Ok(CurrentPrincipal(user))
        } else {
            Err(ApiError::Forbidden("Principal access required"))
        }
    }
}

/// A staff member may act on a complaint only when it is assigned to their
/// role; HODs are additionally scoped to their own department.
pub(crate) fn require_assignment(staff: &CurrentStaff, complaint: &Complaint) -> Result<(), ApiError> {
    if complaint.assigned_to != staff.role {
        return Err(ApiError::Forbidden("Complaint is assigned to a different role"));
    }

    if staff.role == StaffRole::Hod && complaint.department != staff.user.department {
        return Err(ApiError::Forbidden("Complaint belongs to a different department"));
    }

    Ok(())
}
