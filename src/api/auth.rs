
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::validation::{validate_department, validate_pin};
use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::User;
use crate::db::types::UserRole;
use crate::repositories;
use crate::schemas::auth::TokenResponse;
use crate::schemas::user::{LoginKind, LoginRequest, ProfileUpdate, RegisterRequest, UserResponse};

/// Max attempts per window for auth endpoints (register/login).
const AUTH_RATE_LIMIT: u64 = 10;
/// Rate limit window in seconds.
const AUTH_RATE_WINDOW_SECONDS: u64 = 60;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/profile", patch(profile))
}

async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let payload = payload.normalized();
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let rate_key = format!("rl:register:{}", payload.email);
    let allowed = state
        .redis()
        .rate_limit(&rate_key, AUTH_RATE_LIMIT, AUTH_RATE_WINDOW_SECONDS)
        .await
        .unwrap_or(true);
    if !allowed {
        return Err(ApiError::TooManyRequests("Too many registration attempts, try again later"));
    }

    validate_department(&payload.department)?;
    validate_pin(&payload.pin, &payload.department)?;

    let existing =
        repositories::users::exists_by_email_or_pin(state.db(), &payload.email, &payload.pin)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to check existing user"))?;

    if existing.is_some() {
        return Err(ApiError::Conflict("Email or PIN already registered".to_string()));
    }

    let hashed_password = security::hash_password(&payload.password)
        .map_err(|e| ApiError::internal(e, "Failed to hash password"))?;

    let now = primitive_now_utc();

    // Students start unapproved and wait for their HOD.
    let user = repositories::users::create(
        state.db(),
        repositories::users::CreateUser {
            id: &Uuid::new_v4().to_string(),
            full_name: &payload.name,
            email: &payload.email,
            pin: Some(&payload.pin),
            hashed_password,
            department: Some(&payload.department),
            role: UserRole::Student,
            approved: false,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create user"))?;

    Ok((StatusCode::CREATED, Json(UserResponse::from_db(user))))
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let password = payload.password.trim();
    let loginid = match payload.user_type {
        LoginKind::Student => payload.loginid.trim().to_uppercase(),
        LoginKind::Staff => payload.loginid.trim().to_lowercase(),
    };

    if loginid.is_empty() || password.is_empty() {
        return Err(ApiError::BadRequest("Enter login details".to_string()));
    }

    let rate_key = format!("rl:login:{loginid}");
    let allowed = state
        .redis()
        .rate_limit(&rate_key, AUTH_RATE_LIMIT, AUTH_RATE_WINDOW_SECONDS)
        .await
        .unwrap_or(true);
    if !allowed {
        return Err(ApiError::TooManyRequests("Too many login attempts, try again later"));
    }

    let user = match payload.user_type {
        LoginKind::Student => {
            let user = repositories::users::find_student_by_pin(state.db(), &loginid)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to load user"))?
                .ok_or(ApiError::Unauthorized("Invalid PIN"))?;

            if !user.approved {
                return Err(ApiError::Forbidden("Account is not approved yet"));
            }

            user
        }
        LoginKind::Staff => repositories::users::find_by_email(state.db(), &loginid)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load user"))?
            .ok_or(ApiError::Unauthorized("Invalid staff email"))?,
    };

    let verified = security::credential_matches(password, &user.hashed_password, state.settings())
        .map_err(|_| ApiError::Unauthorized("Incorrect password"))?;

    if !verified {
        return Err(ApiError::Unauthorized("Incorrect password"));
    }

    let token = security::create_access_token(&user.id, state.settings(), None)
        .map_err(|e| ApiError::internal(e, "Failed to create access token"))?;

    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
        user: UserResponse::from_db(user),
    }))
}

async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from_db(user))
}

async fn profile(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<ProfileUpdate>,
) -> Result<Json<UserResponse>, ApiError> {
    // Students update their profile through the student routes; the
    // principal account is managed out of band.
    if matches!(user.role, UserRole::Student | UserRole::Principal) {
        return Err(ApiError::Forbidden("Access denied"));
    }

    apply_profile_update(&state, user, payload).await
}

pub(crate) async fn apply_profile_update(
    state: &AppState,
    user: User,
    payload: ProfileUpdate,
) -> Result<Json<UserResponse>, ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let email = payload.email.map(|value| value.trim().to_lowercase());
    if let Some(email) = email.as_deref() {
        let taken = repositories::users::find_by_email(state.db(), email)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to check existing email"))?
            .is_some_and(|other| other.id != user.id);
        if taken {
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }
    }

    let hashed_password = match payload.password.as_deref() {
        Some(password) => Some(
            security::hash_password(password)
                .map_err(|e| ApiError::internal(e, "Failed to hash password"))?,
        ),
        None => None,
    };

    repositories::users::update_profile(
        state.db(),
        &user.id,
        repositories::users::UpdateProfile {
            full_name: payload.name.map(|value| value.trim().to_string()),
            email,
            hashed_password,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update profile"))?;

    let updated = repositories::users::find_by_id(state.db(), &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load user"))?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from_db(updated)))
}
