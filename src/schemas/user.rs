use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::types::UserRole;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct RegisterRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub(crate) name: String,
    #[validate(email(message = "invalid email address"))]
    pub(crate) email: String,
    #[validate(length(min = 1, message = "pin must not be empty"))]
    pub(crate) pin: String,
    #[validate(length(min = 1, message = "department must not be empty"))]
    pub(crate) department: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters long"))]
    pub(crate) password: String,
}

impl RegisterRequest {
    /// Trimmed fields, lowercase email, uppercase PIN and department.
    pub(crate) fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            pin: self.pin.trim().to_uppercase(),
            department: self.department.trim().to_uppercase(),
            password: self.password.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum LoginKind {
    Student,
    Staff,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    pub(crate) user_type: LoginKind,
    pub(crate) loginid: String,
    pub(crate) password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ProfileUpdate {
    #[serde(default)]
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub(crate) name: Option<String>,
    #[serde(default)]
    #[validate(email(message = "invalid email address"))]
    pub(crate) email: Option<String>,
    #[serde(default)]
    #[validate(length(min = 8, message = "password must be at least 8 characters long"))]
    pub(crate) password: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserResponse {
    pub(crate) id: String,
    pub(crate) full_name: String,
    pub(crate) email: String,
    pub(crate) pin: Option<String>,
    pub(crate) department: Option<String>,
    pub(crate) role: UserRole,
    pub(crate) approved: bool,
    pub(crate) created_at: String,
}

impl UserResponse {
    pub(crate) fn from_db(user: crate::db::models::User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            pin: user.pin,
            department: user.department,
            role: user.role,
            approved: user.approved,
            created_at: format_primitive(user.created_at),
        }
    }
}
