use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::db::types::{ComplaintStatus, StaffRole, UserRole};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct User {
    pub(crate) id: String,
    pub(crate) full_name: String,
    pub(crate) email: String,
    pub(crate) pin: Option<String>,
    pub(crate) hashed_password: String,
    pub(crate) department: Option<String>,
    pub(crate) role: UserRole,
    pub(crate) approved: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Complaint {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) category: String,
    pub(crate) attachments: Json<Vec<String>>,
    pub(crate) before_files: Json<Vec<String>>,
    pub(crate) after_files: Json<Vec<String>>,
    pub(crate) response: Option<String>,
    pub(crate) response_by: Option<String>,
    pub(crate) status: ComplaintStatus,
    pub(crate) assigned_to: StaffRole,
    pub(crate) department: Option<String>,
    pub(crate) student_id: String,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
    pub(crate) resolved_at: Option<PrimitiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct ComplaintHistory {
    pub(crate) id: String,
    pub(crate) complaint_id: String,
    pub(crate) action: String,
    pub(crate) message: Option<String>,
    pub(crate) performed_by: String,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Notification {
    pub(crate) id: String,
    pub(crate) user_id: String,
    pub(crate) message: String,
    pub(crate) is_read: bool,
    pub(crate) created_at: PrimitiveDateTime,
}
