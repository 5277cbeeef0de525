use serde::Serialize;

use crate::core::time::format_primitive;
use crate::db::models::{Complaint, ComplaintHistory};
use crate::db::types::{ComplaintStatus, StaffRole};

#[derive(Debug, Serialize)]
pub(crate) struct ComplaintResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) category: String,
    pub(crate) attachments: Vec<String>,
    pub(crate) before_files: Vec<String>,
    pub(crate) after_files: Vec<String>,
    pub(crate) response: Option<String>,
    pub(crate) response_by: Option<String>,
    pub(crate) status: ComplaintStatus,
    pub(crate) assigned_to: StaffRole,
    pub(crate) department: Option<String>,
    pub(crate) student_id: String,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
    pub(crate) resolved_at: Option<String>,
}

impl ComplaintResponse {
    pub(crate) fn from_db(complaint: Complaint) -> Self {
        Self {
            id: complaint.id,
            title: complaint.title,
            description: complaint.description,
            category: complaint.category,
            attachments: complaint.attachments.0,
            before_files: complaint.before_files.0,
            after_files: complaint.after_files.0,
            response: complaint.response,
            response_by: complaint.response_by,
            status: complaint.status,
            assigned_to: complaint.assigned_to,
            department: complaint.department,
            student_id: complaint.student_id,
            created_at: format_primitive(complaint.created_at),
            updated_at: format_primitive(complaint.updated_at),
            resolved_at: complaint.resolved_at.map(format_primitive),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct HistoryEntryResponse {
    pub(crate) id: String,
    pub(crate) action: String,
    pub(crate) message: Option<String>,
    pub(crate) performed_by: String,
    pub(crate) created_at: String,
}

impl HistoryEntryResponse {
    pub(crate) fn from_db(entry: ComplaintHistory) -> Self {
        Self {
            id: entry.id,
            action: entry.action,
            message: entry.message,
            performed_by: entry.performed_by,
            created_at: format_primitive(entry.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ComplaintDetailResponse {
    pub(crate) complaint: ComplaintResponse,
    pub(crate) history: Vec<HistoryEntryResponse>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ActionResponse {
    pub(crate) detail: String,
    pub(crate) complaint: ComplaintResponse,
}
