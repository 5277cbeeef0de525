use std::collections::HashMap;

use serde::Serialize;

use crate::schemas::complaint::ComplaintResponse;
use crate::schemas::user::UserResponse;

#[derive(Debug, Serialize)]
pub(crate) struct StatusTotals {
    pub(crate) total: i64,
    pub(crate) pending: i64,
    pub(crate) in_progress: i64,
    pub(crate) resolved: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct PrincipalDashboardResponse {
    pub(crate) totals: StatusTotals,
    pub(crate) students_by_department: HashMap<String, i64>,
    pub(crate) complaints_by_department: HashMap<String, i64>,
    pub(crate) complaints_by_category: HashMap<String, i64>,
    pub(crate) recent_complaints: Vec<ComplaintResponse>,
    pub(crate) recent_students: Vec<UserResponse>,
}
