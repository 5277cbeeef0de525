use crate::db::types::StaffRole;

/// Category → responsible staff role. Complaints with a category outside
/// this table fall back to the department head.
const CATEGORY_TABLE: &[(&str, StaffRole)] = &[
    // Warden
    ("hostel_problem", StaffRole::Warden),
    ("mess_food", StaffRole::Warden),
    ("electricity_issues", StaffRole::Warden),
    ("water_issues", StaffRole::Warden),
    ("hostel_cleanliness", StaffRole::Warden),
    ("hostel_security", StaffRole::Warden),
    ("room_maintenance", StaffRole::Warden),
    ("bathroom_plumbing", StaffRole::Warden),
    ("noisy_environment", StaffRole::Warden),
    // HOD
    ("academic_issue", StaffRole::Hod),
    ("faculty_misbehavior", StaffRole::Hod),
    ("lab_issue", StaffRole::Hod),
    ("department_infrastructure", StaffRole::Hod),
    ("syllabus_not_covered", StaffRole::Hod),
    ("teaching_quality_issue", StaffRole::Hod),
    // AO
    ("certificate_issue", StaffRole::Ao),
    ("scholarship_issue", StaffRole::Ao),
    ("fee_receipt_issue", StaffRole::Ao),
    ("bonafide_request_delay", StaffRole::Ao),
    ("hostel_bill_issue", StaffRole::Ao),
    ("mess_bill_issue", StaffRole::Ao),
    // Default
    ("other", StaffRole::Hod),
];

pub(crate) fn assignee_for(category: &str) -> StaffRole {
    CATEGORY_TABLE
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, role)| *role)
        .unwrap_or(StaffRole::Hod)
}

pub(crate) fn categories() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = CATEGORY_TABLE.iter().map(|(name, _)| *name).collect();
    names.sort_unstable();
    names
}
