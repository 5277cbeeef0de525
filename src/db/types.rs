use serde::{Deserialize, Serialize};
use sqlx::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "userrole", rename_all = "lowercase")]
pub(crate) enum UserRole {
    Student,
    Hod,
    Warden,
    Ao,
    Principal,
}

impl UserRole {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Hod => "hod",
            Self::Warden => "warden",
            Self::Ao => "ao",
            Self::Principal => "principal",
        }
    }

    /// The staff role this user acts as, if any.
    pub(crate) fn staff_role(self) -> Option<StaffRole> {
        match self {
            Self::Hod => Some(StaffRole::Hod),
            Self::Warden => Some(StaffRole::Warden),
            Self::Ao => Some(StaffRole::Ao),
            Self::Student | Self::Principal => None,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "staffrole", rename_all = "lowercase")]
pub(crate) enum StaffRole {
    Hod,
    Warden,
    Ao,
}

impl StaffRole {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Hod => "hod",
            Self::Warden => "warden",
            Self::Ao => "ao",
        }
    }

    pub(crate) fn as_user_role(self) -> UserRole {
        match self {
            Self::Hod => UserRole::Hod,
            Self::Warden => UserRole::Warden,
            Self::Ao => UserRole::Ao,
        }
    }
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "complaintstatus", rename_all = "snake_case")]
pub(crate) enum ComplaintStatus {
    Pending,
    InProgress,
    Resolved,
}

impl ComplaintStatus {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
        }
    }
}

impl std::fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
