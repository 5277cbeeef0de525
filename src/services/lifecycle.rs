use thiserror::Error;

use crate::db::types::{ComplaintStatus, StaffRole};

/// Per-role stage rules. The three staff workflows share one shape and
/// differ only in these flags and their audit labels.
pub(crate) struct StagePolicy {
    /// Stage 1 reads AFTER files in addition to BEFORE files.
    pub(crate) respond_reads_after: bool,
    /// AFTER files supplied at stage 1 complete the complaint immediately,
    /// skipping In Progress. HOD-only.
    pub(crate) resolve_on_respond_after: bool,
    pub(crate) respond_action: &'static str,
    pub(crate) resolve_action: &'static str,
    pub(crate) resolve_note: &'static str,
}

const HOD_POLICY: StagePolicy = StagePolicy {
    respond_reads_after: true,
    resolve_on_respond_after: true,
    respond_action: "Responded by HOD",
    resolve_action: "Marked Resolved by HOD",
    resolve_note: "Final AFTER photos submitted",
};

const WARDEN_POLICY: StagePolicy = StagePolicy {
    respond_reads_after: false,
    resolve_on_respond_after: false,
    respond_action: "Responded by Warden (Before Work)",
    resolve_action: "Resolved by Warden",
    resolve_note: "AFTER work proof submitted",
};

const AO_POLICY: StagePolicy = StagePolicy {
    respond_reads_after: true,
    resolve_on_respond_after: false,
    respond_action: "Responded by AO (Before Work)",
    resolve_action: "Resolved by AO",
    resolve_note: "Final AFTER files submitted",
};

pub(crate) fn policy_for(role: StaffRole) -> &'static StagePolicy {
    match role {
        StaffRole::Hod => &HOD_POLICY,
        StaffRole::Warden => &WARDEN_POLICY,
        StaffRole::Ao => &AO_POLICY,
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum TransitionError {
    #[error("complaint is already resolved")]
    AlreadyResolved,
    #[error("complaint already has a response; submit the resolution instead")]
    AlreadyResponded,
}

/// Status after a stage-1 response. Status never moves backward and a
/// resolved complaint never leaves Resolved.
pub(crate) fn respond_outcome(
    policy: &StagePolicy,
    status: ComplaintStatus,
    has_after_files: bool,
) -> Result<ComplaintStatus, TransitionError> {
    match status {
        ComplaintStatus::Resolved => Err(TransitionError::AlreadyResolved),
        ComplaintStatus::InProgress => Err(TransitionError::AlreadyResponded),
        ComplaintStatus::Pending => {
            if policy.resolve_on_respond_after && has_after_files {
                Ok(ComplaintStatus::Resolved)
            } else {
                Ok(ComplaintStatus::InProgress)
            }
        }
    }
}

/// Status after a stage-2 resolution. Allowed from Pending or In Progress.
pub(crate) fn resolve_outcome(status: ComplaintStatus) -> Result<ComplaintStatus, TransitionError> {
    match status {
        ComplaintStatus::Resolved => Err(TransitionError::AlreadyResolved),
        ComplaintStatus::Pending | ComplaintStatus::InProgress => Ok(ComplaintStatus::Resolved),
    }
}
