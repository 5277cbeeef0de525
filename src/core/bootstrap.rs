use uuid::Uuid;

use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::UserRole;
use crate::repositories;

struct SeedAccount {
    full_name: &'static str,
    email: &'static str,
    department: Option<&'static str>,
    role: UserRole,
}

const SEED_ACCOUNTS: &[SeedAccount] = &[
    SeedAccount {
        full_name: "CSE HOD",
        email: "csehod@example.com",
        department: Some("CSE"),
        role: UserRole::Hod,
    },
    SeedAccount {
        full_name: "ECE HOD",
        email: "ecehod@example.com",
        department: Some("ECE"),
        role: UserRole::Hod,
    },
    SeedAccount {
        full_name: "Hostel Warden",
        email: "warden@example.com",
        department: None,
        role: UserRole::Warden,
    },
    SeedAccount {
        full_name: "Accounts Officer",
        email: "ao@example.com",
        department: None,
        role: UserRole::Ao,
    },
    SeedAccount {
        full_name: "Principal",
        email: "principal@example.com",
        department: None,
        role: UserRole::Principal,
    },
];

/// Ensure the out-of-band staff accounts exist. Existing accounts are left
/// untouched; only missing ones are created.
pub(crate) async fn ensure_seed_staff(state: &AppState) -> anyhow::Result<()> {
    let password = &state.settings().admin().seed_staff_password;
    if password.is_empty() {
        tracing::warn!("SEED_STAFF_PASSWORD not configured; skipping staff account seeding");
        return Ok(());
    }

    for account in SEED_ACCOUNTS {
        let existing = repositories::users::find_by_email(state.db(), account.email).await?;
        if existing.is_some() {
            continue;
        }

        let hashed_password = security::hash_password(password)?;
        let now = primitive_now_utc();

        repositories::users::create(
            state.db(),
            repositories::users::CreateUser {
                id: &Uuid::new_v4().to_string(),
                full_name: account.full_name,
                email: account.email,
                pin: None,
                hashed_password,
                department: account.department,
                role: account.role,
                approved: true,
                created_at: now,
                updated_at: now,
            },
        )
        .await?;

        tracing::info!(email = account.email, role = %account.role, "Created seed staff account");
    }

    Ok(())
}
