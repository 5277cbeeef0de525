use axum::http::{Method, StatusCode};
use tower::ServiceExt;

use crate::db::types::{ComplaintStatus, UserRole};
use crate::repositories;
use crate::test_support::{self, MultipartForm, TestContext};

async fn file_complaint(ctx: &TestContext, token: &str, title: &str, category: &str) -> String {
    let request = MultipartForm::new()
        .text("title", title)
        .text("description", "Filed from a test")
        .text("category", category)
        .request(Method::POST, "/api/v1/student/complaints", Some(token));

    let response = ctx.app.clone().oneshot(request).await.expect("submit complaint");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    body["id"].as_str().expect("complaint id").to_string()
}

async fn insert_cse_student(ctx: &TestContext) -> (crate::db::models::User, String) {
    let student = test_support::insert_student(
        ctx.state.db(),
        "Asha Rao",
        "asha@example.com",
        "23189-CS-020",
        "CSE",
        "student-pass",
        true,
    )
    .await;
    let token = test_support::bearer_token(&student.id, ctx.state.settings());
    (student, token)
}

#[tokio::test]
async fn warden_two_stage_flow() {
    let Some(ctx) = test_support::setup_test_context().await else { return };

    let (_student, student_token) = insert_cse_student(&ctx).await;
    let warden = test_support::insert_staff(
        ctx.state.db(),
        "Hostel Warden",
        "warden@example.com",
        UserRole::Warden,
        None,
        "warden-pass",
    )
    .await;
    let warden_token = test_support::bearer_token(&warden.id, ctx.state.settings());

    let complaint_id = file_complaint(&ctx, &student_token, "Leaking tap", "water_issues").await;

    // Stage 1: respond with text and one BEFORE photo.
    let request = MultipartForm::new()
        .text("response", "Fixed leak")
        .file("before_files", "before.png", b"before-bytes")
        .request(
            Method::POST,
            &format!("/api/v1/staff/complaints/{complaint_id}/respond"),
            Some(&warden_token),
        );
    let response = ctx.app.clone().oneshot(request).await.expect("respond");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["complaint"]["status"], "in_progress");
    assert_eq!(body["complaint"]["response"], "Fixed leak");
    assert_eq!(body["complaint"]["response_by"], "Hostel Warden");
    let before = body["complaint"]["before_files"].as_array().expect("before files");
    assert_eq!(before.len(), 1);
    assert!(before[0].as_str().expect("name").starts_with("BEFORE_"));

    let history = repositories::history::list_for_complaint(ctx.state.db(), &complaint_id)
        .await
        .expect("history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].action, "Responded by Warden (Before Work)");
    assert_eq!(history[0].message.as_deref(), Some("Fixed leak"));

    // Stage 2: resolve with one AFTER photo.
    let request = MultipartForm::new().file("final_files", "after.png", b"after-bytes").request(
        Method::POST,
        &format!("/api/v1/staff/complaints/{complaint_id}/resolve"),
        Some(&warden_token),
    );
    let response = ctx.app.clone().oneshot(request).await.expect("resolve");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["complaint"]["status"], "resolved");
    // Assignment never changes after creation.
    assert_eq!(body["complaint"]["assigned_to"], "warden");
    let after = body["complaint"]["after_files"].as_array().expect("after files");
    assert_eq!(after.len(), 1);
    assert!(after[0].as_str().expect("name").starts_with("AFTER_"));
    assert!(body["complaint"]["resolved_at"].is_string());

    let history = repositories::history::list_for_complaint(ctx.state.db(), &complaint_id)
        .await
        .expect("history");
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].action, "Resolved by Warden");
    assert_eq!(history[1].message.as_deref(), Some("AFTER work proof submitted"));
}

#[tokio::test]
async fn wrong_role_cannot_touch_a_foreign_complaint() {
    let Some(ctx) = test_support::setup_test_context().await else { return };

    let (_student, student_token) = insert_cse_student(&ctx).await;
    let hod = test_support::insert_staff(
        ctx.state.db(),
        "CSE HOD",
        "csehod@example.com",
        UserRole::Hod,
        Some("CSE"),
        "hod-pass",
    )
    .await;
    let hod_token = test_support::bearer_token(&hod.id, ctx.state.settings());

    let complaint_id = file_complaint(&ctx, &student_token, "Dry taps", "water_issues").await;

    let request = MultipartForm::new().text("response", "Not my complaint").request(
        Method::POST,
        &format!("/api/v1/staff/complaints/{complaint_id}/respond"),
        Some(&hod_token),
    );
    let response = ctx.app.clone().oneshot(request).await.expect("respond");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // No mutation, no history row.
    let complaint = repositories::complaints::find_by_id(ctx.state.db(), &complaint_id)
        .await
        .expect("load")
        .expect("complaint");
    assert_eq!(complaint.status, ComplaintStatus::Pending);
    assert!(complaint.response.is_none());
    let history = repositories::history::list_for_complaint(ctx.state.db(), &complaint_id)
        .await
        .expect("history");
    assert!(history.is_empty());
}

#[tokio::test]
async fn hod_actions_are_scoped_to_their_department() {
    let Some(ctx) = test_support::setup_test_context().await else { return };

    let (_student, student_token) = insert_cse_student(&ctx).await;
    let cse_hod = test_support::insert_staff(
        ctx.state.db(),
        "CSE HOD",
        "csehod@example.com",
        UserRole::Hod,
        Some("CSE"),
        "hod-pass",
    )
    .await;
    let ece_hod = test_support::insert_staff(
        ctx.state.db(),
        "ECE HOD",
        "ecehod@example.com",
        UserRole::Hod,
        Some("ECE"),
        "hod-pass",
    )
    .await;

    let complaint_id =
        file_complaint(&ctx, &student_token, "Syllabus behind schedule", "syllabus_not_covered")
            .await;

    let ece_token = test_support::bearer_token(&ece_hod.id, ctx.state.settings());
    let request = MultipartForm::new().text("response", "Looking into it").request(
        Method::POST,
        &format!("/api/v1/staff/complaints/{complaint_id}/respond"),
        Some(&ece_token),
    );
    let response = ctx.app.clone().oneshot(request).await.expect("respond");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The CSE dashboard lists it; the ECE dashboard does not.
    let cse_token = test_support::bearer_token(&cse_hod.id, ctx.state.settings());
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/staff/complaints",
            Some(&cse_token),
            None,
        ))
        .await
        .expect("cse dashboard");
    let body = test_support::read_json(response).await;
    assert_eq!(body.as_array().expect("list").len(), 1);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/staff/complaints",
            Some(&ece_token),
            None,
        ))
        .await
        .expect("ece dashboard");
    let body = test_support::read_json(response).await;
    assert_eq!(body.as_array().expect("list").len(), 0);
}

#[tokio::test]
async fn hod_response_with_after_files_resolves_immediately() {
    let Some(ctx) = test_support::setup_test_context().await else { return };

    let (_student, student_token) = insert_cse_student(&ctx).await;
    let hod = test_support::insert_staff(
        ctx.state.db(),
        "CSE HOD",
        "csehod@example.com",
        UserRole::Hod,
        Some("CSE"),
        "hod-pass",
    )
    .await;
    let hod_token = test_support::bearer_token(&hod.id, ctx.state.settings());

    let complaint_id = file_complaint(&ctx, &student_token, "Broken lab PCs", "lab_issue").await;

    let request = MultipartForm::new()
        .text("response", "Replaced the machines")
        .file("before_files", "before.png", b"before-bytes")
        .file("after_files", "after.png", b"after-bytes")
        .request(
            Method::POST,
            &format!("/api/v1/staff/complaints/{complaint_id}/respond"),
            Some(&hod_token),
        );
    let response = ctx.app.clone().oneshot(request).await.expect("respond");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["complaint"]["status"], "resolved");
    assert!(body["complaint"]["resolved_at"].is_string());

    let history = repositories::history::list_for_complaint(ctx.state.db(), &complaint_id)
        .await
        .expect("history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].action, "Responded by HOD");
}

#[tokio::test]
async fn ao_after_files_at_respond_do_not_resolve() {
    let Some(ctx) = test_support::setup_test_context().await else { return };

    let (_student, student_token) = insert_cse_student(&ctx).await;
    let ao = test_support::insert_staff(
        ctx.state.db(),
        "Accounts Officer",
        "ao@example.com",
        UserRole::Ao,
        None,
        "ao-pass",
    )
    .await;
    let ao_token = test_support::bearer_token(&ao.id, ctx.state.settings());

    let complaint_id =
        file_complaint(&ctx, &student_token, "Scholarship not credited", "scholarship_issue").await;

    let request = MultipartForm::new()
        .text("response", "Forwarded to the bank")
        .file("after_files", "receipt.png", b"receipt-bytes")
        .request(
            Method::POST,
            &format!("/api/v1/staff/complaints/{complaint_id}/respond"),
            Some(&ao_token),
        );
    let response = ctx.app.clone().oneshot(request).await.expect("respond");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["complaint"]["status"], "in_progress");
    assert_eq!(body["complaint"]["after_files"].as_array().expect("after files").len(), 1);

    let history = repositories::history::list_for_complaint(ctx.state.db(), &complaint_id)
        .await
        .expect("history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].action, "Responded by AO (Before Work)");
}

#[tokio::test]
async fn respond_requires_non_empty_text() {
    let Some(ctx) = test_support::setup_test_context().await else { return };

    let (_student, student_token) = insert_cse_student(&ctx).await;
    let warden = test_support::insert_staff(
        ctx.state.db(),
        "Hostel Warden",
        "warden@example.com",
        UserRole::Warden,
        None,
        "warden-pass",
    )
    .await;
    let warden_token = test_support::bearer_token(&warden.id, ctx.state.settings());

    let complaint_id = file_complaint(&ctx, &student_token, "Noisy block", "noisy_environment").await;

    let request = MultipartForm::new()
        .text("response", "   ")
        .file("before_files", "before.png", b"bytes")
        .request(
            Method::POST,
            &format!("/api/v1/staff/complaints/{complaint_id}/respond"),
            Some(&warden_token),
        );
    let response = ctx.app.clone().oneshot(request).await.expect("respond");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
    assert_eq!(body["detail"], "Response cannot be empty");

    let complaint = repositories::complaints::find_by_id(ctx.state.db(), &complaint_id)
        .await
        .expect("load")
        .expect("complaint");
    assert_eq!(complaint.status, ComplaintStatus::Pending);
    assert!(complaint.before_files.0.is_empty());
    let history = repositories::history::list_for_complaint(ctx.state.db(), &complaint_id)
        .await
        .expect("history");
    assert!(history.is_empty());
}

#[tokio::test]
async fn second_respond_conflicts_and_terminal_actions_are_noops() {
    let Some(ctx) = test_support::setup_test_context().await else { return };

    let (_student, student_token) = insert_cse_student(&ctx).await;
    let warden = test_support::insert_staff(
        ctx.state.db(),
        "Hostel Warden",
        "warden@example.com",
        UserRole::Warden,
        None,
        "warden-pass",
    )
    .await;
    let warden_token = test_support::bearer_token(&warden.id, ctx.state.settings());

    let complaint_id = file_complaint(&ctx, &student_token, "Power cuts", "electricity_issues").await;

    let request = MultipartForm::new().text("response", "Generator ordered").request(
        Method::POST,
        &format!("/api/v1/staff/complaints/{complaint_id}/respond"),
        Some(&warden_token),
    );
    let response = ctx.app.clone().oneshot(request).await.expect("respond");
    assert_eq!(response.status(), StatusCode::OK);

    // A second respond is redirected to the resolve stage.
    let request = MultipartForm::new().text("response", "Again").request(
        Method::POST,
        &format!("/api/v1/staff/complaints/{complaint_id}/respond"),
        Some(&warden_token),
    );
    let response = ctx.app.clone().oneshot(request).await.expect("second respond");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let request = MultipartForm::new().request(
        Method::POST,
        &format!("/api/v1/staff/complaints/{complaint_id}/resolve"),
        Some(&warden_token),
    );
    let response = ctx.app.clone().oneshot(request).await.expect("resolve");
    assert_eq!(response.status(), StatusCode::OK);

    let count_before = repositories::history::list_for_complaint(ctx.state.db(), &complaint_id)
        .await
        .expect("history")
        .len();

    // Both actions on a resolved complaint report the state and change nothing.
    for path in ["respond", "resolve"] {
        let request = MultipartForm::new().text("response", "Too late").request(
            Method::POST,
            &format!("/api/v1/staff/complaints/{complaint_id}/{path}"),
            Some(&warden_token),
        );
        let response = ctx.app.clone().oneshot(request).await.expect("terminal action");
        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::OK, "response: {body}");
        assert_eq!(body["detail"], "Complaint already resolved");
        assert_eq!(body["complaint"]["status"], "resolved");
    }

    let count_after = repositories::history::list_for_complaint(ctx.state.db(), &complaint_id)
        .await
        .expect("history")
        .len();
    assert_eq!(count_before, count_after);
}

#[tokio::test]
async fn resolve_works_directly_from_pending() {
    let Some(ctx) = test_support::setup_test_context().await else { return };

    let (_student, student_token) = insert_cse_student(&ctx).await;
    let warden = test_support::insert_staff(
        ctx.state.db(),
        "Hostel Warden",
        "warden@example.com",
        UserRole::Warden,
        None,
        "warden-pass",
    )
    .await;
    let warden_token = test_support::bearer_token(&warden.id, ctx.state.settings());

    let complaint_id = file_complaint(&ctx, &student_token, "Broken lock", "hostel_security").await;

    let request = MultipartForm::new().request(
        Method::POST,
        &format!("/api/v1/staff/complaints/{complaint_id}/resolve"),
        Some(&warden_token),
    );
    let response = ctx.app.oneshot(request).await.expect("resolve");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["complaint"]["status"], "resolved");
}

#[tokio::test]
async fn hod_approves_and_declines_department_students() {
    let Some(ctx) = test_support::setup_test_context().await else { return };

    let hod = test_support::insert_staff(
        ctx.state.db(),
        "CSE HOD",
        "csehod@example.com",
        UserRole::Hod,
        Some("CSE"),
        "hod-pass",
    )
    .await;
    let hod_token = test_support::bearer_token(&hod.id, ctx.state.settings());

    let pending = test_support::insert_student(
        ctx.state.db(),
        "Pending Student",
        "pending@example.com",
        "23189-CS-031",
        "CSE",
        "student-pass",
        false,
    )
    .await;
    let declined = test_support::insert_student(
        ctx.state.db(),
        "Declined Student",
        "declined@example.com",
        "23189-CS-032",
        "CSE",
        "student-pass",
        false,
    )
    .await;
    let foreign = test_support::insert_student(
        ctx.state.db(),
        "ECE Student",
        "ece@example.com",
        "23189-EC-033",
        "ECE",
        "student-pass",
        false,
    )
    .await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/staff/students",
            Some(&hod_token),
            None,
        ))
        .await
        .expect("list students");
    let body = test_support::read_json(response).await;
    assert_eq!(body["pending"].as_array().expect("pending").len(), 2);
    assert_eq!(body["approved"].as_array().expect("approved").len(), 0);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/staff/students/{}/approve", pending.id),
            Some(&hod_token),
            None,
        ))
        .await
        .expect("approve");
    assert_eq!(response.status(), StatusCode::OK);

    let approved = repositories::users::find_by_id(ctx.state.db(), &pending.id)
        .await
        .expect("load")
        .expect("student");
    assert!(approved.approved);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/staff/students/{}/decline", declined.id),
            Some(&hod_token),
            None,
        ))
        .await
        .expect("decline");
    assert_eq!(response.status(), StatusCode::OK);
    let gone = repositories::users::find_by_id(ctx.state.db(), &declined.id).await.expect("load");
    assert!(gone.is_none());

    // Students outside the HOD's department are off limits.
    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/staff/students/{}/approve", foreign.id),
            Some(&hod_token),
            None,
        ))
        .await
        .expect("approve foreign");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
