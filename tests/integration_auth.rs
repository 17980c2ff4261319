mod common;

use axum::http::StatusCode;
use campusdesk_auth::Role;
use campusdesk_models::UserId;
use common::{PASSWORD, TestApp, create_student, create_test_user};
use serde_json::json;
use sqlx::SqlitePool;

#[sqlx::test(migrations = "./migrations")]
async fn test_login_success(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let user = create_test_user(app.db(), Role::Student).await;

    let (status, body) = app
        .post(
            "/api/v1/auth/login",
            None,
            json!({ "phone": user.phone.as_ref(), "password": PASSWORD }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["access"].is_string());
    assert!(body["refresh"].is_string());
    assert_eq!(body["user"]["phone"], user.phone.as_ref());
    assert_eq!(body["user"]["role"], "student");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_wrong_password(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let user = create_test_user(app.db(), Role::Member).await;

    let (status, body) = app
        .post(
            "/api/v1/auth/login",
            None,
            json!({ "phone": user.phone.as_ref(), "password": "nope-nope" }),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "no_active_account");
    assert_eq!(body["status"], false);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_unknown_phone_matches_wrong_password(pool: SqlitePool) {
    let app = TestApp::new(pool);

    let (status, body) = app
        .post(
            "/api/v1/auth/login",
            None,
            json!({ "phone": "+998901234567", "password": PASSWORD }),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["detail"],
        "No active account found with the given credentials"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_inactive_user(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let user = create_test_user(app.db(), Role::Member).await;
    sqlx::query("UPDATE users SET is_active = 0 WHERE id = ?")
        .bind(user.id)
        .execute(app.db())
        .await
        .unwrap();

    let (status, _) = app
        .post(
            "/api/v1/auth/login",
            None,
            json!({ "phone": user.phone.as_ref(), "password": PASSWORD }),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_missing_password(pool: SqlitePool) {
    let app = TestApp::new(pool);

    let (status, body) = app
        .post("/api/v1/auth/login", None, json!({ "phone": "+998901234567" }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "password is required");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_token_pair_endpoint_omits_user(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let user = create_test_user(app.db(), Role::Member).await;

    let (status, body) = app
        .post(
            "/api/v1/token/",
            None,
            json!({ "phone": user.phone.as_ref(), "password": PASSWORD }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["access"].is_string());
    assert!(body.get("user").is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_me_requires_token(pool: SqlitePool) {
    let app = TestApp::new(pool);

    let (status, body) = app.get("/api/v1/auth/me", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authentication credentials were not provided.");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_me_reports_profiles(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let (user, token) = app.user_with_token(Role::Student).await;
    let student = create_student(app.db(), user.id, None).await;

    let (status, body) = app.get("/api/v1/auth/me", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], user.id.get());
    assert_eq!(body["student_id"], student.get());
    assert!(body["teacher_id"].is_null());
    assert!(body["worker_id"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_issues_working_access_token(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let user = create_test_user(app.db(), Role::Member).await;
    let (_, refresh) = app.login(user.phone.as_ref(), PASSWORD).await;

    let (status, body) = app
        .post("/api/v1/token/refresh", None, json!({ "refresh": refresh }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let access = body["access"].as_str().unwrap();
    let (status, _) = app.get("/api/v1/auth/me", Some(access)).await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_rejects_access_token(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let user = create_test_user(app.db(), Role::Member).await;
    let (access, _) = app.login(user.phone.as_ref(), PASSWORD).await;

    let (status, body) = app
        .post("/api/v1/token/refresh", None, json!({ "refresh": access }))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "token_not_valid");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_verify_accepts_both_kinds(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let user = create_test_user(app.db(), Role::Member).await;
    let (access, refresh) = app.login(user.phone.as_ref(), PASSWORD).await;

    for token in [access, refresh] {
        let (status, body) = app
            .post("/api/v1/token/verify", None, json!({ "token": token }))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({}));
    }

    let (status, _) = app
        .post("/api/v1/token/verify", None, json!({ "token": "not.a.jwt" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_blacklist_revokes_refresh_and_its_access_tokens(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let user = create_test_user(app.db(), Role::Member).await;
    let (access, refresh) = app.login(user.phone.as_ref(), PASSWORD).await;

    let (status, _) = app
        .post("/api/v1/token/blacklist", None, json!({ "refresh": refresh }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .post("/api/v1/token/refresh", None, json!({ "refresh": refresh }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.get("/api/v1/auth/me", Some(&access)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Token is blacklisted");

    let (status, _) = app
        .post("/api/v1/token/verify", None, json!({ "token": refresh }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .post("/api/v1/token/blacklist", None, json!({ "refresh": refresh }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_logout_then_logout_again(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let user = create_test_user(app.db(), Role::Member).await;
    let (access, refresh) = app.login(user.phone.as_ref(), PASSWORD).await;

    let (status, body) = app
        .post("/api/v1/auth/logout", Some(&access), json!({ "refresh": refresh }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": true, "detail": "Logged out successfully" }));

    // The first session's access token died with its refresh token.
    let (other_access, _) = app.login(user.phone.as_ref(), PASSWORD).await;
    let (status, body) = app
        .post(
            "/api/v1/auth/logout",
            Some(&other_access),
            json!({ "refresh": refresh }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], false);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_logout_requires_authentication(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let user = create_test_user(app.db(), Role::Member).await;
    let (_, refresh) = app.login(user.phone.as_ref(), PASSWORD).await;

    let (status, body) = app
        .post("/api/v1/auth/logout", None, json!({ "refresh": refresh }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authentication credentials were not provided.");

    let (status, _) = app
        .post("/api/v1/token/refresh", None, json!({ "refresh": refresh }))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_change_password(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let (user, token) = app.user_with_token(Role::Member).await;

    let (status, body) = app
        .post(
            "/api/v1/auth/change-password",
            Some(&token),
            json!({ "old_password": "wrong-one", "new_password": "NewSecret1" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Old password is incorrect");

    let (status, _) = app
        .post(
            "/api/v1/auth/change-password",
            Some(&token),
            json!({ "old_password": PASSWORD, "new_password": "NewSecret1" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    app.login(user.phone.as_ref(), "NewSecret1").await;
}

#[sqlx::test(migrations = "./migrations")]
async fn test_password_reset_with_otp(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let user = create_test_user(app.db(), Role::Member).await;
    let phone = user.phone.as_ref();

    let (status, body) = app
        .post("/api/v1/auth/reset-password", None, json!({ "phone": phone }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], true);

    let otp: String = sqlx::query_scalar("SELECT otp_code FROM users WHERE id = ?")
        .bind(user.id)
        .fetch_one(app.db())
        .await
        .unwrap();
    assert_eq!(otp.len(), 6);

    let wrong = if otp == "000000" { "111111" } else { "000000" };
    let (status, body) = app
        .post(
            "/api/v1/auth/verify-otp",
            None,
            json!({ "phone": phone, "otp": wrong }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "OTP code is invalid");

    let (status, _) = app
        .post(
            "/api/v1/auth/verify-otp",
            None,
            json!({ "phone": phone, "otp": otp }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .post(
            "/api/v1/auth/set-new-password",
            None,
            json!({ "phone": phone, "otp": otp, "new_password": "Fresh1234" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    app.login(phone, "Fresh1234").await;

    // The code is single use.
    let (status, _) = app
        .post(
            "/api/v1/auth/set-new-password",
            None,
            json!({ "phone": phone, "otp": otp, "new_password": "Again1234" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

async fn current_otp(app: &TestApp, user: UserId) -> String {
    sqlx::query_scalar("SELECT otp_code FROM users WHERE id = ?")
        .bind(user)
        .fetch_one(app.db())
        .await
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_second_reset_invalidates_first_code(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let user = create_test_user(app.db(), Role::Member).await;
    let phone = user.phone.as_ref();
    let reset = json!({ "phone": phone });

    let (status, _) = app.post("/api/v1/auth/reset-password", None, reset.clone()).await;
    assert_eq!(status, StatusCode::OK);
    let first = current_otp(&app, user.id).await;

    // Codes are random; retry until the new one differs from the first.
    let mut second = first.clone();
    for _ in 0..5 {
        let (status, _) = app.post("/api/v1/auth/reset-password", None, reset.clone()).await;
        assert_eq!(status, StatusCode::OK);
        second = current_otp(&app, user.id).await;
        if second != first {
            break;
        }
    }
    assert_ne!(first, second);

    let (status, body) = app
        .post(
            "/api/v1/auth/verify-otp",
            None,
            json!({ "phone": phone, "otp": first }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "OTP code is invalid");

    let (status, _) = app
        .post(
            "/api/v1/auth/verify-otp",
            None,
            json!({ "phone": phone, "otp": second }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_reset_password_unknown_phone(pool: SqlitePool) {
    let app = TestApp::new(pool);

    let (status, body) = app
        .post(
            "/api/v1/auth/reset-password",
            None,
            json!({ "phone": "+998909999999" }),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User with this phone number does not exist");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deactivated_user_token_stops_working(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let (user, token) = app.user_with_token(Role::Staff).await;

    sqlx::query("UPDATE users SET is_active = 0 WHERE id = ?")
        .bind(user.id)
        .execute(app.db())
        .await
        .unwrap();

    let (status, body) = app.get("/api/v1/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "user_inactive");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_health(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let (status, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}
