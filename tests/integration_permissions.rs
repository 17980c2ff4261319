mod common;

use axum::http::StatusCode;
use campusdesk_auth::Role;
use common::{TestApp, create_course, create_group, create_student, create_teacher, create_test_user};
use serde_json::json;
use sqlx::SqlitePool;

#[sqlx::test(migrations = "./migrations")]
async fn test_anonymous_write_is_unauthorized(pool: SqlitePool) {
    let app = TestApp::new(pool);

    let (status, body) = app
        .post("/api/v1/rooms", None, json!({ "title": "101" }))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authentication credentials were not provided.");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_member_write_is_forbidden(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let (_, member) = app.user_with_token(Role::Member).await;
    let (_, staff) = app.user_with_token(Role::Staff).await;

    let (status, body) = app
        .post("/api/v1/rooms", Some(&member), json!({ "title": "101" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "You do not have permission to perform this action.");

    let (status, _) = app
        .post("/api/v1/rooms", Some(&staff), json!({ "title": "101" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.get("/api/v1/rooms", Some(&member)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_malformed_authorization_header(pool: SqlitePool) {
    let app = TestApp::new(pool);

    let (status, _) = app.get("/api/v1/rooms", Some("not-a-token")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_staff_is_not_admin(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let (_, staff) = app.user_with_token(Role::Staff).await;
    let (_, admin) = app.user_with_token(Role::Admin).await;

    let (status, _) = app.get("/api/v1/users", Some(&staff)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.get("/api/v1/users", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_role_change_takes_effect_immediately(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let (user, token) = app.user_with_token(Role::Member).await;

    let (status, _) = app.get("/api/v1/users", Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    sqlx::query("UPDATE users SET role = 'admin' WHERE id = ?")
        .bind(user.id)
        .execute(app.db())
        .await
        .unwrap();

    let (status, _) = app.get("/api/v1/users", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_user_updates_self_but_not_privileges(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let (user, token) = app.user_with_token(Role::Member).await;
    let other = create_test_user(app.db(), Role::Member).await;
    let uri = format!("/api/v1/users/{}", user.id.get());

    let (status, body) = app
        .put(&uri, Some(&token), json!({ "full_name": "New Name" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["full_name"], "New Name");

    let (status, _) = app
        .put(&uri, Some(&token), json!({ "role": "admin" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .put(
            &format!("/api/v1/users/{}", other.id.get()),
            Some(&token),
            json!({ "full_name": "Hijacked" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, staff) = app.user_with_token(Role::Staff).await;
    let (status, body) = app
        .put(&uri, Some(&staff), json!({ "role": "teacher" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "teacher");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_creates_user_with_duplicate_phone(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let (admin_user, admin) = app.user_with_token(Role::Admin).await;

    let (status, body) = app
        .post(
            "/api/v1/users",
            Some(&admin),
            json!({ "phone": admin_user.phone.as_ref(), "password": "Secret1" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "User with this phone already exists");

    let (status, body) = app
        .post(
            "/api/v1/users",
            Some(&admin),
            json!({ "phone": "12ab", "password": "Secret1" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["phone"].is_array(), "{body}");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_comment_author_is_calling_admin(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let (admin, token) = app.user_with_token(Role::Admin).await;
    let other = create_test_user(app.db(), Role::Member).await;

    let (status, body) = app
        .post(
            "/api/v1/comments",
            Some(&token),
            json!({ "text": "Nice course", "user_id": other.id.get() }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["user_id"], admin.id.get());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_comments_are_admin_only(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let (_, admin) = app.user_with_token(Role::Admin).await;
    let (_, member) = app.user_with_token(Role::Member).await;
    let (_, staff) = app.user_with_token(Role::Staff).await;

    let (status, comment) = app
        .post("/api/v1/comments", Some(&admin), json!({ "text": "First" }))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{comment}");
    let uri = format!("/api/v1/comments/{}", comment["id"]);

    for token in [&member, &staff] {
        let (status, _) = app.get("/api/v1/comments", Some(token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = app
            .post("/api/v1/comments", Some(token), json!({ "text": "Mine" }))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = app.get(&uri, Some(token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = app
            .put(&uri, Some(token), json!({ "text": "Defaced" }))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = app.delete(&uri, Some(token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    let (status, body) = app
        .put(&uri, Some(&admin), json!({ "text": "Edited" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "Edited");

    let (status, body) = app.get("/api/v1/comments", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);

    let (status, _) = app.delete(&uri, Some(&admin)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_comments_require_authentication(pool: SqlitePool) {
    let app = TestApp::new(pool);

    let (status, _) = app.get("/api/v1/comments", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .post("/api/v1/comments", None, json!({ "text": "Hi" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_user_cascades_profiles(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let (_, admin) = app.user_with_token(Role::Admin).await;
    let user = create_test_user(app.db(), Role::Member).await;
    create_student(app.db(), user.id, None).await;
    create_teacher(app.db(), user.id).await;
    sqlx::query(
        "INSERT INTO workers (user_id, created_at, updated_at) VALUES (?, datetime('now'), datetime('now'))",
    )
    .bind(user.id.get())
    .execute(app.db())
    .await
    .unwrap();

    let (status, _) = app
        .delete(&format!("/api/v1/users/{}", user.id.get()), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    for table in ["students", "teachers", "workers"] {
        let remaining: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table} WHERE user_id = ?"))
                .bind(user.id.get())
                .fetch_one(app.db())
                .await
                .unwrap();
        assert_eq!(remaining, 0, "{table} row survived its user");
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_submission_owner_or_staff(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let (student_user, student_token) = app.user_with_token(Role::Student).await;
    let (_, classmate) = app.user_with_token(Role::Student).await;
    let (_, staff) = app.user_with_token(Role::Staff).await;

    let course = create_course(app.db(), "Rust").await;
    let group = create_group(app.db(), "RS-1", course).await;
    let student = create_student(app.db(), student_user.id, Some(group)).await;

    let (status, topic) = app
        .post(
            "/api/v1/topics",
            Some(&staff),
            json!({ "title": "Ownership", "course_id": course.get() }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{topic}");

    let (status, review) = app
        .post(
            "/api/v1/homework-reviews",
            Some(&staff),
            json!({ "group_id": group.get(), "topic_id": topic["id"] }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{review}");

    let (status, submission) = app
        .post(
            "/api/v1/homework-submissions",
            Some(&student_token),
            json!({
                "group_homework_id": review["id"],
                "student_id": student.get(),
                "link": "https://github.com/example/ownership"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{submission}");
    assert_eq!(submission["is_active"], false);
    let uri = format!("/api/v1/homework-submissions/{}", submission["id"]);

    let (status, _) = app
        .put(&uri, Some(&classmate), json!({ "link": "https://evil.example" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .put(&uri, Some(&student_token), json!({ "link": "https://github.com/example/v2" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["link"], "https://github.com/example/v2");

    let (status, body) = app
        .put(&uri, Some(&staff), json!({ "is_active": true }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_active"], true);

    let (status, _) = app.delete(&uri, Some(&classmate)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.delete(&uri, Some(&student_token)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_submission_link_must_be_url(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let (_, token) = app.user_with_token(Role::Student).await;

    let (status, _) = app
        .post(
            "/api/v1/homework-submissions",
            Some(&token),
            json!({ "group_homework_id": 1, "student_id": 1, "link": "not a link" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_teacher_profile_admin_or_owner(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let (teacher_user, teacher_token) = app.user_with_token(Role::Teacher).await;
    let (_, admin) = app.user_with_token(Role::Admin).await;
    let teacher = create_teacher(app.db(), teacher_user.id).await;
    let uri = format!("/api/v1/teachers/{}", teacher.get());

    let (status, body) = app.get(&uri, Some(&teacher_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], teacher_user.id.get());

    let (status, _) = app
        .put(&uri, Some(&teacher_token), json!({ "description": "self promoted" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .put(&uri, Some(&admin), json!({ "description": "Senior" }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get("/api/v1/teachers", Some(&teacher_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_payments_are_admin_only(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let (_, staff) = app.user_with_token(Role::Staff).await;

    let (status, _) = app.get("/api/v1/payments", Some(&staff)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get("/api/v1/months", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
