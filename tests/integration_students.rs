mod common;

use axum::http::StatusCode;
use campusdesk_auth::Role;
use chrono::Utc;
use common::{
    PASSWORD, TestApp, create_course, create_group, create_student, create_test_user,
    record_attendance, unique_phone,
};
use serde_json::json;
use sqlx::SqlitePool;

#[sqlx::test(migrations = "./migrations")]
async fn test_register_creates_user_and_student(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let (_, admin) = app.user_with_token(Role::Admin).await;
    let course = create_course(app.db(), "Rust").await;
    let group = create_group(app.db(), "R-1", course).await;
    let phone = unique_phone();

    let (status, body) = app
        .post(
            "/api/v1/students/register",
            Some(&admin),
            json!({
                "user": { "phone": phone, "password": "Student1", "full_name": "Ali Valiyev" },
                "student": { "group_id": group.get(), "course_ids": [course.get()] }
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["phone"], phone.as_str());
    assert_eq!(body["group_id"], group.get());
    assert_eq!(body["course_ids"], json!([course.get()]));

    let role: String = sqlx::query_scalar("SELECT role FROM users WHERE phone = ?")
        .bind(&phone)
        .fetch_one(app.db())
        .await
        .unwrap();
    assert_eq!(role, "student");

    app.login(&phone, "Student1").await;
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_rolls_back_on_bad_course(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let (_, admin) = app.user_with_token(Role::Admin).await;
    let phone = unique_phone();

    let (status, _) = app
        .post(
            "/api/v1/students/register",
            Some(&admin),
            json!({
                "user": { "phone": phone, "password": "Student1" },
                "student": { "course_ids": [9999] }
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE phone = ?")
        .bind(&phone)
        .fetch_one(app.db())
        .await
        .unwrap();
    assert_eq!(users, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_duplicate_phone_conflicts(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let (admin_user, admin) = app.user_with_token(Role::Admin).await;

    let (status, _) = app
        .post(
            "/api/v1/students/register",
            Some(&admin),
            json!({ "user": { "phone": admin_user.phone.as_ref(), "password": "Student1" } }),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_requires_admin(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let (_, staff) = app.user_with_token(Role::Staff).await;

    let (status, _) = app
        .post(
            "/api/v1/students/register",
            Some(&staff),
            json!({ "user": { "phone": unique_phone(), "password": "Student1" } }),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_filters_by_group(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let (_, token) = app.user_with_token(Role::Member).await;
    let course = create_course(app.db(), "Go").await;
    let group = create_group(app.db(), "G-1", course).await;
    for in_group in [true, true, false] {
        let user = create_test_user(app.db(), Role::Student).await;
        create_student(app.db(), user.id, in_group.then_some(group)).await;
    }

    let (status, body) = app
        .get(
            &format!("/api/v1/students?group_id={}", group.get()),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 2);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (_, body) = app.get("/api/v1/students?limit=1", Some(&token)).await;
    assert_eq!(body["meta"]["total"], 3);
    assert_eq!(body["meta"]["has_more"], true);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_statistics(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let (_, staff) = app.user_with_token(Role::Staff).await;
    let course = create_course(app.db(), "Python").await;
    let current = create_group(app.db(), "P-1", course).await;
    let finished = create_group(app.db(), "P-0", course).await;
    sqlx::query("UPDATE study_groups SET end_date = '2000-01-01' WHERE id = ?")
        .bind(finished)
        .execute(app.db())
        .await
        .unwrap();

    for group in [Some(current), Some(current), Some(finished), None] {
        let user = create_test_user(app.db(), Role::Student).await;
        create_student(app.db(), user.id, group).await;
    }

    let today = Utc::now().date_naive();
    let (status, body) = app
        .post(
            "/api/v1/students/statistics",
            Some(&staff),
            json!({ "start_date": today - chrono::Duration::days(1), "end_date": today }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "total_students": 4,
            "registered_students": 4,
            "studying_students": 2,
            "graduated_students": 1
        })
    );

    let (status, body) = app
        .post(
            "/api/v1/students/statistics",
            Some(&staff),
            json!({ "start_date": "2001-01-01", "end_date": "2001-12-31" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_students"], 4);
    assert_eq!(body["registered_students"], 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_statistics_forbidden_for_members(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let (_, token) = app.user_with_token(Role::Member).await;

    let (status, _) = app
        .post(
            "/api/v1/students/statistics",
            Some(&token),
            json!({ "start_date": "2024-01-01", "end_date": "2024-12-31" }),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_attendances_and_groups(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let (user, token) = app.user_with_token(Role::Student).await;
    let course = create_course(app.db(), "Java").await;
    let group = create_group(app.db(), "J-1", course).await;
    let student = create_student(app.db(), user.id, Some(group)).await;
    record_attendance(app.db(), student, group).await;

    let (status, body) = app
        .get(
            &format!("/api/v1/students/{}/attendances", student.get()),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["group_id"], group.get());

    let (status, body) = app
        .get(
            &format!("/api/v1/students/{}/groups", student.get()),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], group.get());

    let (status, _) = app.get("/api/v1/students/9999/groups", Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_student_with_attendance_is_protected(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let (_, staff) = app.user_with_token(Role::Staff).await;
    let user = create_test_user(app.db(), Role::Student).await;
    let course = create_course(app.db(), "C").await;
    let group = create_group(app.db(), "C-1", course).await;
    let student = create_student(app.db(), user.id, Some(group)).await;
    record_attendance(app.db(), student, group).await;

    let (status, _) = app
        .delete(&format!("/api/v1/students/{}", student.get()), Some(&staff))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_and_delete_student(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let (_, staff) = app.user_with_token(Role::Staff).await;
    let user = create_test_user(app.db(), Role::Student).await;
    let student = create_student(app.db(), user.id, None).await;
    let course = create_course(app.db(), "Elixir").await;

    let (status, body) = app
        .put(
            &format!("/api/v1/students/{}", student.get()),
            Some(&staff),
            json!({ "is_line": true, "course_ids": [course.get()] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["is_line"], true);
    assert_eq!(body["course_ids"], json!([course.get()]));
    assert_eq!(body["is_active"], true);

    let (status, _) = app
        .delete(&format!("/api/v1/students/{}", student.get()), Some(&staff))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .get(&format!("/api/v1/students/{}", student.get()), Some(&staff))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The account outlives the profile.
    let (status, _) = app
        .post(
            "/api/v1/auth/login",
            None,
            json!({ "phone": user.phone.as_ref(), "password": PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_statistics_rejects_reversed_range(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let (_, staff) = app.user_with_token(Role::Staff).await;

    let (status, body) = app
        .post(
            "/api/v1/students/statistics",
            Some(&staff),
            json!({ "start_date": "2024-12-31", "end_date": "2024-01-01" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_attendance_level_in_use_cannot_be_deleted(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let (_, staff) = app.user_with_token(Role::Staff).await;
    let course = create_course(app.db(), "Rust").await;
    let group = create_group(app.db(), "RS-1", course).await;
    let student = create_student(
        app.db(),
        create_test_user(app.db(), Role::Student).await.id,
        Some(group),
    )
    .await;
    let level = record_attendance(app.db(), student, group).await;
    let uri = format!("/api/v1/attendances/levels/{level}");

    let (status, body) = app.delete(&uri, Some(&staff)).await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");
    assert_eq!(body["code"], "protected");

    let (status, body) = app.get(&uri, Some(&staff)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "present");
}
