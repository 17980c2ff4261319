#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use campusdesk::modules::users::service::{NewUser, UserService};
use campusdesk::router::init_app;
use campusdesk::state::AppState;
use campusdesk_auth::Role;
use campusdesk_config::{CorsConfig, JwtConfig};
use campusdesk_models::users::User;
use campusdesk_models::{CourseId, GroupId, StudentId, TeacherId, UserId};
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use std::sync::atomic::{AtomicU32, Ordering};
use tower::ServiceExt;

pub const PASSWORD: &str = "Secret123";

static PHONE_SEQ: AtomicU32 = AtomicU32::new(1);

/// A distinct valid phone per call within the test binary.
pub fn unique_phone() -> String {
    format!("+99890{:07}", PHONE_SEQ.fetch_add(1, Ordering::Relaxed))
}

pub struct TestApp {
    pub state: AppState,
}

impl TestApp {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            state: AppState {
                db: pool,
                jwt_config: JwtConfig::with_secret("integration-test-secret"),
                cors_config: CorsConfig::parse("*"),
            },
        }
    }

    pub fn db(&self) -> &SqlitePool {
        &self.state.db
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = init_app(self.state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, token, None).await
    }

    /// Logs in and returns `(access, refresh)`.
    pub async fn login(&self, phone: &str, password: &str) -> (String, String) {
        let (status, body) = self
            .post(
                "/api/v1/auth/login",
                None,
                serde_json::json!({ "phone": phone, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        (
            body["access"].as_str().unwrap().to_string(),
            body["refresh"].as_str().unwrap().to_string(),
        )
    }

    /// Creates a user with `role` and returns it with an access token.
    pub async fn user_with_token(&self, role: Role) -> (User, String) {
        let user = create_test_user(self.db(), role).await;
        let (access, _) = self.login(user.phone.as_ref(), PASSWORD).await;
        (user, access)
    }
}

pub async fn create_test_user(pool: &SqlitePool, role: Role) -> User {
    let phone = unique_phone();
    UserService::insert_user(
        pool,
        NewUser {
            phone: &phone,
            password: PASSWORD,
            full_name: Some("Test User"),
            role,
            is_active: true,
        },
    )
    .await
    .unwrap()
}

pub async fn create_course(pool: &SqlitePool, title: &str) -> CourseId {
    sqlx::query_scalar("INSERT INTO courses (title) VALUES (?) RETURNING id")
        .bind(title)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn create_group(pool: &SqlitePool, title: &str, course: CourseId) -> GroupId {
    let now = Utc::now();
    let today = now.date_naive();
    sqlx::query_scalar(
        "INSERT INTO study_groups (title, course_id, start_date, end_date, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?)
         RETURNING id",
    )
    .bind(title)
    .bind(course)
    .bind(today)
    .bind(today + chrono::Duration::days(90))
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_student(pool: &SqlitePool, user: UserId, group: Option<GroupId>) -> StudentId {
    let now = Utc::now();
    sqlx::query_scalar(
        "INSERT INTO students (user_id, group_id, created_at, updated_at)
         VALUES (?, ?, ?, ?)
         RETURNING id",
    )
    .bind(user)
    .bind(group)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_teacher(pool: &SqlitePool, user: UserId) -> TeacherId {
    sqlx::query_scalar("INSERT INTO teachers (user_id) VALUES (?) RETURNING id")
        .bind(user)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Records one attendance row and returns the id of its freshly created level.
pub async fn record_attendance(pool: &SqlitePool, student: StudentId, group: GroupId) -> i64 {
    let level: i64 =
        sqlx::query_scalar("INSERT INTO attendance_levels (title) VALUES ('present') RETURNING id")
            .fetch_one(pool)
            .await
            .unwrap();
    let status: i64 = sqlx::query_scalar(
        "INSERT INTO statuses (title, name) VALUES ('Came', 'came') RETURNING id",
    )
    .fetch_one(pool)
    .await
    .unwrap();
    let now = Utc::now();
    sqlx::query(
        "INSERT INTO attendances (level_id, student_id, status_id, group_id, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(level)
    .bind(student)
    .bind(status)
    .bind(group)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .unwrap();
    level
}
