mod common;

use axum::http::StatusCode;
use campusdesk_auth::Role;
use common::{TestApp, create_course, create_group, create_student, create_test_user};
use serde_json::{Value, json};
use sqlx::SqlitePool;

struct Billing {
    admin: String,
    student: i64,
    group: i64,
    month: i64,
    payment_type: i64,
}

async fn billing_setup(app: &TestApp) -> Billing {
    let (_, admin) = app.user_with_token(Role::Admin).await;
    let course = create_course(app.db(), "Rust").await;
    let group = create_group(app.db(), "RS-1", course).await;
    let user = create_test_user(app.db(), Role::Student).await;
    let student = create_student(app.db(), user.id, Some(group)).await;

    let (status, month) = app
        .post("/api/v1/months", Some(&admin), json!({ "title": "September" }))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{month}");
    let (status, payment_type) = app
        .post("/api/v1/payment-types", Some(&admin), json!({ "title": "Cash" }))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{payment_type}");

    Billing {
        admin,
        student: student.get(),
        group: group.get(),
        month: month["id"].as_i64().unwrap(),
        payment_type: payment_type["id"].as_i64().unwrap(),
    }
}

async fn pay(app: &TestApp, billing: &Billing, price: Value) -> (StatusCode, Value) {
    app.post(
        "/api/v1/payments",
        Some(&billing.admin),
        json!({
            "student_id": billing.student,
            "group_id": billing.group,
            "month_id": billing.month,
            "payment_type_id": billing.payment_type,
            "price": price
        }),
    )
    .await
}

#[sqlx::test(migrations = "./migrations")]
async fn test_price_is_rendered_with_two_decimals(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let billing = billing_setup(&app).await;

    let (status, body) = pay(&app, &billing, json!("99.5")).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["price"], "99.50");

    let (status, body) = pay(&app, &billing, json!(250000)).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["price"], "250000.00");

    let (status, body) = app
        .get(&format!("/api/v1/payments/{}", body["id"]), Some(&billing.admin))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"], "250000.00");
    assert_eq!(body["month_id"], billing.month);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_invalid_prices_rejected(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let billing = billing_setup(&app).await;

    for price in [json!("10.005"), json!("123456789.00"), json!("-5"), json!("abc")] {
        let (status, body) = pay(&app, &billing, price.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{price} -> {body}");
    }

    let (_, body) = app.get("/api/v1/payments", Some(&billing.admin)).await;
    assert_eq!(body["meta"]["total"], 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_payment_for_unknown_student(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let billing = billing_setup(&app).await;

    let (status, body) = app
        .post(
            "/api/v1/payments",
            Some(&billing.admin),
            json!({ "student_id": 9999, "payment_type_id": billing.payment_type, "price": 10 }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_reference");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_payment_keeps_unset_fields(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let billing = billing_setup(&app).await;
    let (_, created) = pay(&app, &billing, json!("100")).await;
    let uri = format!("/api/v1/payments/{}", created["id"]);

    let (status, body) = app
        .put(&uri, Some(&billing.admin), json!({ "price": "150.25" }))
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["price"], "150.25");
    assert_eq!(body["group_id"], billing.group);
    assert_eq!(body["student_id"], billing.student);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deleting_month_cascades_to_payments(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let billing = billing_setup(&app).await;
    pay(&app, &billing, json!(10)).await;

    let (status, _) = app
        .delete(
            &format!("/api/v1/months/{}", billing.month),
            Some(&billing.admin),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = app.get("/api/v1/payments", Some(&billing.admin)).await;
    assert_eq!(body["meta"]["total"], 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_payment_not_found(pool: SqlitePool) {
    let app = TestApp::new(pool);
    let (_, admin) = app.user_with_token(Role::Admin).await;

    let (status, body) = app.get("/api/v1/payments/404", Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Payment not found");

    let (status, _) = app.delete("/api/v1/payments/404", Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
