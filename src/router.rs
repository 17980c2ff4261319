use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::modules::attendance::{init_attendances_router, init_statuses_router};
use crate::modules::auth::{init_auth_router, init_token_router};
use crate::modules::comments::init_comments_router;
use crate::modules::courses::{init_courses_router, init_departments_router};
use crate::modules::groups::init_groups_router;
use crate::modules::homework::{init_reviews_router, init_submissions_router, init_topics_router};
use crate::modules::parents::init_parents_router;
use crate::modules::payments::{
    init_months_router, init_payment_types_router, init_payments_router,
};
use crate::modules::schedule::{init_rooms_router, init_table_types_router, init_tables_router};
use crate::modules::students::init_students_router;
use crate::modules::teachers::init_teachers_router;
use crate::modules::users::init_users_router;
use crate::modules::workers::init_workers_router;
use crate::state::AppState;
use axum::http::{HeaderValue, Method, header};
use axum::{Json, Router, middleware, routing::get};
use campusdesk_config::CorsConfig;
use serde_json::{Value, json};
use tower::Layer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

pub fn init_router(state: AppState) -> Router {
    let cors = cors_layer(&state.cors_config);

    Router::new()
        .route("/health", get(health))
        .nest(
            "/api/v1",
            Router::new()
                .nest("/auth", init_auth_router())
                .nest("/token", init_token_router())
                .nest("/users", init_users_router())
                .nest("/students", init_students_router())
                .nest("/teachers", init_teachers_router())
                .nest("/workers", init_workers_router())
                .nest("/departments", init_departments_router())
                .nest("/courses", init_courses_router())
                .nest("/groups", init_groups_router())
                .nest("/attendances", init_attendances_router())
                .nest("/statuses", init_statuses_router())
                .nest("/topics", init_topics_router())
                .nest("/homework-reviews", init_reviews_router())
                .nest("/homework-submissions", init_submissions_router())
                .nest("/rooms", init_rooms_router())
                .nest("/table-types", init_table_types_router())
                .nest("/tables", init_tables_router())
                .nest("/months", init_months_router())
                .nest("/payment-types", init_payment_types_router())
                .nest("/payments", init_payments_router())
                .nest("/parent", init_parents_router())
                .nest("/comments", init_comments_router()),
        )
        // Route layer so the matched path template is known when labelling.
        .route_layer(middleware::from_fn(metrics_middleware))
        .with_state(state)
        .layer(cors)
        .layer(middleware::from_fn(logging_middleware))
}

/// The router with trailing slashes trimmed before routing, so `/users/`
/// and `/users` reach the same handler.
pub fn init_app(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(init_router(state))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT]);

    if config.allows_any() {
        return layer.allow_origin(Any);
    }

    let allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    layer.allow_origin(allowed_origins).allow_credentials(true)
}
