use axum::{
    Router,
    extract::{MatchedPath, Request},
    http::StatusCode,
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

const REQUEST_DURATION: &str = "http_request_duration_seconds";
const REQUESTS_ACTIVE: &str = "http_requests_active";

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

/// Set once at startup; defaults to enabled if never set.
pub fn is_observability_enabled() -> bool {
    *OBSERVABILITY_ENABLED.get_or_init(|| true)
}

/// Installs the Prometheus recorder and its upkeep task. Returns `None`
/// when observability is switched off.
pub fn init_metrics(enabled: bool) -> Result<Option<PrometheusHandle>, BuildError> {
    if !*OBSERVABILITY_ENABLED.get_or_init(|| enabled) {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(REQUEST_DURATION.to_string()),
            &[
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ],
        )?
        .install_recorder()?;

    let upkeep = handle.clone();
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(Duration::from_secs(5));
        loop {
            tick.tick().await;
            upkeep.run_upkeep();
        }
    });

    Ok(Some(handle))
}

pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

/// Holds one slot of the in-flight gauge; released on drop so a cancelled
/// request does not leak it.
struct InFlight;

impl InFlight {
    fn enter() -> Self {
        gauge!(REQUESTS_ACTIVE).increment(1.0);
        InFlight
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        gauge!(REQUESTS_ACTIVE).decrement(1.0);
    }
}

/// `2xx`, `4xx`, ... for the coarse status counter.
fn status_class(status: StatusCode) -> &'static str {
    match status.as_u16() / 100 {
        1 => "1xx",
        2 => "2xx",
        3 => "3xx",
        4 => "4xx",
        5 => "5xx",
        _ => "other",
    }
}

pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    // Unmatched requests are bucketed together to keep label cardinality bounded.
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| "unmatched".to_owned(), |p| p.as_str().to_owned());

    let response = {
        let _slot = InFlight::enter();
        next.run(req).await
    };

    let status = response.status();
    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.as_u16().to_string()
    )
    .increment(1);
    counter!("http_requests_by_status", "status_category" => status_class(status)).increment(1);
    histogram!(REQUEST_DURATION, "method" => method, "path" => path)
        .record(start.elapsed().as_secs_f64());

    response
}

// Domain counters. All are no-ops while observability is off.

fn bump(name: &'static str, labels: &[(&'static str, String)]) {
    if !is_observability_enabled() {
        return;
    }
    let labels: Vec<metrics::Label> = labels
        .iter()
        .map(|(key, value)| metrics::Label::new(*key, value.clone()))
        .collect();
    counter!(name, labels).increment(1);
}

pub fn track_user_created(role: &str) {
    bump("users_created_total", &[("role", role.to_owned())]);
}

pub fn track_user_login_success(role: &str) {
    bump(
        "user_logins_total",
        &[("role", role.to_owned()), ("status", "success".into())],
    );
}

/// `reason` is one of `unknown_phone`, `inactive` or `wrong_password`.
pub fn track_user_login_failure(reason: &'static str) {
    bump(
        "user_logins_total",
        &[("status", "failure".into()), ("reason", reason.into())],
    );
}

/// `kind` is `access` or `refresh`.
pub fn track_jwt_issued(kind: &'static str) {
    bump("jwt_tokens_issued_total", &[("kind", kind.into())]);
}

pub fn track_jwt_blacklisted() {
    bump("jwt_tokens_blacklisted_total", &[]);
}

pub fn track_otp_issued() {
    bump("otp_codes_issued_total", &[]);
}

pub fn track_payment_recorded() {
    bump("payments_recorded_total", &[]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_class() {
        assert_eq!(status_class(StatusCode::OK), "2xx");
        assert_eq!(status_class(StatusCode::NO_CONTENT), "2xx");
        assert_eq!(status_class(StatusCode::CONFLICT), "4xx");
        assert_eq!(status_class(StatusCode::INTERNAL_SERVER_ERROR), "5xx");
    }

    #[test]
    fn test_counters_without_recorder_are_noops() {
        track_user_created("admin");
        track_user_login_failure("wrong_password");
        track_jwt_issued("access");
        track_payment_recorded();
    }
}
